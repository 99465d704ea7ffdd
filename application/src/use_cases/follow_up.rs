//! Interactive follow-up loop.
//!
//! Reads prompts from the user and sends them to an existing session until
//! an exit keyword or end of input. The next line is only requested once
//! the assistant has finished the previous turn.

use crate::ports::assistant_client::AssistantSession;
use crate::ports::progress::RecipeProgress;
use crate::ports::prompt_input::PromptInputPort;
use crate::use_cases::error::RecipeError;
use recipes_domain::{ExitCommand, MessageOptions};
use tracing::{debug, warn};

/// Prompt shown before each line of user input
pub const FOLLOW_UP_PROMPT: &str = "You: ";

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The user typed `exit` or `quit`
    Command(ExitCommand),
    /// Input closed (Ctrl-D, piped input exhausted)
    EndOfInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowUpSummary {
    /// Prompts the backend accepted
    pub prompts_sent: usize,
    pub exit: LoopExit,
}

/// Run the loop against `session`.
///
/// A failed send is reported and the loop moves on to the next line.
/// Waiting for idle after an accepted prompt is not optional: a broken
/// transport ends the loop with an error.
pub async fn run_follow_up_loop(
    session: &dyn AssistantSession,
    input: &dyn PromptInputPort,
    progress: &dyn RecipeProgress,
) -> Result<FollowUpSummary, RecipeError> {
    let mut prompts_sent = 0;

    loop {
        let Some(line) = input.read_line(FOLLOW_UP_PROMPT).await? else {
            debug!("Input closed after {} prompts", prompts_sent);
            return Ok(FollowUpSummary {
                prompts_sent,
                exit: LoopExit::EndOfInput,
            });
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = ExitCommand::parse(line) {
            progress.on_goodbye();
            return Ok(FollowUpSummary {
                prompts_sent,
                exit: LoopExit::Command(command),
            });
        }

        match session.send(MessageOptions::new(line)).await {
            Ok(message_id) => {
                debug!("Follow-up accepted as {}", message_id);
                prompts_sent += 1;
                session.wait_for_idle().await?;
            }
            Err(e) => {
                warn!("Error: {}", e);
                progress.on_send_failed(session.session_id(), &e);
            }
        }
    }
}
