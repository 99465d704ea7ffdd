//! Multiple sessions use case.
//!
//! Opens three independent sessions on one client and sends each its own
//! context and follow-up question. Replies are not awaited; the point is
//! that every conversation keeps its own history.

use crate::ports::assistant_client::{AssistantClient, AssistantSession};
use crate::ports::progress::RecipeProgress;
use crate::use_cases::error::RecipeError;
use crate::use_cases::scope::{release_session, with_client};
use recipes_domain::{MessageOptions, Model, PromptTemplate, SessionConfig};
use std::sync::Arc;
use tracing::{info, warn};

/// Input for the [`MultipleSessionsUseCase`].
#[derive(Debug, Clone)]
pub struct MultipleSessionsInput {
    /// One model per conversation
    pub models: [Model; 3],
}

impl Default for MultipleSessionsInput {
    fn default() -> Self {
        Self {
            models: [Model::Gpt5, Model::Gpt5, Model::ClaudeSonnet45],
        }
    }
}

/// Result of the [`MultipleSessionsUseCase`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipleSessionsOutput {
    /// Session identifiers in creation order
    pub session_ids: Vec<String>,
    /// Prompts the backend refused
    pub failed_sends: usize,
}

/// Use case behind the `multiple-sessions` recipe.
pub struct MultipleSessionsUseCase {
    client: Arc<dyn AssistantClient>,
}

impl MultipleSessionsUseCase {
    pub fn new(client: Arc<dyn AssistantClient>) -> Self {
        Self { client }
    }

    pub async fn execute(
        &self,
        input: MultipleSessionsInput,
        progress: Arc<dyn RecipeProgress>,
    ) -> Result<MultipleSessionsOutput, RecipeError> {
        let client = self.client.as_ref();
        let progress = progress.as_ref();

        with_client(client, move || async move {
            let mut sessions: Vec<Box<dyn AssistantSession>> = Vec::with_capacity(3);
            for model in input.models {
                match client.create_session(SessionConfig::new(model)).await {
                    Ok(session) => {
                        progress.on_session_created(session.session_id());
                        sessions.push(session);
                    }
                    Err(e) => {
                        release_all(&sessions, progress).await;
                        return Err(RecipeError::SessionUnavailable(e));
                    }
                }
            }
            progress.on_sessions_ready(sessions.len());

            let conversations = PromptTemplate::project_conversations();
            let contexts = conversations.map(|(context, _)| context);
            let questions = conversations.map(|(_, question)| question);

            let mut failed_sends = send_round(&sessions, &contexts, progress).await;
            progress.on_context_sent();

            failed_sends += send_round(&sessions, &questions, progress).await;
            progress.on_follow_ups_sent();

            let session_ids = sessions
                .iter()
                .map(|s| s.session_id().to_string())
                .collect();
            release_all(&sessions, progress).await;
            progress.on_sessions_released();

            Ok(MultipleSessionsOutput {
                session_ids,
                failed_sends,
            })
        })
        .await
    }
}

/// Send one prompt to each session, pairing them by position. Returns the
/// number of sends that failed.
async fn send_round(
    sessions: &[Box<dyn AssistantSession>],
    prompts: &[&str],
    progress: &dyn RecipeProgress,
) -> usize {
    let mut failed = 0;
    for (session, prompt) in sessions.iter().zip(prompts) {
        if let Err(e) = session.send(MessageOptions::new(*prompt)).await {
            warn!("Failed to send to session {}: {}", session.session_id(), e);
            progress.on_send_failed(session.session_id(), &e);
            failed += 1;
        }
    }
    failed
}

async fn release_all(sessions: &[Box<dyn AssistantSession>], progress: &dyn RecipeProgress) {
    for session in sessions.iter().rev() {
        release_session(session.as_ref()).await;
        progress.on_session_destroyed(session.session_id());
    }
    info!("Released {} sessions", sessions.len());
}
