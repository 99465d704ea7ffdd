//! multiple-sessions recipe
//!
//! Opens three independent sessions on one client, gives each its own
//! context and follow-up question, then destroys them all.

use anyhow::Result;
use clap::Parser;
use recipes_application::{MultipleSessionsInput, MultipleSessionsUseCase};
use recipes_presentation::{ConsoleProgress, MultipleSessionsCli, Recipe};
use std::sync::Arc;
use tracing::warn;

#[tokio::main]
async fn main() -> Result<()> {
    let _cli = MultipleSessionsCli::parse();
    let config = copilot_recipes::bootstrap("multiple-sessions")?;

    let use_case = MultipleSessionsUseCase::new(copilot_recipes::build_client(&config));
    let progress = Arc::new(ConsoleProgress::new(Recipe::MultipleSessions));

    let output = use_case
        .execute(MultipleSessionsInput::default(), progress)
        .await?;
    if output.failed_sends > 0 {
        warn!("{} prompts could not be sent", output.failed_sends);
    }
    Ok(())
}
