//! persisting-sessions recipe
//!
//! Creates a session under a fixed identifier, destroys it, resumes it by
//! that identifier, lists the stored sessions and finally deletes it.

use anyhow::Result;
use clap::Parser;
use recipes_application::{PersistSessionsInput, PersistSessionsUseCase};
use recipes_presentation::{ConsoleProgress, PersistingSessionsCli, Recipe};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let _cli = PersistingSessionsCli::parse();
    let config = copilot_recipes::bootstrap("persisting-sessions")?;

    let use_case = PersistSessionsUseCase::new(copilot_recipes::build_client(&config));
    let progress = Arc::new(ConsoleProgress::new(Recipe::PersistingSessions));

    use_case
        .execute(PersistSessionsInput::new(config.session.model.clone()), progress)
        .await?;
    Ok(())
}
