//! error-handling recipe
//!
//! Starts the client, sends one greeting and prints the first assistant
//! message. A failed send is reported without ending the program.

use anyhow::Result;
use clap::Parser;
use recipes_application::{SinglePromptInput, SinglePromptUseCase};
use recipes_presentation::{ConsoleProgress, ErrorHandlingCli, Recipe};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let _cli = ErrorHandlingCli::parse();
    let config = copilot_recipes::bootstrap("error-handling")?;

    let use_case = SinglePromptUseCase::new(copilot_recipes::build_client(&config));
    let progress = Arc::new(ConsoleProgress::new(Recipe::ErrorHandling));

    use_case
        .execute(SinglePromptInput::new(config.session.model.clone()), progress)
        .await?;
    Ok(())
}
