//! pr-visualization recipe
//!
//! Resolves a GitHub repository (flag, `origin` remote, or prompt), asks
//! Copilot for a chart of open pull requests by age, and keeps the session
//! open for follow-up questions until `exit`, `quit` or end of input.

use anyhow::{Context, Result};
use clap::Parser;
use recipes_application::{
    PromptInputPort, PrVisualizationInput, PrVisualizationUseCase, RecipeProgress,
    ResolveRepoUseCase,
};
use recipes_infrastructure::GitRemoteDetector;
use recipes_presentation::{ConsoleProgress, PrVisualizationCli, Recipe, StdinPromptInput};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = PrVisualizationCli::parse();
    let config = copilot_recipes::bootstrap("pr-visualization")?;

    let console = ConsoleProgress::new(Recipe::PrVisualization);
    console.print_banner();
    let progress: Arc<dyn RecipeProgress> = Arc::new(console);
    let input: Arc<dyn PromptInputPort> = Arc::new(StdinPromptInput::stdin());
    let working_dir = std::env::current_dir().context("Failed to read current directory")?;

    let resolver = ResolveRepoUseCase::new(
        Arc::new(GitRemoteDetector::in_dir(Some(working_dir.clone()))),
        Arc::clone(&input),
    );
    let repo = resolver.execute(cli.repo.as_deref(), progress.as_ref()).await?;

    let use_case = PrVisualizationUseCase::new(copilot_recipes::build_client(&config), input);
    let summary = use_case
        .execute(
            PrVisualizationInput::new(config.session.model.clone(), repo, working_dir),
            progress,
        )
        .await?;
    info!(
        "Follow-up loop ended after {} prompts ({:?})",
        summary.prompts_sent, summary.exit
    );
    Ok(())
}
