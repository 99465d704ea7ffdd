//! managing-local-files recipe
//!
//! Asks Copilot to organize a folder by file type and prints each tool it
//! runs while doing so.

use anyhow::{Context, Result};
use clap::Parser;
use recipes_application::{OrganizeFilesInput, OrganizeFilesUseCase};
use recipes_presentation::{ConsoleProgress, ManagingLocalFilesCli, Recipe};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _cli = ManagingLocalFilesCli::parse();
    let config = copilot_recipes::bootstrap("managing-local-files")?;

    let target_folder = match config.files.target_folder_or_default() {
        Some(folder) => folder,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    let use_case = OrganizeFilesUseCase::new(copilot_recipes::build_client(&config));
    let progress = Arc::new(ConsoleProgress::new(Recipe::ManagingLocalFiles));

    let output = use_case
        .execute(
            OrganizeFilesInput::new(config.session.model.clone(), target_folder),
            progress,
        )
        .await?;
    info!("{} tool calls completed", output.completed_tools.len());
    Ok(())
}
