//! Shared wiring for the recipe binaries
//!
//! Every recipe starts the same way: load the layered configuration,
//! install the `tracing` subscriber, and build a Copilot client from the
//! `[client]` and `[logging]` sections. The binaries then hand the client
//! to their use case.

use anyhow::{Context, Result};
use recipes_application::{AssistantClient, ConversationLogger, NoConversationLogger};
use recipes_infrastructure::{
    ClientOptions, ConfigLoader, CopilotClient, FileConfig, JsonlConversationLogger,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Load configuration and initialize logging.
pub fn bootstrap(recipe: &str) -> Result<FileConfig> {
    let config = ConfigLoader::load()
        .map_err(|e| *e)
        .context("Failed to load configuration")?;
    init_logging(&config);

    for issue in config.validate() {
        warn!("Config: {}", issue);
    }
    info!("Starting {}", recipe);
    Ok(config)
}

/// Install the stderr subscriber. `RUST_LOG` wins over `[logging] level`.
pub fn init_logging(config: &FileConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Map the file configuration onto client options.
pub fn client_options(config: &FileConfig) -> ClientOptions {
    ClientOptions {
        cli_path: PathBuf::from(&config.client.cli_path),
        cli_url: config.client.cli_url.clone().filter(|url| !url.trim().is_empty()),
        log_level: config.client.log_level.clone(),
        conversation_logger: transcript_logger(config),
    }
}

/// Build the Copilot client the recipes share.
pub fn build_client(config: &FileConfig) -> Arc<dyn AssistantClient> {
    Arc::new(CopilotClient::new(client_options(config)))
}

/// A transcript that cannot be opened is reported and skipped.
fn transcript_logger(config: &FileConfig) -> Arc<dyn ConversationLogger> {
    let Some(path) = &config.logging.transcript else {
        return Arc::new(NoConversationLogger);
    };

    match JsonlConversationLogger::open(path) {
        Ok(logger) => {
            info!("Writing transcript to {}", logger.path().display());
            Arc::new(logger)
        }
        Err(e) => {
            warn!("Could not open transcript {}: {}", path.display(), e);
            Arc::new(NoConversationLogger)
        }
    }
}
