//! Infrastructure layer for copilot-recipes
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the Copilot CLI client, git remote detection,
//! the JSONL transcript, and configuration file loading.

pub mod config;
pub mod copilot;
pub mod git;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileClientConfig, FileConfig, FileFilesConfig,
    FileLoggingConfig, FileSessionConfig,
};
pub use copilot::{
    client::{ClientOptions, CopilotClient},
    error::{CopilotError, Result},
    router::MessageRouter,
    session::CopilotSession,
};
pub use git::GitRemoteDetector;
pub use logging::JsonlConversationLogger;
