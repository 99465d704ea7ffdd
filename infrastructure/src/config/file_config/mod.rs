//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod client;
mod files;
mod logging;
mod session;

pub use client::FileClientConfig;
pub use files::FileFilesConfig;
pub use logging::FileLoggingConfig;
pub use session::FileSessionConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("client.cli_path cannot be empty")]
    EmptyCliPath,

    #[error("session.model cannot be empty")]
    EmptyModelName,

    #[error("unknown log level '{0}' (expected one of error, warn, info, debug, trace)")]
    UnknownLogLevel(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// How to reach the Copilot CLI
    pub client: FileClientConfig,
    /// Settings for the sessions the recipes create
    pub session: FileSessionConfig,
    /// Diagnostic logging and transcript
    pub logging: FileLoggingConfig,
    /// managing-local-files settings
    pub files: FileFilesConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if self.client.cli_path.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyCliPath);
        }
        if self.session.model.as_str().trim().is_empty() {
            issues.push(ConfigValidationError::EmptyModelName);
        }
        for level in [&self.logging.level, &self.client.log_level] {
            if !logging::is_known_level(level) {
                issues.push(ConfigValidationError::UnknownLogLevel(level.clone()));
            }
        }

        issues
    }
}
