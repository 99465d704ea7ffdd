//! Client configuration from TOML (`[client]` section)

use serde::{Deserialize, Serialize};

/// Raw Copilot CLI connection settings from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileClientConfig {
    /// Executable to spawn; bare names are looked up on `PATH`
    pub cli_path: String,
    /// Address of an already running `copilot --server` (skips spawning)
    pub cli_url: Option<String>,
    /// Verbosity passed to the CLI as `--log-level`
    pub log_level: String,
}

impl Default for FileClientConfig {
    fn default() -> Self {
        Self {
            cli_path: "copilot".to_string(),
            cli_url: None,
            log_level: "error".to_string(),
        }
    }
}
