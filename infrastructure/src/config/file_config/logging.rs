//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

pub(super) fn is_known_level(level: &str) -> bool {
    LEVELS.contains(&level.to_ascii_lowercase().as_str())
}

/// Raw logging settings from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Default `tracing` level when `RUST_LOG` is unset
    pub level: String,
    /// Write a JSONL transcript of every session event here
    pub transcript: Option<PathBuf>,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            transcript: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_case_insensitive() {
        assert!(is_known_level("WARN"));
        assert!(is_known_level("debug"));
        assert!(!is_known_level("verbose"));
    }
}
