//! Session configuration from TOML (`[session]` section)

use recipes_domain::Model;
use serde::{Deserialize, Serialize};

/// Raw session settings from TOML
///
/// `model` is the one used by single-session recipes. multiple-sessions
/// keeps its fixed gpt-5 / gpt-5 / claude-sonnet-4.5 mix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    pub model: Model,
}
