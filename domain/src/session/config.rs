//! Session configuration value objects

use crate::core::model::Model;
use serde::{Deserialize, Serialize};

/// How a [`SystemMessage`] combines with the backend's own system prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemMessageMode {
    /// Appended after the backend's default instructions
    #[default]
    Append,
    /// Replaces the backend's default instructions entirely
    Replace,
}

/// Extra instructions attached to a session at creation time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemMessage {
    pub mode: SystemMessageMode,
    pub content: String,
}

impl SystemMessage {
    pub fn append(content: impl Into<String>) -> Self {
        Self {
            mode: SystemMessageMode::Append,
            content: content.into(),
        }
    }

    pub fn replace(content: impl Into<String>) -> Self {
        Self {
            mode: SystemMessageMode::Replace,
            content: content.into(),
        }
    }
}

/// Parameters for creating a session (Value Object)
///
/// A fixed `session_id` makes the session addressable later for
/// resumption or deletion; without one the client picks an identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    pub model: Model,
    pub session_id: Option<String>,
    pub system_message: Option<SystemMessage>,
}

impl SessionConfig {
    pub fn new(model: Model) -> Self {
        Self {
            model,
            session_id: None,
            system_message: None,
        }
    }

    /// Use a caller-chosen identifier (e.g. `user-123-conversation`)
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_system_message(mut self, system_message: SystemMessage) -> Self {
        self.system_message = Some(system_message);
        self
    }
}
