//! Prompt send request

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A file the assistant should see alongside the prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub path: PathBuf,
    pub display_name: Option<String>,
}

/// Prompt text plus per-message options (Value Object)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageOptions {
    pub prompt: String,
    pub attachments: Vec<Attachment>,
}

impl MessageOptions {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            attachments: Vec::new(),
        }
    }

    /// Like [`new`](Self::new), but rejects whitespace-only prompts
    pub fn try_new(prompt: impl Into<String>) -> Result<Self, DomainError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(DomainError::EmptyPrompt);
        }
        Ok(Self::new(prompt))
    }

    pub fn with_attachment(mut self, path: impl Into<PathBuf>) -> Self {
        self.attachments.push(Attachment {
            path: path.into(),
            display_name: None,
        });
        self
    }
}

impl From<&str> for MessageOptions {
    fn from(prompt: &str) -> Self {
        Self::new(prompt)
    }
}

impl From<String> for MessageOptions {
    fn from(prompt: String) -> Self {
        Self::new(prompt)
    }
}
