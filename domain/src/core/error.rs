//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid repo format. Expected: owner/repo (got {0:?})")]
    InvalidRepo(String),

    #[error("Prompt cannot be empty")]
    EmptyPrompt,
}
