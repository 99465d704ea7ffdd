//! Prompt input port for reading lines typed by the user.
//!
//! - **Port**: [`PromptInputPort`] - defined here in application layer
//! - **Adapter**: `StdinPromptInput` - implemented in presentation layer
//!
//! Used for the interactive follow-up loop and for asking the user which
//! repository to analyze when it cannot be detected.

use async_trait::async_trait;
use thiserror::Error;

/// Error reading from the terminal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("I/O error: {0}")]
    Io(String),
}

/// Reads one line of user input at a time.
#[async_trait]
pub trait PromptInputPort: Send + Sync {
    /// Show `prompt` and read a line.
    ///
    /// Returns `Ok(None)` at end of input. The returned line has its
    /// trailing newline removed but is otherwise untouched.
    async fn read_line(&self, prompt: &str) -> Result<Option<String>, InputError>;
}
