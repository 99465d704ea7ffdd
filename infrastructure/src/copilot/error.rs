//! Error types for the Copilot adapter

use recipes_application::ClientError;
use thiserror::Error;

/// Result type alias for Copilot operations
pub type Result<T> = std::result::Result<T, CopilotError>;

/// Errors that can occur when communicating with Copilot CLI
#[derive(Error, Debug)]
pub enum CopilotError {
    #[error("Failed to spawn Copilot process: {0}")]
    SpawnError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to parse response: {error}\nRaw response: {raw}")]
    ParseError { error: String, raw: String },

    #[error("JSON-RPC error (code {code}): {message}")]
    RpcError { code: i64, message: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Copilot CLI not found: {0}")]
    CliNotFound(String),

    #[error("Client not started")]
    NotStarted,

    #[error("Session {0} has been destroyed")]
    SessionDestroyed(String),

    #[error("Transport closed")]
    TransportClosed,

    #[error("Message router stopped")]
    RouterStopped,
}

impl CopilotError {
    /// True for failures reported by the CLI itself, as opposed to
    /// transport or local errors.
    pub fn is_rpc(&self) -> bool {
        matches!(self, CopilotError::RpcError { .. })
    }
}

impl From<CopilotError> for ClientError {
    fn from(e: CopilotError) -> Self {
        match e {
            CopilotError::RpcError { code, message } => ClientError::Rpc { code, message },
            CopilotError::NotStarted => ClientError::NotStarted,
            CopilotError::SessionDestroyed(id) => {
                ClientError::SendFailed(format!("session {} has been destroyed", id))
            }
            CopilotError::TransportClosed | CopilotError::RouterStopped => {
                ClientError::TransportClosed
            }
            other => ClientError::Other(other.to_string()),
        }
    }
}
