//! Transport layer for Copilot CLI communication.
//!
//! Messages are JSON bodies framed LSP-style:
//!
//! ```text
//! Content-Length: 42\r\n
//! \r\n
//! {"jsonrpc":"2.0","id":1,"method":"ping",...}
//! ```
//!
//! This module provides the framing helpers and the message classification
//! used by the [`MessageRouter`](super::router::MessageRouter)'s background
//! reader task.

use crate::copilot::error::{CopilotError, Result};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;

/// Classification of an incoming JSON-RPC message.
///
/// - `Response` → oneshot correlation for pending requests
/// - `IncomingRequest` → answered directly by the router (e.g. `tool.call`)
/// - `Notification` → session event routing
#[derive(Debug, PartialEq, Eq)]
pub enum MessageKind {
    /// A response to a request we sent (has `id`, no `method`).
    Response,
    /// An incoming request from the CLI (has `id` + `method`).
    IncomingRequest { id: u64 },
    /// A notification (has `method`, no `id`), e.g. `session.event`.
    Notification,
}

/// Classify a JSON-RPC message by inspecting `id` and `method` fields.
pub fn classify_message(json: &serde_json::Value) -> MessageKind {
    let has_id = json.get("id").and_then(|v| v.as_u64());
    let has_method = json.get("method").and_then(|v| v.as_str());

    match (has_id, has_method) {
        (Some(id), Some(_)) => MessageKind::IncomingRequest { id },
        (Some(_), None) => MessageKind::Response,
        _ => MessageKind::Notification,
    }
}

/// Serialize `message` and write it as one frame, then flush.
pub async fn write_frame<W, T>(writer: &mut W, message: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let json = serde_json::to_string(message)?;
    trace!("Sending: {}", json);

    let header = format!("Content-Length: {}\r\n\r\n", json.len());
    writer.write_all(header.as_bytes()).await?;
    writer.write_all(json.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one frame body.
///
/// Unknown headers are skipped. Returns [`CopilotError::TransportClosed`]
/// when the stream ends, including in the middle of a frame.
pub async fn read_frame<R>(reader: &mut R) -> Result<Vec<u8>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();

    let content_length = loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Err(CopilotError::TransportClosed);
        }

        let trimmed = line.trim();
        if let Some(len_str) = trimmed.strip_prefix("Content-Length:")
            && let Ok(len) = len_str.trim().parse::<usize>()
        {
            break len;
        }
    };

    // Skip remaining headers up to the blank separator line
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Err(CopilotError::TransportClosed);
        }
        if line.trim().is_empty() {
            break;
        }
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            CopilotError::TransportClosed
        } else {
            CopilotError::SpawnError(e)
        }
    })?;
    Ok(body)
}
