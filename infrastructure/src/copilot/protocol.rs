//! JSON-RPC protocol types for Copilot CLI communication.
//!
//! This module defines the message structures used in the JSON-RPC 2.0 protocol
//! for communicating with the Copilot CLI server.
//!
//! # Protocol Overview
//!
//! - **Requests**: Client → Copilot CLI (e.g., `session.create`, `session.send`)
//! - **Responses**: Copilot CLI → Client (result or error)
//! - **Notifications**: Copilot CLI → Client (`session.event`)
//! - **Incoming requests**: Copilot CLI → Client (`tool.call`), always rejected

use chrono::{DateTime, Utc};
use recipes_domain::{Attachment, SessionSummary, SystemMessage};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Global request ID counter for JSON-RPC requests.
static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Generates a unique request ID.
fn next_id() -> u64 {
    REQUEST_ID.fetch_add(1, Ordering::SeqCst)
}

/// JSON-RPC request
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl JsonRpcRequest {
    /// Creates a new JSON-RPC request with an auto-generated ID.
    pub fn new(method: impl Into<String>, params: Option<serde_json::Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            id: next_id(),
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC response
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<u64>,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
}

/// JSON-RPC error object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// JSON-RPC "method not found"
pub const METHOD_NOT_FOUND: i64 = -32601;

/// Notification from server (`session.event`)
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: Option<serde_json::Value>,
}

/// JSON-RPC response sent from client → CLI (answers to incoming requests).
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponseOut {
    pub jsonrpc: &'static str,
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl JsonRpcResponseOut {
    pub fn new(id: u64, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: u64, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}

// ==================== Method parameters ====================

/// `ping` parameters
#[derive(Debug, Clone, Serialize)]
pub struct PingParams {
    pub message: String,
}

/// `ping` result
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingResult {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub protocol_version: Option<u32>,
}

/// `session.create` parameters
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionParams {
    pub session_id: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_message: Option<SystemMessage>,
}

/// Result of `session.create` and `session.resume`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub session_id: String,
}

/// Parameters of every method that only names a session
/// (`session.resume`, `session.destroy`, `session.delete`)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdParams {
    pub session_id: String,
}

impl SessionIdParams {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }
}

/// File attached to a prompt
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentParams {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl From<&Attachment> for AttachmentParams {
    fn from(attachment: &Attachment) -> Self {
        Self {
            kind: "file",
            path: attachment.path.display().to_string(),
            display_name: attachment.display_name.clone(),
        }
    }
}

/// `session.send` parameters
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendParams {
    pub session_id: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentParams>,
}

/// `session.send` result
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResult {
    pub message_id: String,
}

/// `session.list` result
#[derive(Debug, Clone, Deserialize)]
pub struct ListSessionsResult {
    #[serde(default)]
    pub sessions: Vec<SessionMetadata>,
}

/// One entry of `session.list`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    pub session_id: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub modified_time: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl From<SessionMetadata> for SessionSummary {
    /// Timestamps that are not RFC 3339 are dropped rather than failing the
    /// whole listing.
    fn from(meta: SessionMetadata) -> Self {
        let parse = |s: Option<String>| {
            s.and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                .map(|t| t.with_timezone(&Utc))
        };
        SessionSummary {
            session_id: meta.session_id,
            start_time: parse(meta.start_time),
            modified_time: parse(meta.modified_time),
            summary: meta.summary,
        }
    }
}

// ==================== Events ====================

/// Params of a `session.event` notification
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEventParams {
    pub session_id: String,
    pub event: WireEvent,
}

/// A session event as sent by the CLI, before decoding
#[derive(Debug, Clone, Deserialize)]
pub struct WireEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Parameters for a `tool.call` request from the Copilot CLI.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallParams {
    pub session_id: String,
    #[serde(default)]
    pub tool_call_id: String,
    pub tool_name: String,
}

/// Result payload for a `tool.call` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    /// The text result that the LLM should see.
    pub text_result_for_llm: String,
    /// Result type: "text" for normal results, "error" for errors.
    pub result_type: String,
}

impl ToolCallResult {
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text_result_for_llm: text.into(),
            result_type: "error".to_string(),
        }
    }

    pub fn into_rpc_value(self) -> serde_json::Value {
        serde_json::json!({ "result": self })
    }
}
