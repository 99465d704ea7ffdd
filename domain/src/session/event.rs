//! Events emitted by a session while it processes a prompt.
//!
//! [`SessionEvent`] is a closed set: callers match on it exhaustively
//! instead of probing the type of an opaque event object. Wire event types
//! the recipes have no use for are preserved as [`SessionEvent::Other`] so
//! nothing is silently dropped.

/// An asynchronous notification from a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A complete assistant message (corresponds to `assistant.message`).
    AssistantMessage {
        message_id: Option<String>,
        content: String,
    },
    /// A streamed fragment of an assistant message.
    AssistantMessageDelta { content: String },
    /// The assistant started running a tool.
    ToolExecutionStart {
        tool_call_id: Option<String>,
        tool_name: String,
    },
    /// A tool run finished.
    ToolExecutionComplete {
        tool_call_id: Option<String>,
        tool_name: String,
        success: bool,
    },
    /// The session has no outstanding work.
    SessionIdle,
    /// The backend reported a failure while processing the turn.
    SessionError { message: String },
    /// Any other event type reported by the backend.
    Other { event_type: String },
}

impl SessionEvent {
    /// The wire name of this event.
    pub fn event_type(&self) -> &str {
        match self {
            SessionEvent::AssistantMessage { .. } => "assistant.message",
            SessionEvent::AssistantMessageDelta { .. } => "assistant.message_delta",
            SessionEvent::ToolExecutionStart { .. } => "tool.execution_start",
            SessionEvent::ToolExecutionComplete { .. } => "tool.execution_complete",
            SessionEvent::SessionIdle => "session.idle",
            SessionEvent::SessionError { .. } => "session.error",
            SessionEvent::Other { event_type } => event_type,
        }
    }

    /// Returns the text content of a complete assistant message.
    pub fn assistant_content(&self) -> Option<&str> {
        match self {
            SessionEvent::AssistantMessage { content, .. } => Some(content),
            _ => None,
        }
    }

    /// Returns true if this event ends the current turn.
    pub fn ends_turn(&self) -> bool {
        matches!(
            self,
            SessionEvent::SessionIdle | SessionEvent::SessionError { .. }
        )
    }
}
