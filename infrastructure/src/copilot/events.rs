//! Decoding of wire events into [`SessionEvent`].

use crate::copilot::protocol::WireEvent;
use recipes_domain::SessionEvent;
use serde_json::Value;
use std::collections::HashMap;
use tracing::trace;

fn str_field(data: &Value, key: &str) -> Option<String> {
    data.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

/// Turns wire events of one session into [`SessionEvent`]s.
///
/// Stateful because `tool.execution_complete` does not always repeat the
/// tool name; it is looked up from the matching start by `toolCallId`.
#[derive(Debug, Default)]
pub struct EventDecoder {
    tool_names: HashMap<String, String>,
}

impl EventDecoder {
    pub fn decode(&mut self, event: &WireEvent) -> SessionEvent {
        let data = &event.data;
        match event.event_type.as_str() {
            "assistant.message" => SessionEvent::AssistantMessage {
                message_id: str_field(data, "messageId"),
                content: str_field(data, "content").unwrap_or_default(),
            },
            "assistant.message_delta" | "assistant.message.delta" => {
                SessionEvent::AssistantMessageDelta {
                    content: str_field(data, "deltaContent")
                        .or_else(|| str_field(data, "content"))
                        .unwrap_or_default(),
                }
            }
            "tool.execution_start" => {
                let tool_call_id = str_field(data, "toolCallId");
                let tool_name = str_field(data, "toolName").unwrap_or_else(|| "unknown".into());
                if let Some(id) = &tool_call_id {
                    self.tool_names.insert(id.clone(), tool_name.clone());
                }
                SessionEvent::ToolExecutionStart {
                    tool_call_id,
                    tool_name,
                }
            }
            "tool.execution_complete" => {
                let tool_call_id = str_field(data, "toolCallId");
                let remembered = tool_call_id
                    .as_ref()
                    .and_then(|id| self.tool_names.remove(id));
                let tool_name = str_field(data, "toolName")
                    .or(remembered)
                    .unwrap_or_else(|| "unknown".into());
                SessionEvent::ToolExecutionComplete {
                    tool_call_id,
                    tool_name,
                    success: data.get("success").and_then(|v| v.as_bool()).unwrap_or(true),
                }
            }
            "session.idle" => SessionEvent::SessionIdle,
            "session.error" => SessionEvent::SessionError {
                message: str_field(data, "message")
                    .unwrap_or_else(|| "Unknown session error".into()),
            },
            other => {
                trace!("Unmapped event type '{}'", other);
                SessionEvent::Other {
                    event_type: other.to_string(),
                }
            }
        }
    }
}
