//! In-process stand-in for `copilot --server` used by the adapter tests.
//!
//! Listens on `127.0.0.1:0`, accepts a single connection and answers the
//! session methods from an in-memory store. Every `session.send` is
//! answered, then followed by an `assistant.message` echoing the prompt and
//! `session.idle`.

use crate::copilot::protocol::METHOD_NOT_FOUND;
use crate::copilot::transport::{read_frame, write_frame};
use serde_json::{Value, json};
use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{BufReader, BufWriter};
use tokio::net::TcpListener;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

type Writer = Arc<Mutex<Option<BufWriter<OwnedWriteHalf>>>>;

pub(crate) struct FakeCli {
    addr: SocketAddr,
    writer: Writer,
    answers: Mutex<mpsc::UnboundedReceiver<Value>>,
    received: Arc<std::sync::Mutex<Vec<Value>>>,
    handle: JoinHandle<()>,
}

impl FakeCli {
    pub(crate) async fn start() -> Self {
        Self::start_with(false).await
    }

    /// Like [`start`](Self::start), but `session.create` answers with
    /// `server-<requested id>` instead of the requested id.
    pub(crate) async fn start_assigning_ids() -> Self {
        Self::start_with(true).await
    }

    async fn start_with(assign_ids: bool) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let writer: Writer = Arc::new(Mutex::new(None));
        let received = Arc::new(std::sync::Mutex::new(Vec::new()));
        let (answers_tx, answers_rx) = mpsc::unbounded_channel();

        let writer_bg = Arc::clone(&writer);
        let received_bg = Arc::clone(&received);
        let handle = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (read_half, write_half) = stream.into_split();
            *writer_bg.lock().await = Some(BufWriter::new(write_half));
            let mut reader = BufReader::new(read_half);
            let mut store: BTreeSet<String> = BTreeSet::new();
            let mut next_message = 0u64;

            while let Ok(body) = read_frame(&mut reader).await {
                let message: Value = serde_json::from_slice(&body).unwrap();
                received_bg.lock().unwrap().push(message.clone());

                // Answers to requests we pushed (tool.call)
                if message.get("method").is_none() {
                    let _ = answers_tx.send(message);
                    continue;
                }

                let id = message["id"].clone();
                let method = message["method"].as_str().unwrap_or_default().to_string();
                let params = message["params"].clone();
                let session_id = params["sessionId"].as_str().unwrap_or_default().to_string();

                let outcome: Result<Value, (i64, String)> = match method.as_str() {
                    "ping" => Ok(json!({
                        "message": params["message"],
                        "timestamp": 0,
                        "protocolVersion": 1
                    })),
                    "session.create" => {
                        let assigned = if assign_ids {
                            format!("server-{}", session_id)
                        } else {
                            session_id.clone()
                        };
                        store.insert(assigned.clone());
                        Ok(json!({"sessionId": assigned}))
                    }
                    "session.resume" => {
                        if store.contains(&session_id) {
                            Ok(json!({"sessionId": session_id}))
                        } else {
                            Err((-32000, format!("Session not found: {}", session_id)))
                        }
                    }
                    "session.delete" => {
                        if store.remove(&session_id) {
                            Ok(json!({}))
                        } else {
                            Err((-32000, format!("Session not found: {}", session_id)))
                        }
                    }
                    "session.destroy" => Ok(json!({})),
                    "session.list" => Ok(json!({
                        "sessions": store
                            .iter()
                            .map(|id| json!({"sessionId": id, "startTime": "2025-01-15T10:30:00Z"}))
                            .collect::<Vec<_>>()
                    })),
                    "session.send" => {
                        next_message += 1;
                        Ok(json!({"messageId": format!("msg-{}", next_message)}))
                    }
                    other => Err((METHOD_NOT_FOUND, format!("Unknown method {}", other))),
                };

                let response = match outcome {
                    Ok(result) => json!({"jsonrpc": "2.0", "id": id, "result": result}),
                    Err((code, message)) => json!({
                        "jsonrpc": "2.0",
                        "id": id,
                        "error": {"code": code, "message": message}
                    }),
                };

                let mut guard = writer_bg.lock().await;
                let Some(w) = guard.as_mut() else {
                    break;
                };
                write_frame(w, &response).await.unwrap();

                if method == "session.send" {
                    let prompt = params["prompt"].as_str().unwrap_or_default();
                    for event in [
                        json!({"type": "assistant.message", "data": {
                            "messageId": format!("reply-{}", next_message),
                            "content": format!("echo: {}", prompt)
                        }}),
                        json!({"type": "session.idle", "data": {}}),
                    ] {
                        let notification = json!({
                            "jsonrpc": "2.0",
                            "method": "session.event",
                            "params": {"sessionId": session_id, "event": event}
                        });
                        write_frame(w, &notification).await.unwrap();
                    }
                }
            }
        });

        Self {
            addr,
            writer,
            answers: Mutex::new(answers_rx),
            received,
            handle,
        }
    }

    pub(crate) fn url(&self) -> String {
        self.addr.to_string()
    }

    /// Every message the client sent, in arrival order
    pub(crate) fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }

    /// Methods of the received requests, in arrival order
    pub(crate) fn methods(&self) -> Vec<String> {
        self.received()
            .iter()
            .filter_map(|m| m["method"].as_str().map(str::to_string))
            .collect()
    }

    /// Push a `session.event` notification to the client.
    pub(crate) async fn push_event(&self, session_id: &str, event: Value) {
        let notification = json!({
            "jsonrpc": "2.0",
            "method": "session.event",
            "params": {"sessionId": session_id, "event": event}
        });
        self.write(&notification).await;
    }

    /// Ask the client to run a tool, as the CLI does for client-side tools.
    pub(crate) async fn push_tool_call(&self, session_id: &str, tool_name: &str) {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 9000,
            "method": "tool.call",
            "params": {
                "sessionId": session_id,
                "toolCallId": "tc-1",
                "toolName": tool_name,
                "arguments": {}
            }
        });
        self.write(&request).await;
    }

    pub(crate) async fn wait_for_answer(&self, timeout: Duration) -> Option<Value> {
        let mut answers = self.answers.lock().await;
        tokio::time::timeout(timeout, answers.recv()).await.ok().flatten()
    }

    /// Drop the connection as if the CLI had crashed.
    pub(crate) async fn disconnect(&self) {
        // Wait for the accept so there is a connection to drop
        for _ in 0..100 {
            if self.writer.lock().await.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.handle.abort();
        self.writer.lock().await.take();
    }

    async fn write(&self, message: &Value) {
        let mut guard = self.writer.lock().await;
        let w = guard.as_mut().expect("fake CLI has no connection yet");
        write_frame(w, message).await.unwrap();
    }
}

impl Drop for FakeCli {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
