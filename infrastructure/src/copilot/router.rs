//! Transport demultiplexer: message routing for concurrent Copilot CLI sessions.
//!
//! The Copilot CLI communicates over a **single TCP connection** using JSON-RPC 2.0,
//! but one client serves any number of sessions at once (the multiple-sessions
//! recipe keeps three open).
//!
//! [`MessageRouter`] solves this by running a single background reader task that
//! owns the TCP read-half exclusively and routes every incoming frame:
//!
//! - responses go to the `oneshot` channel of the pending request with the same id
//! - `session.event` notifications go to the `mpsc` channel registered for their
//!   `sessionId`
//! - incoming requests (`tool.call`) are answered with an error on the spot

use crate::copilot::error::{CopilotError, Result};
use crate::copilot::protocol::{
    JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, JsonRpcResponseOut, METHOD_NOT_FOUND,
    SessionEventParams, ToolCallParams, ToolCallResult, WireEvent,
};
use crate::copilot::transport::{MessageKind, classify_message, read_frame, write_frame};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::process::{Child, Command};
use tokio::sync::{Mutex, RwLock, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

/// Line the CLI prints on stdout once its server socket is bound.
const PORT_ANNOUNCEMENT: &str = "CLI server listening on port ";

type Routes = Arc<std::sync::RwLock<HashMap<String, mpsc::UnboundedSender<WireEvent>>>>;
type PendingResponses = Arc<RwLock<HashMap<u64, oneshot::Sender<JsonRpcResponse>>>>;
type SharedWriter = Arc<Mutex<BufWriter<OwnedWriteHalf>>>;

/// Central message router for a Copilot CLI connection.
///
/// Owns the write half behind a `Mutex` for serialized sends; the read half
/// belongs to the background reader task. When the reader ends (CLI exit,
/// socket closed) every session channel and pending request is dropped so
/// waiters observe the failure instead of hanging.
pub struct MessageRouter {
    reader_handle: JoinHandle<()>,
    routes: Routes,
    pending_responses: PendingResponses,
    writer: SharedWriter,
    closed: Arc<AtomicBool>,
    /// The spawned CLI, absent when connected to an external server.
    child: std::sync::Mutex<Option<Child>>,
}

impl MessageRouter {
    /// Spawn `<cli_path> --server --log-level <log_level>` and connect to
    /// the port it announces.
    pub async fn spawn(cli_path: &Path, log_level: &str) -> Result<Arc<Self>> {
        debug!(
            "Spawning Copilot CLI: {} --server --log-level {}",
            cli_path.display(),
            log_level
        );

        let mut cmd = Command::new(cli_path);
        cmd.arg("--server")
            .arg("--log-level")
            .arg(log_level)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        // Linux: request kernel to send SIGTERM to child when parent dies.
        // This catches cases where Drop doesn't run (SIGKILL, OOM kill).
        #[cfg(target_os = "linux")]
        unsafe {
            cmd.pre_exec(|| {
                libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
                Ok(())
            });
        }

        let mut child = cmd.spawn()?;

        let stdout = child.stdout.take().ok_or_else(|| {
            CopilotError::SpawnError(std::io::Error::other("Failed to capture stdout"))
        })?;
        let mut stdout_reader = BufReader::new(stdout);

        let port = match read_announced_port(&mut stdout_reader).await {
            Ok(port) => port,
            Err(e) => {
                let _ = child.kill().await;
                return Err(e);
            }
        };

        // Keep draining stdout so the CLI never blocks on a full pipe
        tokio::spawn(async move {
            let mut line = String::new();
            while let Ok(n) = stdout_reader.read_line(&mut line).await {
                if n == 0 {
                    break;
                }
                trace!("Copilot CLI output: {}", line.trim_end());
                line.clear();
            }
        });

        info!("Copilot CLI listening on port {}, connecting...", port);

        match TcpStream::connect(("127.0.0.1", port)).await {
            Ok(stream) => Ok(Self::from_stream(stream, Some(child))),
            Err(e) => {
                let _ = child.kill().await;
                Err(e.into())
            }
        }
    }

    /// Connect to an already running CLI server.
    ///
    /// Accepts `host:port`, a bare port, or either with an `http://` prefix.
    pub async fn connect(cli_url: &str) -> Result<Arc<Self>> {
        let address = normalize_cli_url(cli_url);
        info!("Connecting to Copilot CLI server at {}", address);
        let stream = TcpStream::connect(&address).await?;
        Ok(Self::from_stream(stream, None))
    }

    /// Build a router over an established connection and start its reader.
    pub fn from_stream(stream: TcpStream, child: Option<Child>) -> Arc<Self> {
        let (read_half, write_half) = stream.into_split();

        let routes: Routes = Arc::new(std::sync::RwLock::new(HashMap::new()));
        let pending_responses: PendingResponses = Arc::new(RwLock::new(HashMap::new()));
        let writer: SharedWriter = Arc::new(Mutex::new(BufWriter::new(write_half)));
        let closed = Arc::new(AtomicBool::new(false));

        let reader_handle = tokio::spawn(Self::reader_loop(
            read_half,
            Arc::clone(&routes),
            Arc::clone(&pending_responses),
            Arc::clone(&writer),
            Arc::clone(&closed),
        ));

        Arc::new(Self {
            reader_handle,
            routes,
            pending_responses,
            writer,
            closed,
            child: std::sync::Mutex::new(child),
        })
    }

    async fn reader_loop(
        read_half: OwnedReadHalf,
        routes: Routes,
        pending_responses: PendingResponses,
        writer: SharedWriter,
        closed: Arc<AtomicBool>,
    ) {
        let mut reader = BufReader::new(read_half);

        loop {
            let body = match read_frame(&mut reader).await {
                Ok(body) => body,
                Err(CopilotError::TransportClosed) => {
                    debug!("Router: connection closed");
                    break;
                }
                Err(e) => {
                    warn!("Router: failed to read frame: {}", e);
                    break;
                }
            };

            let json_value: serde_json::Value = match serde_json::from_slice(&body) {
                Ok(v) => v,
                Err(e) => {
                    warn!(
                        "Router: failed to parse JSON: {} ({})",
                        e,
                        String::from_utf8_lossy(&body)
                    );
                    continue;
                }
            };
            trace!("Router received: {}", json_value);

            match classify_message(&json_value) {
                MessageKind::Response => {
                    Self::complete_request(json_value, &pending_responses).await;
                }
                MessageKind::IncomingRequest { id } => {
                    Self::reject_request(id, &json_value, &writer).await;
                }
                MessageKind::Notification => {
                    Self::route_notification(json_value, &routes);
                }
            }
        }

        // Reader ended: drop all senders so receivers get None
        info!("Router: reader loop ended, closing all session channels");
        closed.store(true, Ordering::SeqCst);
        routes.write().unwrap_or_else(|e| e.into_inner()).clear();
        pending_responses.write().await.clear();
    }

    async fn complete_request(json_value: serde_json::Value, pending_responses: &PendingResponses) {
        let response: JsonRpcResponse = match serde_json::from_value(json_value) {
            Ok(r) => r,
            Err(e) => {
                warn!("Router: failed to parse response: {}", e);
                return;
            }
        };
        let Some(id) = response.id else {
            return;
        };

        let sender = pending_responses.write().await.remove(&id);
        match sender {
            Some(tx) => {
                let _ = tx.send(response);
            }
            None => debug!("Router: no pending receiver for response id={}", id),
        }
    }

    /// Answer a request from the CLI. Client-side tools are not offered, so
    /// `tool.call` gets an error result and anything else "method not found".
    async fn reject_request(id: u64, json_value: &serde_json::Value, writer: &SharedWriter) {
        let method = json_value
            .get("method")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        let response = if method == "tool.call" {
            let tool_name = json_value
                .get("params")
                .and_then(|p| serde_json::from_value::<ToolCallParams>(p.clone()).ok())
                .map(|p| p.tool_name)
                .unwrap_or_default();
            warn!("Router: rejecting tool.call for '{}' (id={})", tool_name, id);
            JsonRpcResponseOut::new(
                id,
                ToolCallResult::error(format!("Tool '{}' is not available", tool_name))
                    .into_rpc_value(),
            )
        } else {
            debug!("Router: unsupported incoming request method={}", method);
            JsonRpcResponseOut::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not supported: {}", method),
            )
        };

        let mut w = writer.lock().await;
        if let Err(e) = write_frame(&mut *w, &response).await {
            warn!("Router: failed to answer request id={}: {}", id, e);
        }
    }

    fn route_notification(json_value: serde_json::Value, routes: &Routes) {
        let notification: JsonRpcNotification = match serde_json::from_value(json_value) {
            Ok(n) => n,
            Err(e) => {
                warn!("Router: failed to parse notification: {}", e);
                return;
            }
        };

        if notification.method != "session.event" {
            trace!(
                "Router: ignoring notification method={}",
                notification.method
            );
            return;
        }

        let params: SessionEventParams = match notification
            .params
            .map(serde_json::from_value)
            .transpose()
        {
            Ok(Some(params)) => params,
            Ok(None) => {
                debug!("Router: session.event without params");
                return;
            }
            Err(e) => {
                debug!("Router: session.event without sessionId/event: {}", e);
                return;
            }
        };

        let routes_read = routes.read().unwrap_or_else(|e| e.into_inner());
        match routes_read.get(&params.session_id) {
            Some(tx) => {
                let _ = tx.send(params.event);
            }
            None => debug!(
                "Router: no route for session_id={}, dropping event type={}",
                params.session_id, params.event.event_type
            ),
        }
    }

    /// Send a request and wait for its result.
    ///
    /// A JSON-RPC error in the response becomes [`CopilotError::RpcError`].
    pub async fn request<R, P>(&self, method: &str, params: P) -> Result<R>
    where
        R: DeserializeOwned,
        P: Serialize,
    {
        let request = JsonRpcRequest::new(method, Some(serde_json::to_value(params)?));
        debug!("Router: {} (id={})", method, request.id);
        let response = self.round_trip(&request).await?;

        if let Some(error) = response.error {
            return Err(CopilotError::RpcError {
                code: error.code,
                message: error.message,
            });
        }

        let result = response.result.unwrap_or(serde_json::Value::Null);
        serde_json::from_value(result.clone()).map_err(|e| CopilotError::ParseError {
            error: e.to_string(),
            raw: result.to_string(),
        })
    }

    async fn round_trip(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse> {
        let (tx, rx) = oneshot::channel();
        let request_id = request.id;

        self.pending_responses.write().await.insert(request_id, tx);

        // The reader clears pending entries after setting `closed`, so an
        // entry inserted after that clear is caught here.
        if self.closed.load(Ordering::SeqCst) {
            self.pending_responses.write().await.remove(&request_id);
            return Err(CopilotError::RouterStopped);
        }

        let sent = {
            let mut writer = self.writer.lock().await;
            write_frame(&mut *writer, request).await
        };
        if let Err(e) = sent {
            // Clean up the pending entry to prevent leaks
            self.pending_responses.write().await.remove(&request_id);
            return Err(e);
        }

        rx.await.map_err(|_| CopilotError::RouterStopped)
    }

    /// Route `session.event` notifications for `session_id` to the returned
    /// receiver. Registering before the session exists is allowed; events
    /// sent while the create request is in flight are not lost.
    pub fn register_session(&self, session_id: &str) -> mpsc::UnboundedReceiver<WireEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut routes = self.routes.write().unwrap_or_else(|e| e.into_inner());
        routes.insert(session_id.to_string(), tx);
        if self.closed.load(Ordering::SeqCst) {
            // Reader already gone: leave the receiver disconnected
            routes.remove(session_id);
        }
        debug!("Router: registered session {}", session_id);
        rx
    }

    /// Stop routing events for a session. Its receiver sees end of stream.
    pub fn deregister_session(&self, session_id: &str) {
        let mut routes = self.routes.write().unwrap_or_else(|e| e.into_inner());
        if routes.remove(session_id).is_some() {
            debug!("Router: deregistered session {}", session_id);
        }
    }

    /// Move a session's route to a new id, keeping its receiver and any
    /// events already queued on it. Returns false if `from` had no route.
    pub fn reroute_session(&self, from: &str, to: &str) -> bool {
        let mut routes = self.routes.write().unwrap_or_else(|e| e.into_inner());
        match routes.remove(from) {
            Some(tx) => {
                routes.insert(to.to_string(), tx);
                debug!("Router: rerouted session {} to {}", from, to);
                true
            }
            None => false,
        }
    }

    /// True once the connection is gone.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Close the connection and terminate the spawned CLI, if any.
    pub async fn shutdown(&self) -> Result<()> {
        self.reader_handle.abort();
        self.closed.store(true, Ordering::SeqCst);
        self.routes
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        self.pending_responses.write().await.clear();

        if let Err(e) = self.writer.lock().await.shutdown().await {
            debug!("Router: socket shutdown: {}", e);
        }

        let child = self.child.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(mut child) = child {
            match child.try_wait()? {
                Some(status) => debug!("Copilot CLI already exited: {}", status),
                None => {
                    child.kill().await?;
                    info!("Copilot CLI terminated");
                }
            }
        }
        Ok(())
    }
}

impl Drop for MessageRouter {
    fn drop(&mut self) {
        self.reader_handle.abort();
        if let Some(child) = self
            .child
            .get_mut()
            .unwrap_or_else(|e| e.into_inner())
            .as_mut()
        {
            debug!("MessageRouter dropping, killing copilot-cli child process");
            let _ = child.start_kill();
        }
    }
}

/// Read the CLI's stdout until it announces its port.
pub async fn read_announced_port<R>(reader: &mut R) -> Result<u16>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Err(CopilotError::UnexpectedResponse(
                "Copilot CLI exited without announcing port".into(),
            ));
        }

        let trimmed = line.trim();
        debug!("Copilot CLI output: {}", trimmed);

        if let Some(port_str) = trimmed.strip_prefix(PORT_ANNOUNCEMENT) {
            return port_str.trim().parse::<u16>().map_err(|_| {
                CopilotError::UnexpectedResponse(format!(
                    "Failed to parse port number: {}",
                    port_str
                ))
            });
        }
    }
}

/// `3000` → `127.0.0.1:3000`, `http://host:3000` → `host:3000`
pub fn normalize_cli_url(cli_url: &str) -> String {
    let trimmed = cli_url.trim();
    let without_scheme = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .unwrap_or(trimmed)
        .trim_end_matches('/');

    if !without_scheme.is_empty() && without_scheme.chars().all(|c| c.is_ascii_digit()) {
        format!("127.0.0.1:{}", without_scheme)
    } else {
        without_scheme.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::copilot::fake_cli::FakeCli;
    use crate::copilot::protocol::{PingParams, PingResult, SessionIdParams};
    use std::time::Duration;

    #[tokio::test]
    async fn announced_port_is_parsed_after_other_output() {
        let output = b"Starting up\nCLI server listening on port 41234\n";
        let mut reader = BufReader::new(&output[..]);
        assert_eq!(read_announced_port(&mut reader).await.unwrap(), 41234);
    }

    #[tokio::test]
    async fn missing_port_announcement_is_an_error() {
        let output = b"error: not logged in\n";
        let mut reader = BufReader::new(&output[..]);
        assert!(matches!(
            read_announced_port(&mut reader).await,
            Err(CopilotError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn cli_url_forms() {
        assert_eq!(normalize_cli_url("3000"), "127.0.0.1:3000");
        assert_eq!(normalize_cli_url("localhost:3000"), "localhost:3000");
        assert_eq!(normalize_cli_url("http://127.0.0.1:4321/"), "127.0.0.1:4321");
    }

    #[tokio::test]
    async fn request_correlates_response() {
        let cli = FakeCli::start().await;
        let router = MessageRouter::connect(&cli.url()).await.unwrap();

        let pong: PingResult = router
            .request(
                "ping",
                PingParams {
                    message: "hello".into(),
                },
            )
            .await
            .unwrap();

        assert_eq!(pong.message, "hello");
        assert_eq!(pong.protocol_version, Some(1));
        router.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn rpc_error_is_surfaced() {
        let cli = FakeCli::start().await;
        let router = MessageRouter::connect(&cli.url()).await.unwrap();

        let err = router
            .request::<serde_json::Value, _>("session.resume", SessionIdParams::new("missing"))
            .await
            .unwrap_err();

        assert!(err.is_rpc());
    }

    #[tokio::test]
    async fn tool_call_requests_are_rejected() {
        let cli = FakeCli::start().await;
        let router = MessageRouter::connect(&cli.url()).await.unwrap();
        // Any request makes the fake accept the connection before pushing
        let _: PingResult = router
            .request("ping", PingParams { message: "x".into() })
            .await
            .unwrap();

        cli.push_tool_call("s-1", "read_file").await;
        let answer = cli.wait_for_answer(Duration::from_secs(5)).await.unwrap();

        assert_eq!(answer["result"]["result"]["resultType"], "error");
    }

    #[tokio::test]
    async fn rerouted_session_keeps_queued_events() {
        let cli = FakeCli::start().await;
        let router = MessageRouter::connect(&cli.url()).await.unwrap();
        let mut events = router.register_session("requested");
        let _: PingResult = router
            .request("ping", PingParams { message: "x".into() })
            .await
            .unwrap();

        cli.push_event("requested", serde_json::json!({"type": "session.start", "data": {}}))
            .await;
        // The ping answer is read after the event, so the event is queued
        let _: PingResult = router
            .request("ping", PingParams { message: "y".into() })
            .await
            .unwrap();

        assert!(router.reroute_session("requested", "assigned"));
        assert!(!router.reroute_session("requested", "elsewhere"));
        cli.push_event("requested", serde_json::json!({"type": "session.idle", "data": {}}))
            .await;
        cli.push_event("assigned", serde_json::json!({"type": "session.idle", "data": {}}))
            .await;

        let first = events.recv().await.unwrap();
        let second = events.recv().await.unwrap();
        assert_eq!(first.event_type, "session.start");
        assert_eq!(second.event_type, "session.idle");
        router.shutdown().await.unwrap();
        assert!(events.recv().await.is_none());
    }

    #[tokio::test]
    async fn closing_connection_stops_routes_and_requests() {
        let cli = FakeCli::start().await;
        let router = MessageRouter::connect(&cli.url()).await.unwrap();
        let mut events = router.register_session("s-1");

        cli.disconnect().await;

        assert!(events.recv().await.is_none());
        let err = router
            .request::<PingResult, _>("ping", PingParams { message: "x".into() })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CopilotError::RouterStopped | CopilotError::SpawnError(_)
        ));
        assert!(router.is_closed());
    }
}
