//! Assistant client port
//!
//! Defines the interface the recipes use to talk to the assistant backend.
//! The adapter (a JSON-RPC client for the Copilot CLI) lives in the
//! infrastructure layer; tests substitute an in-memory implementation.

use async_trait::async_trait;
use recipes_domain::{MessageOptions, Model, SessionConfig, SessionEvent, SessionSummary};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors that can occur during client or session operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Client not started")]
    NotStarted,

    #[error("Failed to start client: {0}")]
    StartFailed(String),

    #[error("Failed to stop client: {0}")]
    StopFailed(String),

    #[error("Session unavailable: {0}")]
    SessionUnavailable(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("RPC error (code {code}): {message}")]
    Rpc { code: i64, message: String },

    #[error("Transport closed")]
    TransportClosed,

    #[error("Other error: {0}")]
    Other(String),
}

/// Callback invoked once per session event, in emission order.
///
/// Runs on the client's dispatch task, concurrently with the caller's own
/// flow. It must return quickly: print, or hand the value off through a
/// channel with `try_send`.
pub type EventHandler = Arc<dyn Fn(&SessionEvent) + Send + Sync>;

/// Handle returned by [`AssistantSession::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Client for the assistant backend
///
/// One client serves any number of sessions. It must be started before use
/// and stopped on every exit path; see
/// [`with_client`](crate::use_cases::scope::with_client).
#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// Launch or connect to the backend
    async fn start(&self) -> Result<(), ClientError>;

    /// Shut the backend connection down
    async fn stop(&self) -> Result<(), ClientError>;

    /// Create a new session
    async fn create_session(
        &self,
        config: SessionConfig,
    ) -> Result<Box<dyn AssistantSession>, ClientError>;

    /// Reattach to a persisted session by identifier
    async fn resume_session(&self, session_id: &str)
    -> Result<Box<dyn AssistantSession>, ClientError>;

    /// List persisted sessions
    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, ClientError>;

    /// Permanently erase a persisted session
    async fn delete_session(&self, session_id: &str) -> Result<(), ClientError>;
}

/// An active conversation session
#[async_trait]
pub trait AssistantSession: Send + Sync {
    /// Identifier used for resumption and deletion
    fn session_id(&self) -> &str;

    /// Model the session was created with, if known (resumed sessions
    /// may not report one)
    fn model(&self) -> Option<&Model>;

    /// Subscribe to every event of this session
    fn on(&self, handler: EventHandler) -> SubscriptionId;

    /// Remove a subscription. Returns false if it was already gone.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    /// Submit a prompt. Returns the message ID once the backend accepted
    /// it; the reply arrives later as events. A destroyed session fails
    /// with [`ClientError::SendFailed`].
    async fn send(&self, options: MessageOptions) -> Result<String, ClientError>;

    /// Block until the session reports it has no outstanding work
    async fn wait_for_idle(&self) -> Result<(), ClientError>;

    /// Release in-memory resources. Persisted state is kept until
    /// [`AssistantClient::delete_session`].
    async fn destroy(&self) -> Result<(), ClientError>;

    /// Send a prompt, wait for idle, and return the last assistant message
    /// observed during the turn.
    async fn send_and_wait(&self, options: MessageOptions) -> Result<Option<String>, ClientError> {
        let last_message: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&last_message);
        let subscription = self.on(Arc::new(move |event: &SessionEvent| {
            if let Some(content) = event.assistant_content() {
                *sink.lock().unwrap_or_else(|e| e.into_inner()) = Some(content.to_string());
            }
        }));

        let outcome = async {
            self.send(options).await?;
            self.wait_for_idle().await
        }
        .await;
        self.unsubscribe(subscription);
        outcome?;

        let content = last_message.lock().unwrap_or_else(|e| e.into_inner()).take();
        Ok(content)
    }
}
