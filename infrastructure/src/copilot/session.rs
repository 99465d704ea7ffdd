//! Copilot session management.
//!
//! Provides [`CopilotSession`] which implements [`AssistantSession`] for one
//! conversation on a shared [`MessageRouter`].
//!
//! Each session owns a dispatch task that drains the session's event channel,
//! decodes events and invokes subscribed handlers in order. The task also
//! keeps the idle flag `wait_for_idle` blocks on.

use crate::copilot::error::CopilotError;
use crate::copilot::events::EventDecoder;
use crate::copilot::protocol::{
    AttachmentParams, SendParams, SendResult, SessionIdParams, WireEvent,
};
use crate::copilot::router::MessageRouter;
use async_trait::async_trait;
use recipes_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use recipes_application::{AssistantSession, ClientError, EventHandler, SubscriptionId};
use recipes_domain::{MessageOptions, Model, SessionEvent};
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

type Handlers = Arc<Mutex<Vec<(SubscriptionId, EventHandler)>>>;

/// Turn state shared between the dispatch task and waiters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IdleState {
    idle: bool,
    /// The event stream ended; no further events will arrive
    closed: bool,
}

/// An active conversation session with the Copilot CLI.
pub struct CopilotSession {
    session_id: String,
    model: Option<Model>,
    router: Arc<MessageRouter>,
    handlers: Handlers,
    next_subscription: AtomicU64,
    idle_tx: Arc<watch::Sender<IdleState>>,
    destroyed: AtomicBool,
    dispatcher: JoinHandle<()>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl CopilotSession {
    /// Wrap a session whose route is already registered on `router`.
    pub fn attach(
        router: Arc<MessageRouter>,
        session_id: String,
        model: Option<Model>,
        events: mpsc::UnboundedReceiver<WireEvent>,
        conversation_logger: Arc<dyn ConversationLogger>,
    ) -> Self {
        let handlers: Handlers = Arc::new(Mutex::new(Vec::new()));
        let (idle_tx, _) = watch::channel(IdleState {
            idle: true,
            closed: false,
        });
        let idle_tx = Arc::new(idle_tx);

        let dispatcher = tokio::spawn(dispatch_loop(
            session_id.clone(),
            events,
            Arc::clone(&handlers),
            Arc::clone(&idle_tx),
            Arc::clone(&conversation_logger),
        ));

        Self {
            session_id,
            model,
            router,
            handlers,
            next_subscription: AtomicU64::new(1),
            idle_tx,
            destroyed: AtomicBool::new(false),
            dispatcher,
            conversation_logger,
        }
    }

    fn set_idle(&self, idle: bool) {
        self.idle_tx.send_modify(|state| state.idle = idle);
    }
}

async fn dispatch_loop(
    session_id: String,
    mut events: mpsc::UnboundedReceiver<WireEvent>,
    handlers: Handlers,
    idle_tx: Arc<watch::Sender<IdleState>>,
    conversation_logger: Arc<dyn ConversationLogger>,
) {
    let mut decoder = EventDecoder::default();

    while let Some(wire) = events.recv().await {
        let event = decoder.decode(&wire);
        debug!("Session {}: {}", session_id, event.event_type());
        conversation_logger.log(ConversationEvent::new(
            "session_event",
            json!({
                "session_id": session_id,
                "event_type": wire.event_type,
                "data": wire.data,
            }),
        ));

        // Snapshot so handlers may subscribe or unsubscribe while running
        let snapshot: Vec<EventHandler> = handlers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in snapshot {
            handler(&event);
        }

        if event.ends_turn() {
            idle_tx.send_modify(|state| state.idle = true);
        }
    }

    debug!("Session {}: event stream ended", session_id);
    idle_tx.send_modify(|state| {
        state.idle = true;
        state.closed = true;
    });
}

#[async_trait]
impl AssistantSession for CopilotSession {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    fn on(&self, handler: EventHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::SeqCst));
        self.handlers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, handler));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.lock().unwrap_or_else(|e| e.into_inner());
        let before = handlers.len();
        handlers.retain(|(existing, _)| *existing != id);
        handlers.len() != before
    }

    async fn send(&self, options: MessageOptions) -> Result<String, ClientError> {
        if self.destroyed.load(Ordering::SeqCst) {
            return Err(CopilotError::SessionDestroyed(self.session_id.clone()).into());
        }

        let params = SendParams {
            session_id: self.session_id.clone(),
            prompt: options.prompt.clone(),
            attachments: options.attachments.iter().map(AttachmentParams::from).collect(),
        };

        // Mark busy before the request so a fast reply cannot be missed
        self.set_idle(false);
        match self
            .router
            .request::<SendResult, _>("session.send", params)
            .await
        {
            Ok(result) => {
                debug!(
                    "Session {}: prompt accepted as {}",
                    self.session_id, result.message_id
                );
                self.conversation_logger.log(ConversationEvent::new(
                    "prompt_sent",
                    json!({
                        "session_id": self.session_id,
                        "message_id": result.message_id,
                        "prompt": options.prompt,
                        "attachments": options.attachments.len(),
                    }),
                ));
                Ok(result.message_id)
            }
            Err(e) => {
                self.set_idle(true);
                Err(ClientError::SendFailed(e.to_string()))
            }
        }
    }

    async fn wait_for_idle(&self) -> Result<(), ClientError> {
        let mut rx = self.idle_tx.subscribe();
        let closed = rx
            .wait_for(|state| state.idle)
            .await
            .map_err(|_| ClientError::TransportClosed)?
            .closed;

        if closed && self.router.is_closed() {
            Err(ClientError::TransportClosed)
        } else {
            Ok(())
        }
    }

    async fn destroy(&self) -> Result<(), ClientError> {
        if self.destroyed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let result = self
            .router
            .request::<serde_json::Value, _>("session.destroy", SessionIdParams::new(&self.session_id))
            .await;

        self.router.deregister_session(&self.session_id);
        self.handlers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        self.conversation_logger.log(ConversationEvent::new(
            "session_destroyed",
            json!({ "session_id": self.session_id }),
        ));

        match result {
            Ok(_) => {
                info!("Session {} destroyed", self.session_id);
                Ok(())
            }
            Err(e) => {
                warn!("session.destroy failed for {}: {}", self.session_id, e);
                Err(e.into())
            }
        }
    }
}

impl Drop for CopilotSession {
    fn drop(&mut self) {
        self.router.deregister_session(&self.session_id);
        self.dispatcher.abort();
    }
}
