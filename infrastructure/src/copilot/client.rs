//! Copilot client implementation
//!
//! [`CopilotClient`] implements [`AssistantClient`] on top of a
//! [`MessageRouter`]. `start` either spawns `copilot --server` or connects to
//! an already running server, then verifies the connection with `ping`.

use crate::copilot::error::CopilotError;
use crate::copilot::protocol::{
    CreateSessionParams, ListSessionsResult, PingParams, PingResult, SessionIdParams,
    SessionResult, WireEvent,
};
use crate::copilot::router::MessageRouter;
use crate::copilot::session::CopilotSession;
use async_trait::async_trait;
use recipes_application::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use recipes_application::{AssistantClient, AssistantSession, ClientError};
use recipes_domain::{Model, SessionConfig, SessionSummary};
use serde_json::json;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Connection settings for [`CopilotClient`]
#[derive(Clone)]
pub struct ClientOptions {
    /// Executable to spawn; a bare name is looked up on `PATH`
    pub cli_path: PathBuf,
    /// Connect to this server instead of spawning one
    pub cli_url: Option<String>,
    /// Passed to the CLI as `--log-level`
    pub log_level: String,
    pub conversation_logger: Arc<dyn ConversationLogger>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            cli_path: PathBuf::from("copilot"),
            cli_url: None,
            log_level: "error".to_string(),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }
}

impl std::fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientOptions")
            .field("cli_path", &self.cli_path)
            .field("cli_url", &self.cli_url)
            .field("log_level", &self.log_level)
            .finish_non_exhaustive()
    }
}

/// Assistant client backed by the GitHub Copilot CLI
pub struct CopilotClient {
    options: ClientOptions,
    router: Mutex<Option<Arc<MessageRouter>>>,
}

impl CopilotClient {
    pub fn new(options: ClientOptions) -> Self {
        Self {
            options,
            router: Mutex::new(None),
        }
    }

    fn router(&self) -> Result<Arc<MessageRouter>, ClientError> {
        self.router
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or(ClientError::NotStarted)
    }

    async fn open_router(&self) -> Result<Arc<MessageRouter>, CopilotError> {
        if let Some(url) = &self.options.cli_url {
            return MessageRouter::connect(url).await;
        }

        let cli_path = which::which(&self.options.cli_path).map_err(|e| {
            CopilotError::CliNotFound(format!("{}: {}", self.options.cli_path.display(), e))
        })?;
        MessageRouter::spawn(&cli_path, &self.options.log_level).await
    }

    fn attach(
        &self,
        router: Arc<MessageRouter>,
        session_id: String,
        model: Option<Model>,
        events: mpsc::UnboundedReceiver<WireEvent>,
    ) -> Box<dyn AssistantSession> {
        Box::new(CopilotSession::attach(
            router,
            session_id,
            model,
            events,
            Arc::clone(&self.options.conversation_logger),
        ))
    }
}

#[async_trait]
impl AssistantClient for CopilotClient {
    async fn start(&self) -> Result<(), ClientError> {
        if self.router.lock().unwrap_or_else(|e| e.into_inner()).is_some() {
            debug!("Copilot client already started");
            return Ok(());
        }

        let router = self
            .open_router()
            .await
            .map_err(|e| ClientError::StartFailed(e.to_string()))?;

        let ping = router
            .request::<PingResult, _>(
                "ping",
                PingParams {
                    message: "copilot-recipes".to_string(),
                },
            )
            .await;
        match ping {
            Ok(pong) => {
                info!(
                    "Copilot CLI ready (protocol version {})",
                    pong.protocol_version
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "unknown".into())
                );
            }
            Err(e) => {
                if let Err(shutdown) = router.shutdown().await {
                    warn!("Failed to shut down after ping failure: {}", shutdown);
                }
                return Err(ClientError::StartFailed(format!("ping failed: {}", e)));
            }
        }

        *self.router.lock().unwrap_or_else(|e| e.into_inner()) = Some(router);
        Ok(())
    }

    async fn stop(&self) -> Result<(), ClientError> {
        let router = self.router.lock().unwrap_or_else(|e| e.into_inner()).take();
        let Some(router) = router else {
            return Ok(());
        };

        router
            .shutdown()
            .await
            .map_err(|e| ClientError::StopFailed(e.to_string()))?;
        info!("Copilot client stopped");
        Ok(())
    }

    async fn create_session(
        &self,
        config: SessionConfig,
    ) -> Result<Box<dyn AssistantSession>, ClientError> {
        let router = self.router()?;
        let session_id = config
            .session_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        // Route first so events emitted during creation are kept
        let events = router.register_session(&session_id);
        let params = CreateSessionParams {
            session_id: session_id.clone(),
            model: config.model.to_string(),
            system_message: config.system_message.clone(),
        };

        let created = match router
            .request::<SessionResult, _>("session.create", params)
            .await
        {
            Ok(created) => created,
            Err(e) => {
                router.deregister_session(&session_id);
                return Err(ClientError::SessionUnavailable(e.to_string()));
            }
        };

        let session_id = if created.session_id != session_id {
            // The backend chose its own id; move the route over
            warn!(
                "session.create returned {} for requested {}",
                created.session_id, session_id
            );
            router.reroute_session(&session_id, &created.session_id);
            created.session_id
        } else {
            session_id
        };

        info!("Created session {} ({})", session_id, config.model);
        self.options.conversation_logger.log(ConversationEvent::new(
            "session_created",
            json!({
                "session_id": session_id,
                "model": config.model.as_str(),
            }),
        ));
        Ok(self.attach(router, session_id, Some(config.model), events))
    }

    async fn resume_session(
        &self,
        session_id: &str,
    ) -> Result<Box<dyn AssistantSession>, ClientError> {
        let router = self.router()?;
        let events = router.register_session(session_id);

        match router
            .request::<SessionResult, _>("session.resume", SessionIdParams::new(session_id))
            .await
        {
            Ok(resumed) => {
                info!("Resumed session {}", resumed.session_id);
                self.options.conversation_logger.log(ConversationEvent::new(
                    "session_resumed",
                    json!({ "session_id": resumed.session_id }),
                ));
                Ok(self.attach(router, session_id.to_string(), None, events))
            }
            Err(e) => {
                router.deregister_session(session_id);
                if e.is_rpc() {
                    Err(ClientError::SessionNotFound(session_id.to_string()))
                } else {
                    Err(ClientError::SessionUnavailable(e.to_string()))
                }
            }
        }
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, ClientError> {
        let router = self.router()?;
        let listed = router
            .request::<ListSessionsResult, _>("session.list", json!({}))
            .await?;
        Ok(listed.sessions.into_iter().map(SessionSummary::from).collect())
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), ClientError> {
        let router = self.router()?;
        match router
            .request::<serde_json::Value, _>("session.delete", SessionIdParams::new(session_id))
            .await
        {
            Ok(_) => {
                info!("Deleted session {}", session_id);
                Ok(())
            }
            Err(e) if e.is_rpc() => Err(ClientError::SessionNotFound(session_id.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}
