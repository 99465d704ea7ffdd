//! Single prompt use case.
//!
//! Sends one prompt and hands the first assistant message from the event
//! handler to the calling flow through a single-slot channel.

use crate::ports::assistant_client::{AssistantClient, AssistantSession};
use crate::ports::progress::RecipeProgress;
use crate::use_cases::error::RecipeError;
use crate::use_cases::scope::{with_client, with_session};
use recipes_domain::{MessageOptions, Model, PromptTemplate, SessionConfig, SessionEvent};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Input for the [`SinglePromptUseCase`].
#[derive(Debug, Clone)]
pub struct SinglePromptInput {
    pub model: Model,
    pub prompt: String,
}

impl SinglePromptInput {
    /// Greet the assistant with the given model
    pub fn new(model: Model) -> Self {
        Self {
            model,
            prompt: PromptTemplate::greeting().to_string(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }
}

/// What the event handler passes to the waiting flow.
///
/// Only the first outcome of a turn is kept; idle and error are included
/// so a turn that never produces a message still releases the waiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Message(String),
    Failed(String),
    Finished,
}

impl TurnOutcome {
    pub fn from_event(event: &SessionEvent) -> Option<Self> {
        match event {
            SessionEvent::AssistantMessage { content, .. } => {
                Some(TurnOutcome::Message(content.clone()))
            }
            SessionEvent::SessionError { message } => Some(TurnOutcome::Failed(message.clone())),
            SessionEvent::SessionIdle => Some(TurnOutcome::Finished),
            SessionEvent::AssistantMessageDelta { .. }
            | SessionEvent::ToolExecutionStart { .. }
            | SessionEvent::ToolExecutionComplete { .. }
            | SessionEvent::Other { .. } => None,
        }
    }
}

/// Use case behind the `error-handling` recipe.
pub struct SinglePromptUseCase {
    client: Arc<dyn AssistantClient>,
}

impl SinglePromptUseCase {
    pub fn new(client: Arc<dyn AssistantClient>) -> Self {
        Self { client }
    }

    /// Returns the assistant's reply, or `None` when the prompt could not
    /// be sent or the turn ended without a message.
    pub async fn execute(
        &self,
        input: SinglePromptInput,
        progress: Arc<dyn RecipeProgress>,
    ) -> Result<Option<String>, RecipeError> {
        let client = self.client.as_ref();

        with_client(client, move || async move {
            let session = client
                .create_session(SessionConfig::new(input.model))
                .await
                .map_err(RecipeError::SessionUnavailable)?;
            progress.on_session_created(session.session_id());
            let session_ref: &dyn AssistantSession = session.as_ref();

            with_session(session_ref, move || async move {
                let (tx, mut rx) = mpsc::channel::<TurnOutcome>(1);
                session_ref.on(Arc::new(move |event: &SessionEvent| {
                    if let Some(outcome) = TurnOutcome::from_event(event) {
                        // Slot already taken means an earlier outcome won
                        let _ = tx.try_send(outcome);
                    }
                }));

                if let Err(e) = session_ref.send(MessageOptions::new(input.prompt)).await {
                    warn!("Failed to send message: {}", e);
                    progress.on_send_failed(session_ref.session_id(), &e);
                    return Ok(None);
                }

                match rx.recv().await {
                    Some(TurnOutcome::Message(content)) => {
                        info!("Received assistant reply ({} chars)", content.len());
                        progress.on_response(&content);
                        Ok(Some(content))
                    }
                    Some(TurnOutcome::Failed(message)) => {
                        warn!("Session reported an error: {}", message);
                        Ok(None)
                    }
                    Some(TurnOutcome::Finished) | None => {
                        info!("Turn finished without an assistant message");
                        Ok(None)
                    }
                }
            })
            .await
        })
        .await
    }
}
