//! Persist sessions use case.
//!
//! Walks a session through its whole persisted lifecycle: create with a
//! fixed identifier, destroy, resume by that identifier, list, and finally
//! delete. Every step is fatal on failure; the client is still stopped.

use crate::ports::assistant_client::{AssistantClient, AssistantSession};
use crate::ports::progress::RecipeProgress;
use crate::use_cases::error::RecipeError;
use crate::use_cases::scope::{release_session, with_client};
use recipes_domain::{MessageOptions, Model, PromptTemplate, SessionConfig};
use std::sync::Arc;
use tracing::{debug, info};

/// Identifier the conversation is stored under
pub const DEFAULT_SESSION_ID: &str = "user-123-conversation";

/// Input for the [`PersistSessionsUseCase`].
#[derive(Debug, Clone)]
pub struct PersistSessionsInput {
    pub model: Model,
    pub session_id: String,
}

impl PersistSessionsInput {
    pub fn new(model: Model) -> Self {
        Self {
            model,
            session_id: DEFAULT_SESSION_ID.to_string(),
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }
}

/// Result of the [`PersistSessionsUseCase`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistSessionsOutput {
    /// Identifier reported by the resumed handle
    pub resumed_id: String,
    /// Reply to the question asked after resuming
    pub resumed_reply: Option<String>,
    /// Every session the backend listed before deletion
    pub listed_ids: Vec<String>,
}

/// Use case behind the `persisting-sessions` recipe.
pub struct PersistSessionsUseCase {
    client: Arc<dyn AssistantClient>,
}

impl PersistSessionsUseCase {
    pub fn new(client: Arc<dyn AssistantClient>) -> Self {
        Self { client }
    }

    pub async fn execute(
        &self,
        input: PersistSessionsInput,
        progress: Arc<dyn RecipeProgress>,
    ) -> Result<PersistSessionsOutput, RecipeError> {
        let client = self.client.as_ref();
        let progress = progress.as_ref();

        with_client(client, move || async move {
            let config = SessionConfig::new(input.model).with_session_id(&input.session_id);
            let session = client
                .create_session(config)
                .await
                .map_err(RecipeError::SessionUnavailable)?;
            progress.on_session_created(session.session_id());

            let first = session
                .send_and_wait(MessageOptions::new(PromptTemplate::persisted_topic()))
                .await;
            if let Ok(Some(reply)) = &first {
                progress.on_response(reply);
            }
            // Destroy before propagating so the handle never outlives a failure
            session.destroy().await.map_err(RecipeError::Client)?;
            first.map_err(RecipeError::SendFailed)?;
            progress.on_session_destroyed(session.session_id());
            info!("Session {} destroyed, state kept", session.session_id());

            let resumed = client
                .resume_session(&input.session_id)
                .await
                .map_err(RecipeError::SessionUnavailable)?;
            progress.on_session_resumed(resumed.session_id());

            let outcome = resume_and_clean_up(client, resumed.as_ref(), progress).await;
            if outcome.is_err() {
                release_session(resumed.as_ref()).await;
                return outcome;
            }

            // The conversation is already deleted, so nothing is reported
            resumed.destroy().await?;
            debug!("Resumed handle {} destroyed", resumed.session_id());
            outcome
        })
        .await
    }
}

/// Ask about the earlier conversation, list what the backend stores, then
/// delete the conversation permanently.
async fn resume_and_clean_up(
    client: &dyn AssistantClient,
    resumed: &dyn AssistantSession,
    progress: &dyn RecipeProgress,
) -> Result<PersistSessionsOutput, RecipeError> {
    let resumed_reply = resumed
        .send_and_wait(MessageOptions::new(PromptTemplate::resumed_question()))
        .await
        .map_err(RecipeError::SendFailed)?;
    if let Some(reply) = &resumed_reply {
        progress.on_response(reply);
    }

    let listed_ids: Vec<String> = client
        .list_sessions()
        .await?
        .into_iter()
        .map(|s| s.session_id)
        .collect();
    progress.on_sessions_listed(&listed_ids);

    client.delete_session(resumed.session_id()).await?;
    progress.on_session_deleted(resumed.session_id());

    Ok(PersistSessionsOutput {
        resumed_id: resumed.session_id().to_string(),
        resumed_reply,
        listed_ids,
    })
}
