//! Organize files use case.
//!
//! Asks the assistant to sort a local folder into subfolders using its
//! built-in file tools, forwarding every event to the progress notifier
//! and waiting for the session to go idle.

use crate::ports::assistant_client::{AssistantClient, AssistantSession};
use crate::ports::progress::RecipeProgress;
use crate::use_cases::error::RecipeError;
use crate::use_cases::scope::{with_client, with_session};
use recipes_domain::{MessageOptions, Model, PromptTemplate, SessionConfig, SessionEvent};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Input for the [`OrganizeFilesUseCase`].
#[derive(Debug, Clone)]
pub struct OrganizeFilesInput {
    pub model: Model,
    /// Folder the assistant is asked to organize
    pub target_folder: PathBuf,
}

impl OrganizeFilesInput {
    pub fn new(model: Model, target_folder: impl Into<PathBuf>) -> Self {
        Self {
            model,
            target_folder: target_folder.into(),
        }
    }
}

/// What happened during the turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizeFilesOutput {
    /// `None` if the prompt was never accepted
    pub message_id: Option<String>,
    /// Tools the assistant ran, in completion order
    pub completed_tools: Vec<String>,
}

/// Use case behind the `managing-local-files` recipe.
pub struct OrganizeFilesUseCase {
    client: Arc<dyn AssistantClient>,
}

impl OrganizeFilesUseCase {
    pub fn new(client: Arc<dyn AssistantClient>) -> Self {
        Self { client }
    }

    pub async fn execute(
        &self,
        input: OrganizeFilesInput,
        progress: Arc<dyn RecipeProgress>,
    ) -> Result<OrganizeFilesOutput, RecipeError> {
        info!("Organizing {}", input.target_folder.display());
        let client = self.client.as_ref();

        with_client(client, move || async move {
            let session = client
                .create_session(SessionConfig::new(input.model))
                .await
                .map_err(RecipeError::SessionUnavailable)?;
            progress.on_session_created(session.session_id());
            let session_ref: &dyn AssistantSession = session.as_ref();

            with_session(session_ref, move || async move {
                let completed = Arc::new(Mutex::new(Vec::new()));
                let sink = Arc::clone(&completed);
                let forward = Arc::clone(&progress);
                session_ref.on(Arc::new(move |event: &SessionEvent| {
                    if let SessionEvent::ToolExecutionComplete { tool_name, .. } = event {
                        sink.lock()
                            .unwrap_or_else(|e| e.into_inner())
                            .push(tool_name.clone());
                    }
                    forward.on_event(event);
                }));

                let prompt = PromptTemplate::organize_files(&input.target_folder);
                let message_id = match session_ref.send(MessageOptions::new(prompt)).await {
                    Ok(id) => id,
                    Err(e) => {
                        warn!("Failed to send message: {}", e);
                        progress.on_send_failed(session_ref.session_id(), &e);
                        return Ok(OrganizeFilesOutput::default());
                    }
                };

                session_ref.wait_for_idle().await?;

                let completed_tools = completed
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .clone();
                Ok(OrganizeFilesOutput {
                    message_id: Some(message_id),
                    completed_tools,
                })
            })
            .await
        })
        .await
    }
}
