//! PR visualization use case.
//!
//! Creates a session primed with the repository and working directory,
//! asks for a PR age chart, then hands the session to the interactive
//! follow-up loop.

use crate::ports::assistant_client::{AssistantClient, AssistantSession};
use crate::ports::progress::RecipeProgress;
use crate::ports::prompt_input::PromptInputPort;
use crate::use_cases::error::RecipeError;
use crate::use_cases::follow_up::{FollowUpSummary, run_follow_up_loop};
use crate::use_cases::scope::{with_client, with_session};
use recipes_domain::{
    MessageOptions, Model, PromptTemplate, RepoSlug, SessionConfig, SessionEvent, SystemMessage,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Input for the [`PrVisualizationUseCase`].
#[derive(Debug, Clone)]
pub struct PrVisualizationInput {
    pub model: Model,
    pub repo: RepoSlug,
    /// Where the assistant is told to save generated charts
    pub working_dir: PathBuf,
}

impl PrVisualizationInput {
    pub fn new(model: Model, repo: RepoSlug, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            model,
            repo,
            working_dir: working_dir.into(),
        }
    }

    fn session_config(&self) -> SessionConfig {
        SessionConfig::new(self.model.clone()).with_system_message(SystemMessage::append(
            PromptTemplate::pr_analysis_system(&self.repo, &self.working_dir),
        ))
    }
}

/// Use case behind the `pr-visualization` recipe.
pub struct PrVisualizationUseCase {
    client: Arc<dyn AssistantClient>,
    input: Arc<dyn PromptInputPort>,
}

impl PrVisualizationUseCase {
    pub fn new(client: Arc<dyn AssistantClient>, input: Arc<dyn PromptInputPort>) -> Self {
        Self { client, input }
    }

    pub async fn execute(
        &self,
        input: PrVisualizationInput,
        progress: Arc<dyn RecipeProgress>,
    ) -> Result<FollowUpSummary, RecipeError> {
        info!("Analyzing pull requests of {}", input.repo);
        let client = self.client.as_ref();
        let prompt_input = self.input.as_ref();

        with_client(client, move || async move {
            let session = client
                .create_session(input.session_config())
                .await
                .map_err(RecipeError::SessionUnavailable)?;
            progress.on_session_created(session.session_id());
            let session_ref: &dyn AssistantSession = session.as_ref();

            with_session(session_ref, move || async move {
                let forward = Arc::clone(&progress);
                session_ref.on(Arc::new(move |event: &SessionEvent| forward.on_event(event)));

                progress.on_analysis_start();
                let prompt = PromptTemplate::pr_age_chart(&input.repo);
                match session_ref.send(MessageOptions::new(prompt)).await {
                    Ok(_) => session_ref.wait_for_idle().await?,
                    Err(e) => {
                        warn!("Failed to send analysis request: {}", e);
                        progress.on_send_failed(session_ref.session_id(), &e);
                    }
                }

                progress.on_follow_up_intro(PromptTemplate::pr_follow_up_examples());
                run_follow_up_loop(session_ref, prompt_input, progress.as_ref()).await
            })
            .await
        })
        .await
    }
}
