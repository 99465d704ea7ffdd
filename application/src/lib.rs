//! Application layer for copilot-recipes
//!
//! This crate contains the recipe use cases and the port definitions they
//! depend on. It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use ports::{
    assistant_client::{
        AssistantClient, AssistantSession, ClientError, EventHandler, SubscriptionId,
    },
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    progress::{DetectionMiss, NoRecipeProgress, RecipeProgress, RepoSource},
    prompt_input::{InputError, PromptInputPort},
    remote_detector::RemoteDetectorPort,
};
pub use use_cases::error::RecipeError;
pub use use_cases::follow_up::{FollowUpSummary, LoopExit, run_follow_up_loop};
pub use use_cases::multiple_sessions::{
    MultipleSessionsInput, MultipleSessionsOutput, MultipleSessionsUseCase,
};
pub use use_cases::organize_files::{OrganizeFilesInput, OrganizeFilesOutput, OrganizeFilesUseCase};
pub use use_cases::persist_sessions::{
    PersistSessionsInput, PersistSessionsOutput, PersistSessionsUseCase,
};
pub use use_cases::pr_visualization::{PrVisualizationInput, PrVisualizationUseCase};
pub use use_cases::resolve_repo::ResolveRepoUseCase;
pub use use_cases::scope::{release_session, with_client, with_session};
pub use use_cases::single_prompt::{SinglePromptInput, SinglePromptUseCase, TurnOutcome};
