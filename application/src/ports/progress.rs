//! Progress notification port
//!
//! Defines the interface for reporting what a recipe is doing. All
//! callbacks default to no-ops so implementations only override what they
//! display.

use crate::ports::assistant_client::ClientError;
use recipes_domain::SessionEvent;

/// Where the repository slug for the PR recipe came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoSource {
    /// `--repo` flag
    Flag,
    /// Parsed from the `origin` remote
    Detected,
    /// Typed by the user
    Prompted,
}

/// Why repository detection fell back to asking the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionMiss {
    /// Inside a git repository, but `origin` is not a GitHub URL
    NoGitHubRemote,
    /// Not inside a git repository at all
    NotGitRepo,
}

/// Callback for progress updates during recipe execution
///
/// Implementations live in the presentation layer. Every method may be
/// called from the session's event dispatch task, so implementations must
/// be cheap and non-blocking.
pub trait RecipeProgress: Send + Sync {
    // ==================== Session Events ====================

    /// Called for each event of a session the recipe subscribed to.
    fn on_event(&self, _event: &SessionEvent) {}

    /// Called with the reply the recipe waited for.
    fn on_response(&self, _content: &str) {}

    // ==================== Session Lifecycle ====================

    fn on_session_created(&self, _session_id: &str) {}

    fn on_session_destroyed(&self, _session_id: &str) {}

    fn on_session_resumed(&self, _session_id: &str) {}

    fn on_sessions_listed(&self, _session_ids: &[String]) {}

    fn on_session_deleted(&self, _session_id: &str) {}

    // ==================== Multi-session ====================

    fn on_sessions_ready(&self, _count: usize) {}

    fn on_context_sent(&self) {}

    fn on_follow_ups_sent(&self) {}

    fn on_sessions_released(&self) {}

    // ==================== Errors ====================

    /// Called when a single prompt could not be sent (recoverable).
    fn on_send_failed(&self, _session_id: &str, _error: &ClientError) {}

    // ==================== PR Analysis ====================

    fn on_repo_resolved(&self, _repo: &str, _source: RepoSource) {}

    fn on_repo_detection_missed(&self, _miss: DetectionMiss) {}

    fn on_analysis_start(&self) {}

    fn on_follow_up_intro(&self, _examples: &[&str]) {}

    fn on_goodbye(&self) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoRecipeProgress;

impl RecipeProgress for NoRecipeProgress {}
