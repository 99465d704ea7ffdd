//! Console output for recipe progress
//!
//! Each recipe prints its own narrative, so [`ConsoleProgress`] is built for
//! one [`Recipe`] and formats callbacks accordingly. Formatting is kept in
//! pure functions returning the text; the trait impl only prints it.

use colored::Colorize;
use recipes_application::{ClientError, DetectionMiss, RecipeProgress, RepoSource};
use recipes_domain::SessionEvent;

/// The recipe a [`ConsoleProgress`] reports for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipe {
    ErrorHandling,
    ManagingLocalFiles,
    MultipleSessions,
    PersistingSessions,
    PrVisualization,
}

/// Prints recipe progress to stdout, failures to stderr
#[derive(Debug, Clone, Copy)]
pub struct ConsoleProgress {
    recipe: Recipe,
}

impl ConsoleProgress {
    pub fn new(recipe: Recipe) -> Self {
        Self { recipe }
    }

    /// Title printed before the recipe starts, if it has one
    pub fn print_banner(&self) {
        if self.recipe == Recipe::PrVisualization {
            println!("{}\n", "🔍 PR Age Chart Generator".bold());
        }
    }

    /// How a session event is shown, `None` to stay quiet
    pub fn format_event(&self, event: &SessionEvent) -> Option<String> {
        match (self.recipe, event) {
            (Recipe::ManagingLocalFiles, SessionEvent::AssistantMessage { content, .. }) => {
                Some(format!("\n{} {}", "Copilot:".cyan().bold(), content))
            }
            (Recipe::ManagingLocalFiles, SessionEvent::ToolExecutionStart { tool_name, .. }) => {
                Some(format!("  {} Running: {}", "→".blue(), tool_name))
            }
            (
                Recipe::ManagingLocalFiles,
                SessionEvent::ToolExecutionComplete {
                    tool_name, success, ..
                },
            ) => Some(if *success {
                format!("  {} Completed: {}", "✓".green(), tool_name)
            } else {
                format!("  {} Failed: {}", "✗".red(), tool_name)
            }),
            (Recipe::PrVisualization, SessionEvent::AssistantMessage { content, .. }) => {
                Some(format!("\n🤖 {}\n", content))
            }
            (Recipe::PrVisualization, SessionEvent::ToolExecutionStart { tool_name, .. }) => {
                Some(format!("  ⚙️  {}", tool_name.dimmed()))
            }
            (
                Recipe::ManagingLocalFiles | Recipe::PrVisualization,
                SessionEvent::SessionError { message },
            ) => Some(format!("{} {}", "Session error:".red().bold(), message)),
            _ => None,
        }
    }

    /// Lifecycle line for a session-level callback, `None` to stay quiet
    fn format_lifecycle(&self, change: Lifecycle<'_>) -> Option<String> {
        match (self.recipe, change) {
            (Recipe::PersistingSessions, Lifecycle::Created(id)) => {
                Some(format!("Session created: {}", id))
            }
            (Recipe::PersistingSessions, Lifecycle::Destroyed(_)) => {
                Some("Session destroyed (state persisted)".to_string())
            }
            (Recipe::PersistingSessions, Lifecycle::Resumed(id)) => Some(format!("Resumed: {}", id)),
            (Recipe::PersistingSessions, Lifecycle::Listed(ids)) => {
                Some(format!("Sessions: [{}]", ids.join(" ")))
            }
            (Recipe::PersistingSessions, Lifecycle::Deleted(_)) => {
                Some("Session deleted".to_string())
            }
            _ => None,
        }
    }

    pub fn format_repo_resolved(repo: &str, source: RepoSource) -> Option<String> {
        match source {
            RepoSource::Flag => Some(format!("📦 Using specified repo: {}", repo.bold())),
            RepoSource::Detected => Some(format!("📦 Detected GitHub repo: {}", repo.bold())),
            RepoSource::Prompted => None,
        }
    }

    pub fn format_detection_miss(miss: DetectionMiss) -> &'static str {
        match miss {
            DetectionMiss::NoGitHubRemote => "⚠️  Git repo found but no GitHub remote detected.",
            DetectionMiss::NotGitRepo => "📁 Not in a git repository.",
        }
    }

    pub fn format_follow_up_intro(examples: &[&str]) -> String {
        let mut output = format!(
            "\n💡 Ask follow-up questions or type \"{}\" to quit.\n\nExamples:\n",
            "exit".bold()
        );
        for example in examples {
            output.push_str(&format!("  - \"{}\"\n", example));
        }
        output
    }

    pub fn format_send_failed(&self, error: &ClientError) -> String {
        match self.recipe {
            Recipe::PrVisualization => format!("{} {}", "Error:".red().bold(), error),
            _ => format!("{} {}", "Failed to send message:".red().bold(), error),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Lifecycle<'a> {
    Created(&'a str),
    Destroyed(&'a str),
    Resumed(&'a str),
    Listed(&'a [String]),
    Deleted(&'a str),
}

impl ConsoleProgress {
    fn print_lifecycle(&self, change: Lifecycle<'_>) {
        if let Some(line) = self.format_lifecycle(change) {
            println!("{}", line);
        }
    }
}

impl RecipeProgress for ConsoleProgress {
    fn on_event(&self, event: &SessionEvent) {
        if let Some(line) = self.format_event(event) {
            println!("{}", line);
        }
    }

    fn on_response(&self, content: &str) {
        println!("{}", content);
    }

    fn on_session_created(&self, session_id: &str) {
        self.print_lifecycle(Lifecycle::Created(session_id));
    }

    fn on_session_destroyed(&self, session_id: &str) {
        self.print_lifecycle(Lifecycle::Destroyed(session_id));
    }

    fn on_session_resumed(&self, session_id: &str) {
        self.print_lifecycle(Lifecycle::Resumed(session_id));
    }

    fn on_sessions_listed(&self, session_ids: &[String]) {
        self.print_lifecycle(Lifecycle::Listed(session_ids));
    }

    fn on_session_deleted(&self, session_id: &str) {
        self.print_lifecycle(Lifecycle::Deleted(session_id));
    }

    fn on_sessions_ready(&self, count: usize) {
        println!("Created {} independent sessions", count);
    }

    fn on_context_sent(&self) {
        println!("Sent initial context to all sessions");
    }

    fn on_follow_ups_sent(&self) {
        println!("Sent follow-up questions to each session");
    }

    fn on_sessions_released(&self) {
        println!("All sessions destroyed");
    }

    fn on_send_failed(&self, _session_id: &str, error: &ClientError) {
        eprintln!("{}", self.format_send_failed(error));
    }

    fn on_repo_resolved(&self, repo: &str, source: RepoSource) {
        if let Some(line) = Self::format_repo_resolved(repo, source) {
            println!("{}", line);
        }
    }

    fn on_repo_detection_missed(&self, miss: DetectionMiss) {
        println!("{}", Self::format_detection_miss(miss));
    }

    fn on_analysis_start(&self) {
        println!("\n📊 Starting analysis...\n");
    }

    fn on_follow_up_intro(&self, examples: &[&str]) {
        println!("{}", Self::format_follow_up_intro(examples));
    }

    fn on_goodbye(&self) {
        println!("👋 Goodbye!");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_file_recipe_shows_tool_activity() {
        plain();
        let progress = ConsoleProgress::new(Recipe::ManagingLocalFiles);

        assert_eq!(
            progress.format_event(&SessionEvent::ToolExecutionStart {
                tool_call_id: None,
                tool_name: "bash".into()
            }),
            Some("  → Running: bash".to_string())
        );
        assert_eq!(
            progress.format_event(&SessionEvent::ToolExecutionComplete {
                tool_call_id: None,
                tool_name: "bash".into(),
                success: true
            }),
            Some("  ✓ Completed: bash".to_string())
        );
        assert_eq!(
            progress.format_event(&SessionEvent::AssistantMessage {
                message_id: None,
                content: "Done".into()
            }),
            Some("\nCopilot: Done".to_string())
        );
        assert_eq!(progress.format_event(&SessionEvent::SessionIdle), None);
    }

    #[test]
    fn test_pr_recipe_ignores_tool_completion() {
        plain();
        let progress = ConsoleProgress::new(Recipe::PrVisualization);

        assert_eq!(
            progress.format_event(&SessionEvent::AssistantMessage {
                message_id: None,
                content: "Chart saved".into()
            }),
            Some("\n🤖 Chart saved\n".to_string())
        );
        assert_eq!(
            progress.format_event(&SessionEvent::ToolExecutionComplete {
                tool_call_id: None,
                tool_name: "bash".into(),
                success: true
            }),
            None
        );
    }

    #[test]
    fn test_only_persisting_recipe_narrates_lifecycle() {
        let persisting = ConsoleProgress::new(Recipe::PersistingSessions);
        let multiple = ConsoleProgress::new(Recipe::MultipleSessions);
        let ids = vec!["a".to_string(), "b".to_string()];

        assert_eq!(
            persisting.format_lifecycle(Lifecycle::Created("user-123-conversation")),
            Some("Session created: user-123-conversation".to_string())
        );
        assert_eq!(
            persisting.format_lifecycle(Lifecycle::Listed(&ids)),
            Some("Sessions: [a b]".to_string())
        );
        assert_eq!(multiple.format_lifecycle(Lifecycle::Created("x")), None);
        assert_eq!(multiple.format_lifecycle(Lifecycle::Destroyed("x")), None);
    }

    #[test]
    fn test_repo_messages() {
        plain();
        assert_eq!(
            ConsoleProgress::format_repo_resolved("acme/widgets", RepoSource::Detected),
            Some("📦 Detected GitHub repo: acme/widgets".to_string())
        );
        assert_eq!(
            ConsoleProgress::format_repo_resolved("acme/widgets", RepoSource::Prompted),
            None
        );
        assert_eq!(
            ConsoleProgress::format_detection_miss(DetectionMiss::NotGitRepo),
            "📁 Not in a git repository."
        );
    }

    #[test]
    fn test_follow_up_intro_lists_examples() {
        plain();
        let intro = ConsoleProgress::format_follow_up_intro(&["Show me the 5 oldest PRs"]);
        assert!(intro.contains("type \"exit\" to quit"));
        assert!(intro.ends_with("  - \"Show me the 5 oldest PRs\"\n"));
    }

    #[test]
    fn test_send_failure_wording_per_recipe() {
        plain();
        let error = ClientError::SendFailed("transport unavailable".into());
        assert_eq!(
            ConsoleProgress::new(Recipe::ErrorHandling).format_send_failed(&error),
            "Failed to send message: Send failed: transport unavailable"
        );
        assert_eq!(
            ConsoleProgress::new(Recipe::PrVisualization).format_send_failed(&error),
            "Error: Send failed: transport unavailable"
        );
    }
}
