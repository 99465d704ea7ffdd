//! Resolve which GitHub repository to analyze.
//!
//! Order of precedence: the `--repo` flag, then the `origin` remote of the
//! working copy, then a line typed by the user.

use crate::ports::progress::{DetectionMiss, RecipeProgress, RepoSource};
use crate::ports::prompt_input::PromptInputPort;
use crate::ports::remote_detector::RemoteDetectorPort;
use crate::use_cases::error::RecipeError;
use recipes_domain::{RepoSlug, parse_github_remote};
use std::sync::Arc;
use tracing::debug;

/// Prompt shown when the repository has to be typed in
pub const REPO_PROMPT: &str = "Enter GitHub repo (owner/repo): ";

pub struct ResolveRepoUseCase {
    detector: Arc<dyn RemoteDetectorPort>,
    input: Arc<dyn PromptInputPort>,
}

impl ResolveRepoUseCase {
    pub fn new(detector: Arc<dyn RemoteDetectorPort>, input: Arc<dyn PromptInputPort>) -> Self {
        Self { detector, input }
    }

    /// Resolve and validate the repository.
    ///
    /// An empty flag counts as absent. End of input at the prompt reads as
    /// an empty answer and fails validation.
    pub async fn execute(
        &self,
        flag: Option<&str>,
        progress: &dyn RecipeProgress,
    ) -> Result<RepoSlug, RecipeError> {
        let (repo, source) = match flag.filter(|f| !f.is_empty()) {
            Some(repo) => (repo.to_string(), RepoSource::Flag),
            None => self.detect_or_prompt(progress).await?,
        };
        debug!("Repository candidate {:?} from {:?}", repo, source);
        progress.on_repo_resolved(&repo, source);

        Ok(repo.parse::<RepoSlug>()?)
    }

    async fn detect_or_prompt(
        &self,
        progress: &dyn RecipeProgress,
    ) -> Result<(String, RepoSource), RecipeError> {
        if self.detector.is_git_repo().await {
            let detected = self
                .detector
                .origin_url()
                .await
                .and_then(|url| parse_github_remote(&url));
            if let Some(repo) = detected {
                return Ok((repo, RepoSource::Detected));
            }
            progress.on_repo_detection_missed(DetectionMiss::NoGitHubRemote);
        } else {
            progress.on_repo_detection_missed(DetectionMiss::NotGitRepo);
        }

        let typed = self.input.read_line(REPO_PROMPT).await?.unwrap_or_default();
        Ok((typed.trim().to_string(), RepoSource::Prompted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        FixedRemoteDetector, RecordingProgress, ScriptedInput, entries, journal,
    };
    use recipes_domain::DomainError;

    fn resolver(git_repo: bool, origin: Option<&str>, typed: &[&str]) -> ResolveRepoUseCase {
        ResolveRepoUseCase::new(
            Arc::new(FixedRemoteDetector {
                git_repo,
                origin: origin.map(str::to_string),
            }),
            Arc::new(ScriptedInput::new(typed, journal())),
        )
    }

    #[tokio::test]
    async fn flag_wins_over_detection() {
        let log = journal();
        let slug = resolver(true, Some("git@github.com:acme/widgets.git"), &[])
            .execute(Some("octo/cat"), &RecordingProgress::new(log.clone()))
            .await
            .unwrap();

        assert_eq!(slug.to_string(), "octo/cat");
        assert_eq!(entries(&log), vec!["repo:Flag:octo/cat"]);
    }

    #[tokio::test]
    async fn detects_ssh_remote() {
        let slug = resolver(true, Some("git@github.com:acme/widgets.git"), &[])
            .execute(None, &RecordingProgress::new(journal()))
            .await
            .unwrap();

        assert_eq!(slug.owner(), "acme");
        assert_eq!(slug.name(), "widgets");
    }

    #[tokio::test]
    async fn non_github_remote_falls_back_to_prompt() {
        let log = journal();
        let slug = resolver(true, Some("https://gitlab.com/acme/widgets"), &["  acme/gadgets  "])
            .execute(None, &RecordingProgress::new(log.clone()))
            .await
            .unwrap();

        assert_eq!(slug.to_string(), "acme/gadgets");
        assert_eq!(
            entries(&log),
            vec!["miss:NoGitHubRemote", "repo:Prompted:acme/gadgets"]
        );
    }

    #[tokio::test]
    async fn outside_git_prompts_and_rejects_bad_format() {
        let log = journal();
        let err = resolver(false, None, &["widgets"])
            .execute(None, &RecordingProgress::new(log.clone()))
            .await
            .unwrap_err();

        assert!(matches!(err, RecipeError::InvalidRepo(DomainError::InvalidRepo(_))));
        assert!(err.is_fatal());
        assert_eq!(entries(&log)[0], "miss:NotGitRepo");
    }

    #[tokio::test]
    async fn end_of_input_is_invalid() {
        let err = resolver(false, None, &[])
            .execute(None, &RecordingProgress::new(journal()))
            .await
            .unwrap_err();

        assert!(matches!(err, RecipeError::InvalidRepo(_)));
    }

    #[tokio::test]
    async fn empty_flag_counts_as_absent() {
        let slug = resolver(true, Some("https://github.com/acme/widgets"), &[])
            .execute(Some(""), &RecordingProgress::new(journal()))
            .await
            .unwrap();

        assert_eq!(slug.to_string(), "acme/widgets");
    }
}
