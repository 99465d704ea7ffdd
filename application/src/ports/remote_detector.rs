//! Version-control remote detection port.
//!
//! The PR-visualization recipe infers `owner/name` from the working copy's
//! `origin` remote. The adapter shells out to `git`; parsing the URL is a
//! pure domain function ([`parse_github_remote`](recipes_domain::parse_github_remote)).

use async_trait::async_trait;

/// Answers questions about the version-control context of the working
/// directory. Never fails: missing tooling reads as "no repository".
#[async_trait]
pub trait RemoteDetectorPort: Send + Sync {
    /// True if the working directory is inside a git repository
    async fn is_git_repo(&self) -> bool;

    /// URL of the `origin` remote, trimmed, if there is one
    async fn origin_url(&self) -> Option<String>;
}
