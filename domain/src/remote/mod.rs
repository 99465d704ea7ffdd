//! GitHub repository identification.
//!
//! Turns the textual output of `git remote get-url origin` into an
//! `owner/name` slug. Only the two URL shapes GitHub hands out are
//! recognised; this is not a general URL parser.

use crate::core::error::DomainError;
use regex::Regex;
use std::sync::LazyLock;

/// `git@github.com:owner/repo.git`
static SSH_REMOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"git@github\.com:(.+/.+?)(?:\.git)?$").expect("static SSH remote pattern")
});

/// `https://github.com/owner/repo.git`
static HTTPS_REMOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://github\.com/(.+/.+?)(?:\.git)?$").expect("static HTTPS remote pattern")
});

/// Extract `owner/name` from a GitHub remote URL.
///
/// Returns `None` when the URL matches neither the SSH nor the HTTPS form,
/// so the caller can fall back to asking the user.
pub fn parse_github_remote(remote_url: &str) -> Option<String> {
    let remote_url = remote_url.trim();

    [&*SSH_REMOTE, &*HTTPS_REMOTE].into_iter().find_map(|re| {
        re.captures(remote_url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}

/// A validated `owner/name` pair (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSlug {
    owner: String,
    name: String,
}

impl RepoSlug {
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::str::FromStr for RepoSlug {
    type Err = DomainError;

    /// Splits on the first `/`; both halves must be non-empty.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(DomainError::InvalidRepo(s.to_string())),
        }
    }
}

impl std::fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
