//! Remote detection using the `git` CLI.
//!
//! Answers "is this a git repository" with `git rev-parse --git-dir` and
//! reads the origin with `git remote get-url origin`.

use async_trait::async_trait;
use recipes_application::RemoteDetectorPort;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Inspects the git working copy of a directory.
///
/// A missing `git` executable is not an error: every question is answered
/// as if the directory were not a repository.
pub struct GitRemoteDetector {
    working_dir: Option<PathBuf>,
    git_available: bool,
}

impl GitRemoteDetector {
    /// Detector for the process's current directory
    pub fn new() -> Self {
        Self::in_dir(None)
    }

    /// Detector for `working_dir` (the current directory when `None`)
    pub fn in_dir(working_dir: Option<PathBuf>) -> Self {
        let git_available = which::which("git").is_ok();
        if !git_available {
            debug!("git not found, remote detection disabled");
        }
        Self {
            working_dir,
            git_available,
        }
    }

    /// Run `git <args>` and return trimmed stdout on success.
    async fn git(&self, args: &[&str]) -> Option<String> {
        if !self.git_available {
            return None;
        }

        let mut cmd = Command::new("git");
        cmd.args(args).stdin(Stdio::null()).stderr(Stdio::null());
        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }

        let output = match cmd.output().await {
            Ok(output) => output,
            Err(e) => {
                debug!("Failed to execute git {}: {}", args.join(" "), e);
                return None;
            }
        };

        if !output.status.success() {
            debug!("git {} exited with {}", args.join(" "), output.status);
            return None;
        }

        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Default for GitRemoteDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteDetectorPort for GitRemoteDetector {
    async fn is_git_repo(&self) -> bool {
        self.git(&["rev-parse", "--git-dir"]).await.is_some()
    }

    async fn origin_url(&self) -> Option<String> {
        self.git(&["remote", "get-url", "origin"])
            .await
            .filter(|url| !url.is_empty())
    }
}
