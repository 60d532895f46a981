//! Commit logging for configuration changes
//!
//! After a mutation goes through, the agent can snapshot the Home Assistant
//! config directory as a git commit so every change has a history entry.
//! [`GitManager`] drives the `git` CLI; a disabled manager is a no-op.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Result type for git operations
pub type GitResult<T> = Result<T, GitError>;

#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },
}

/// Something that can record a change after it happened
#[async_trait]
pub trait CommitLog: Send + Sync {
    /// Whether commits are recorded at all
    fn enabled(&self) -> bool;

    /// Record the current working tree with `message`.
    ///
    /// Returns `Ok(false)` when disabled or when there is nothing to commit.
    async fn commit_changes(&self, message: &str) -> GitResult<bool>;
}

/// Commit log backed by a git working tree
pub struct GitManager {
    enabled: bool,
    repo_path: PathBuf,
    author_name: Option<String>,
    author_email: Option<String>,
    /// git holds an index lock per repository; commits run one at a time
    lock: Mutex<()>,
}

impl GitManager {
    pub fn new(enabled: bool, repo_path: impl Into<PathBuf>) -> Self {
        Self {
            enabled,
            repo_path: repo_path.into(),
            author_name: None,
            author_email: None,
            lock: Mutex::new(()),
        }
    }

    /// A manager that never touches the disk
    pub fn disabled() -> Self {
        Self::new(false, PathBuf::new())
    }

    /// Override the committer identity instead of relying on git config
    pub fn with_author(mut self, name: Option<String>, email: Option<String>) -> Self {
        self.author_name = name;
        self.author_email = email;
        self
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    async fn git(&self, args: &[&str]) -> GitResult<String> {
        let mut command = Command::new("git");
        command.current_dir(&self.repo_path);
        if let Some(ref name) = self.author_name {
            command.arg("-c").arg(format!("user.name={}", name));
        }
        if let Some(ref email) = self.author_email {
            command.arg("-c").arg(format!("user.email={}", email));
        }
        command.args(args);

        let output = command.output().await?;
        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: format!("git {}", args.join(" ")),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl CommitLog for GitManager {
    fn enabled(&self) -> bool {
        self.enabled
    }

    async fn commit_changes(&self, message: &str) -> GitResult<bool> {
        if !self.enabled {
            return Ok(false);
        }

        let _guard = self.lock.lock().await;

        self.git(&["add", "-A"]).await?;
        let status = self.git(&["status", "--porcelain"]).await?;
        if status.trim().is_empty() {
            debug!(message, "Nothing to commit");
            return Ok(false);
        }

        self.git(&["commit", "-m", message]).await?;
        info!("Committed changes: {}", message);
        Ok(true)
    }
}
