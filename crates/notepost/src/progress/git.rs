//! Git operations using shell commands.
//!
//! Uses tokio::process::Command for async git operations.

use anyhow::{Context, Result};
use std::path::Path;
use tokio::process::Command;

/// Default remote the progress commit is pushed to.
pub const DEFAULT_REMOTE: &str = "origin";

/// Commits and pushes a single file via the `git` CLI.
#[derive(Debug, Clone)]
pub struct GitCommitter {
    /// Git author name.
    author_name: String,
    /// Git author email.
    author_email: String,
    /// Remote to push to.
    remote: String,
}

impl GitCommitter {
    /// Create a committer with the author taken from the environment.
    pub fn new(remote: impl Into<String>) -> Self {
        Self {
            author_name: std::env::var("GIT_AUTHOR_NAME")
                .unwrap_or_else(|_| "notepost".to_string()),
            author_email: std::env::var("GIT_AUTHOR_EMAIL")
                .unwrap_or_else(|_| "notepost@users.noreply.github.com".to_string()),
            remote: remote.into(),
        }
    }

    /// Override the commit author.
    #[must_use]
    pub fn with_author(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.author_name = name.into();
        self.author_email = email.into();
        self
    }

    /// Run one git subcommand in `repo_dir`, failing on a non-zero exit.
    async fn git(&self, repo_dir: &Path, step: &str, args: &[&str]) -> Result<Vec<u8>> {
        let output = Command::new("git")
            .arg("-c")
            .arg(format!("user.name={}", self.author_name))
            .arg("-c")
            .arg(format!("user.email={}", self.author_email))
            .args(args)
            .current_dir(repo_dir)
            .output()
            .await
            .with_context(|| format!("Failed to execute git {step}"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow::anyhow!("git {} failed: {}", step, stderr.trim()));
        }

        Ok(output.stdout)
    }

    /// Stage and commit exactly `file`, leaving other changes untouched.
    ///
    /// Returns `false` when the file has no changes to commit.
    pub async fn commit_file(&self, file: &Path, message: &str) -> Result<bool> {
        let (repo_dir, name) = split_path(file)?;
        tracing::debug!(file = %file.display(), "Committing progress file");

        self.git(repo_dir, "add", &["add", "--", name]).await?;

        let staged = self
            .git(
                repo_dir,
                "diff",
                &["diff", "--cached", "--name-only", "--", name],
            )
            .await?;
        if staged.is_empty() {
            tracing::debug!(file = %file.display(), "No changes to commit");
            return Ok(false);
        }

        self.git(repo_dir, "commit", &["commit", "-m", message, "--", name])
            .await?;
        Ok(true)
    }

    /// Push the current branch to the configured remote.
    pub async fn push(&self, file: &Path) -> Result<()> {
        let (repo_dir, _) = split_path(file)?;
        tracing::debug!(remote = %self.remote, "Pushing to remote");

        self.git(repo_dir, "push", &["push", &self.remote, "HEAD"])
            .await?;
        Ok(())
    }
}

/// Split a file path into the directory git runs in and the file name.
fn split_path(file: &Path) -> Result<(&Path, &str)> {
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid progress file path: {}", file.display()))?;
    let dir = match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok((dir, name))
}
