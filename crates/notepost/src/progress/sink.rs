//! Destinations for the advanced cursor.

use anyhow::Result;
use async_trait::async_trait;

use super::cursor::CursorFile;
use super::git::GitCommitter;

/// Records a new cursor value after a session.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    /// Get the name of this sink.
    fn name(&self) -> &'static str;

    /// Persist `cursor` as the number of posts delivered so far.
    async fn persist(&self, cursor: usize) -> Result<()>;
}

/// Writes the cursor file only.
pub struct FileSink {
    file: CursorFile,
}

impl FileSink {
    /// Create a file sink.
    #[must_use]
    pub fn new(file: CursorFile) -> Self {
        Self { file }
    }
}

#[async_trait]
impl ProgressSink for FileSink {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn persist(&self, cursor: usize) -> Result<()> {
        self.file.write(cursor)?;
        tracing::info!(path = %self.file.path().display(), cursor, "Cursor saved");
        Ok(())
    }
}

/// Writes the cursor file, then commits and pushes it.
///
/// Any failing git step fails the run.
pub struct GitSink {
    file: CursorFile,
    git: GitCommitter,
}

impl GitSink {
    /// Create a git sink.
    #[must_use]
    pub fn new(file: CursorFile, git: GitCommitter) -> Self {
        Self { file, git }
    }
}

#[async_trait]
impl ProgressSink for GitSink {
    fn name(&self) -> &'static str {
        "git"
    }

    async fn persist(&self, cursor: usize) -> Result<()> {
        self.file.write(cursor)?;

        let message = format!("chore(progress): advance cursor to {cursor}");
        if self.git.commit_file(self.file.path(), &message).await? {
            self.git.push(self.file.path()).await?;
            tracing::info!(path = %self.file.path().display(), cursor, "Cursor committed and pushed");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_sink_writes_cursor() {
        let dir = tempfile::tempdir().unwrap();
        let file = CursorFile::new(dir.path().join("cursor.txt"));
        let sink = FileSink::new(file.clone());

        sink.persist(12).await.unwrap();
        assert_eq!(file.read(), 12);
        assert_eq!(sink.name(), "file");
    }
}
