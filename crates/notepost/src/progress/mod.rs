//! Progress tracking across runs.
//!
//! A cursor file records how many queue entries have been delivered; each run
//! posts the next window and advances the cursor by what it confirmed.

mod cursor;
mod git;
mod sink;

pub use cursor::{window, CursorFile};
pub use git::{GitCommitter, DEFAULT_REMOTE};
pub use sink::{FileSink, GitSink, ProgressSink};

use anyhow::Result;

/// Reads the cursor at start and hands the advanced value to a sink.
pub struct ProgressTracker {
    file: CursorFile,
    sink: Box<dyn ProgressSink>,
}

impl ProgressTracker {
    /// Track progress in `file`, persisting through `sink`.
    #[must_use]
    pub fn new(file: CursorFile, sink: Box<dyn ProgressSink>) -> Self {
        Self { file, sink }
    }

    /// Track progress in `file`, writing it directly.
    #[must_use]
    pub fn file_only(file: CursorFile) -> Self {
        let sink = Box::new(FileSink::new(file.clone()));
        Self { file, sink }
    }

    /// Track progress in `file`, committing and pushing each update.
    #[must_use]
    pub fn with_git(file: CursorFile, git: GitCommitter) -> Self {
        let sink = Box::new(GitSink::new(file.clone(), git));
        Self { file, sink }
    }

    /// The cursor file.
    #[must_use]
    pub fn file(&self) -> &CursorFile {
        &self.file
    }

    /// Current cursor.
    #[must_use]
    pub fn load(&self) -> usize {
        self.file.read()
    }

    /// Record that `sent` more posts were delivered after `cursor`.
    ///
    /// Nothing is written when `sent` is zero.
    pub async fn advance(&self, cursor: usize, sent: usize) -> Result<usize> {
        let next = cursor + sent;
        if sent == 0 {
            tracing::debug!(cursor, "No posts delivered, cursor unchanged");
            return Ok(cursor);
        }

        tracing::debug!(sink = self.sink.name(), from = cursor, to = next, "Advancing cursor");
        self.sink.persist(next).await?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_advance_skips_zero() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = ProgressTracker::file_only(CursorFile::new(dir.path().join("c.txt")));

        assert_eq!(tracker.advance(3, 0).await.unwrap(), 3);
        assert!(!tracker.file().path().exists());

        assert_eq!(tracker.advance(3, 4).await.unwrap(), 7);
        assert_eq!(tracker.load(), 7);
    }
}
