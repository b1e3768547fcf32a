//! Persisted position in the post queue.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Plain-text file holding a single non-negative integer.
#[derive(Debug, Clone)]
pub struct CursorFile {
    path: PathBuf,
}

impl CursorFile {
    /// Create a handle for the cursor file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the cursor file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cursor, defaulting to 0 when the file is absent or unusable.
    #[must_use]
    pub fn read(&self) -> usize {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return 0,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Cursor file unreadable, starting from 0"
                );
                return 0;
            }
        };

        match content.trim().parse() {
            Ok(cursor) => cursor,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    content = content.trim(),
                    error = %e,
                    "Cursor file is not a non-negative integer, starting from 0"
                );
                0
            }
        }
    }

    /// Write the cursor, creating parent directories as needed.
    pub fn write(&self, cursor: usize) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, format!("{cursor}\n"))
            .with_context(|| format!("Failed to write cursor file {}", self.path.display()))?;
        Ok(())
    }
}

/// The part of `queue` still to post this run: `queue[cursor .. cursor + cap]`.
///
/// Empty when the cursor is at or past the end.
#[must_use]
pub fn window(queue: &[String], cursor: usize, cap: usize) -> &[String] {
    if cursor >= queue.len() {
        return &[];
    }
    let end = cursor.saturating_add(cap).min(queue.len());
    &queue[cursor..end]
}
