//! Notes file parsing.

use anyhow::{Context, Result};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::chunker::chunk_text;

/// Line that ends a paragraph in [`ParseMode::Paragraph`].
pub const BLOCK_SENTINEL: &str = "---";

/// How a notes file is split into blocks before chunking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Lines accumulate until a `---` line or end of file. Blank lines do
    /// not end a paragraph.
    #[default]
    Paragraph,
    /// Every non-blank line is its own block.
    Line,
}

impl ParseMode {
    /// Get the configuration name of this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Line => "line",
        }
    }
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParseMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paragraph" | "paragraphs" => Ok(Self::Paragraph),
            "line" | "lines" => Ok(Self::Line),
            other => Err(anyhow::anyhow!(
                "Unknown notes mode '{other}', expected 'paragraph' or 'line'"
            )),
        }
    }
}

/// Split file contents into blocks, each collapsed to one line of text.
#[must_use]
pub fn parse_blocks(contents: &str, mode: ParseMode) -> Vec<String> {
    match mode {
        ParseMode::Line => contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToString::to_string)
            .collect(),
        ParseMode::Paragraph => {
            let mut blocks = Vec::new();
            let mut buf: Vec<&str> = Vec::new();

            for line in contents.lines().map(str::trim) {
                if line == BLOCK_SENTINEL {
                    if !buf.is_empty() {
                        blocks.push(buf.join(" "));
                        buf.clear();
                    }
                } else if !line.is_empty() {
                    buf.push(line);
                }
            }
            if !buf.is_empty() {
                blocks.push(buf.join(" "));
            }

            blocks
        }
    }
}

/// Turn notes file contents into the ordered post queue.
#[must_use]
pub fn parse_notes(contents: &str, mode: ParseMode, limit: usize) -> Vec<String> {
    parse_blocks(contents, mode)
        .iter()
        .flat_map(|block| chunk_text(block, limit))
        .collect()
}

/// Read a notes file and build the post queue.
pub fn load_notes(path: &Path, mode: ParseMode, limit: usize) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read notes file {}", path.display()))?;

    let posts = parse_notes(&contents, mode, limit);
    tracing::debug!(
        path = %path.display(),
        mode = %mode,
        posts = posts.len(),
        "Loaded notes"
    );

    Ok(posts)
}
