//! Posting pipeline - orchestrates the full load-slice-post-persist flow.

use anyhow::Result;
use std::sync::Arc;

use crate::config::Config;
use crate::notes::load_notes;
use crate::progress::{window, CursorFile, GitCommitter, ProgressTracker};
use crate::session::{Delivery, SessionPoster, SessionReport};
use crate::twitter::{PostingClient, XClient};

/// Result of a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The notes file produced no posts.
    NothingToPost,
    /// Every post up to `cursor` was delivered by earlier runs.
    CaughtUp {
        /// Persisted cursor.
        cursor: usize,
        /// Posts in the queue.
        queued: usize,
    },
    /// A session ran.
    Completed {
        /// Session report.
        report: SessionReport,
        /// Cursor after the run, when progress is tracked.
        cursor: Option<usize>,
        /// Whether this was a dry run.
        dry_run: bool,
    },
}

/// Posting pipeline orchestrator.
pub struct Pipeline {
    config: Config,
    tracker: Option<ProgressTracker>,
}

impl Pipeline {
    /// Create a pipeline, tracking progress when a cursor file is configured.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let tracker = config.cursor_file.as_ref().map(|path| {
            let file = CursorFile::new(path);
            if config.push_progress {
                ProgressTracker::with_git(file, GitCommitter::new(config.progress_remote.clone()))
            } else {
                ProgressTracker::file_only(file)
            }
        });

        Self { config, tracker }
    }

    /// Replace the progress tracker.
    #[must_use]
    pub fn with_tracker(mut self, tracker: ProgressTracker) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Run against the live X API.
    pub async fn run(&self) -> Result<RunOutcome> {
        let credentials = self.config.credentials.clone();
        let base_url = self.config.api_base_url.clone();
        self.run_with(move || {
            let client = XClient::new(&credentials, &base_url)?;
            Ok(Arc::new(client) as Arc<dyn PostingClient>)
        })
        .await
    }

    /// Run a single invocation.
    ///
    /// `connect` builds the posting client; it is only called when there is
    /// something to post and this is not a dry run.
    pub async fn run_with<F>(&self, connect: F) -> Result<RunOutcome>
    where
        F: FnOnce() -> Result<Arc<dyn PostingClient>>,
    {
        let queue = load_notes(
            &self.config.notes_file,
            self.config.notes_mode,
            self.config.chunk_limit,
        )?;

        if queue.is_empty() {
            tracing::info!(path = %self.config.notes_file.display(), "Notes file is empty");
            return Ok(RunOutcome::NothingToPost);
        }

        let cursor = self.tracker.as_ref().map_or(0, ProgressTracker::load);
        let pending = window(&queue, cursor, self.config.max_per_run);
        if pending.is_empty() {
            tracing::info!(cursor, queued = queue.len(), "All posts already delivered");
            return Ok(RunOutcome::CaughtUp {
                cursor,
                queued: queue.len(),
            });
        }

        tracing::info!(
            cursor,
            queued = queue.len(),
            pending = pending.len(),
            dry_run = self.config.dry_run,
            "Starting run"
        );

        let delivery = if self.config.dry_run {
            Delivery::DryRun
        } else {
            Delivery::Live(connect()?)
        };
        let poster = SessionPoster::new(self.config.session(), delivery);

        let result = poster.run(pending).await;

        // Only confirmed posts move the cursor, and a dry run never does.
        let sent = match &result {
            Ok(report) => report.sent,
            Err(aborted) => aborted.sent,
        };
        let next_cursor = match &self.tracker {
            Some(tracker) if !self.config.dry_run => {
                let advanced = tracker.advance(cursor, sent).await;
                match (&result, advanced) {
                    (_, Ok(next)) => Some(next),
                    (Ok(_), Err(e)) => return Err(e),
                    (Err(aborted), Err(e)) => {
                        tracing::error!(error = %aborted, "Posting session aborted before progress was saved");
                        return Err(e.context(format!("Failed to save progress. {aborted}")));
                    }
                }
            }
            Some(_) => Some(cursor),
            None => None,
        };

        let report = result?;
        Ok(RunOutcome::Completed {
            report,
            cursor: next_cursor,
            dry_run: self.config.dry_run,
        })
    }
}
