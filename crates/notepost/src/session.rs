//! Posting session - delivers a batch of posts as one paced, threaded run.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{PostError, SessionAborted};
use crate::twitter::{PostId, PostingClient};

/// Default pause between posts.
pub const DEFAULT_PAUSE: Duration = Duration::from_secs(2);

/// Default cap on posts per run.
pub const DEFAULT_MAX_PER_RUN: usize = 15;

/// Seconds added to the provider's reset time before retrying.
pub const RATE_LIMIT_GRACE_SECS: i64 = 5;

/// Shortest wait after a rate-limit response.
pub const MIN_RATE_LIMIT_WAIT_SECS: i64 = 60;

/// Characters of a post shown in dry-run output.
const PREVIEW_CHARS: usize = 60;

/// Pacing and limits for one session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Max posts delivered per run.
    pub max_per_run: usize,
    /// Sleep after each live post.
    pub pause: Duration,
    /// Give up after this many consecutive rate-limit retries of one post.
    /// `None` retries forever.
    pub max_rate_limit_retries: Option<u32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_per_run: DEFAULT_MAX_PER_RUN,
            pause: DEFAULT_PAUSE,
            max_rate_limit_retries: None,
        }
    }
}

/// Where the session's posts go.
#[derive(Clone)]
pub enum Delivery {
    /// Print posts instead of sending them.
    DryRun,
    /// Send posts through a client.
    Live(Arc<dyn PostingClient>),
}

impl Delivery {
    /// Whether this is a dry run.
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        matches!(self, Self::DryRun)
    }
}

/// Outcome of a completed session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionReport {
    /// Posts delivered (or printed, in a dry run).
    pub sent: usize,
    /// Id of the last accepted post, i.e. the tail of the thread.
    pub last_post_id: Option<PostId>,
    /// Number of rate-limit waits taken.
    pub rate_limit_waits: u32,
}

/// How long to wait after a rate-limit response.
///
/// `max(reset_at - now + 5, 60)` seconds.
#[must_use]
pub fn rate_limit_wait(reset_at: i64, now: i64) -> Duration {
    let secs = reset_at
        .saturating_sub(now)
        .saturating_add(RATE_LIMIT_GRACE_SECS)
        .max(MIN_RATE_LIMIT_WAIT_SECS);
    Duration::from_secs(secs as u64)
}

/// Shorten a post for console output, respecting UTF-8 character boundaries.
fn preview(text: &str) -> String {
    let truncated: String = text.chars().take(PREVIEW_CHARS).collect();
    format!("{truncated}…")
}

/// Console line for a post that a dry run skips.
fn dry_run_line(text: &str, threaded: bool) -> String {
    let tag = if threaded { " (thread)" } else { "" };
    format!("[DRY]{tag} {}", preview(text))
}

/// Delivers posts in order, threading each one onto the previous.
pub struct SessionPoster {
    config: SessionConfig,
    delivery: Delivery,
}

impl SessionPoster {
    /// Create a new session poster.
    #[must_use]
    pub fn new(config: SessionConfig, delivery: Delivery) -> Self {
        Self { config, delivery }
    }

    /// Deliver up to `max_per_run` posts from the front of `queue`.
    ///
    /// A rate-limited post is retried after the wait until it succeeds (or
    /// the optional retry cap is hit); it is never skipped. Any other error
    /// stops the session and reports how many posts were confirmed first.
    pub async fn run(&self, queue: &[String]) -> Result<SessionReport, SessionAborted> {
        let batch = &queue[..queue.len().min(self.config.max_per_run)];
        let mut report = SessionReport::default();

        info!(
            queued = queue.len(),
            batch = batch.len(),
            dry_run = self.delivery.is_dry_run(),
            "Starting posting session"
        );

        for text in batch {
            let id = match &self.delivery {
                Delivery::DryRun => {
                    println!("{}", dry_run_line(text, report.last_post_id.is_some()));
                    None
                }
                Delivery::Live(client) => {
                    let result = self
                        .post_with_retry(
                            client.as_ref(),
                            text,
                            report.last_post_id.as_ref(),
                            &mut report.rate_limit_waits,
                        )
                        .await;
                    match result {
                        Ok(id) => Some(id),
                        Err(source) => {
                            warn!(sent = report.sent, error = %source, "Posting session aborted");
                            return Err(SessionAborted {
                                sent: report.sent,
                                source,
                            });
                        }
                    }
                }
            };

            report.sent += 1;
            if let Some(id) = id {
                debug!(id = %id, sent = report.sent, "Post delivered");
                report.last_post_id = Some(id);
                tokio::time::sleep(self.config.pause).await;
            }
        }

        println!("session done, {} tweet(s) processed", report.sent);
        info!(
            sent = report.sent,
            rate_limit_waits = report.rate_limit_waits,
            "Posting session complete"
        );

        Ok(report)
    }

    /// Post one item, sleeping through rate limits.
    async fn post_with_retry(
        &self,
        client: &dyn PostingClient,
        text: &str,
        reply_to: Option<&PostId>,
        rate_limit_waits: &mut u32,
    ) -> Result<PostId, PostError> {
        let mut retries: u32 = 0;

        loop {
            match client.create_post(text, reply_to).await {
                Ok(id) => return Ok(id),
                Err(PostError::RateLimited { reset_at }) => {
                    if let Some(max) = self.config.max_rate_limit_retries {
                        if retries >= max {
                            return Err(PostError::RateLimitRetriesExhausted { attempts: retries });
                        }
                    }
                    retries += 1;
                    *rate_limit_waits += 1;

                    let wait = rate_limit_wait(reset_at, chrono::Utc::now().timestamp());
                    warn!(
                        reset_at,
                        wait_secs = wait.as_secs(),
                        attempt = retries,
                        "429 received, sleeping {} s",
                        wait.as_secs()
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
