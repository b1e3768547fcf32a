//! Error types for posting to X.

use thiserror::Error;

/// Errors returned by a [`PostingClient`](crate::twitter::PostingClient) and
/// the session that drives it.
#[derive(Debug, Error)]
pub enum PostError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Rate limited by the API; retry once `reset_at` (Unix seconds) has passed
    #[error("Rate limited until {reset_at} (unix)")]
    RateLimited { reset_at: i64 },

    /// The API rejected the request
    #[error("X API returned {status}: {detail}")]
    Api { status: u16, detail: String },

    /// The API answered with a body we could not use
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// One or more credentials are not configured
    #[error("Missing credentials: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    /// Still rate limited after the configured number of retries
    #[error("Still rate limited after {attempts} retries")]
    RateLimitRetriesExhausted { attempts: u32 },
}

impl PostError {
    /// Whether this error is the recoverable rate-limit condition.
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

/// A session stopped on a non-recoverable error.
///
/// `sent` counts the posts confirmed before the failure, so progress can
/// still be recorded for them.
#[derive(Debug, Error)]
#[error("Session aborted after {sent} post(s): {source}")]
pub struct SessionAborted {
    /// Posts confirmed before the failure.
    pub sent: usize,
    /// The error that stopped the session.
    #[source]
    pub source: PostError,
}
