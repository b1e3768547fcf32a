//! X (Twitter) posting module.
//!
//! [`PostingClient`] is the seam the session posts through; [`XClient`] is
//! the API v2 implementation.

mod client;
pub mod oauth;
mod types;

pub use client::{XClient, DEFAULT_API_BASE_URL, RATE_LIMIT_RESET_HEADER};
pub use types::{Credentials, OAuthKeys, PostId};

use async_trait::async_trait;

use crate::error::PostError;

/// Something that can publish a post, optionally as a reply.
///
/// Implementations must report rate limiting as
/// [`PostError::RateLimited`] so the session can wait and retry.
#[async_trait]
pub trait PostingClient: Send + Sync {
    /// Create a post, replying to `reply_to` when given.
    async fn create_post(&self, text: &str, reply_to: Option<&PostId>)
        -> Result<PostId, PostError>;
}
