//! X API v2 client for creating posts.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::StatusCode;
use tracing::debug;

use crate::error::PostError;

use super::oauth::authorization_header;
use super::types::{
    CreatePostRequest, CreatePostResponse, Credentials, OAuthKeys, PostId, ReplySettings,
};
use super::PostingClient;

/// Default X API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.twitter.com";

/// Header carrying the Unix time at which the rate-limit window resets.
pub const RATE_LIMIT_RESET_HEADER: &str = "x-rate-limit-reset";

/// Posts through `POST /2/tweets` with OAuth 1.0a user context.
pub struct XClient {
    keys: OAuthKeys,
    endpoint: String,
    client: reqwest::Client,
}

impl XClient {
    /// Create a client, failing fast when any credential is missing.
    pub fn new(credentials: &Credentials, base_url: &str) -> Result<Self, PostError> {
        let keys = credentials.require()?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("notepost/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            keys,
            endpoint: format!("{}/2/tweets", base_url.trim_end_matches('/')),
            client,
        })
    }

    /// The full URL posts are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Extract the reset time from a 429 response; 0 when absent, malformed or negative.
    fn reset_at(headers: &HeaderMap) -> i64 {
        headers
            .get(RATE_LIMIT_RESET_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map_or(0, |v| v.max(0))
    }

    /// Pull a readable message out of an API error body.
    fn error_detail(body: &str) -> String {
        let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
        parsed
            .as_ref()
            .and_then(|v| v.get("detail").or_else(|| v.get("title")))
            .and_then(|v| v.as_str())
            .map_or_else(|| body.trim().to_string(), ToString::to_string)
    }
}

#[async_trait]
impl PostingClient for XClient {
    async fn create_post(
        &self,
        text: &str,
        reply_to: Option<&PostId>,
    ) -> Result<PostId, PostError> {
        let body = CreatePostRequest {
            text,
            reply: reply_to.map(|id| ReplySettings {
                in_reply_to_tweet_id: id.as_str(),
            }),
        };

        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let auth = authorization_header(
            &self.keys,
            "POST",
            &self.endpoint,
            &nonce,
            chrono::Utc::now().timestamp(),
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, auth)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let reset_at = Self::reset_at(response.headers());
            debug!(reset_at, "Rate limited by X API");
            return Err(PostError::RateLimited { reset_at });
        }

        let text = response.text().await?;
        if !status.is_success() {
            return Err(PostError::Api {
                status: status.as_u16(),
                detail: Self::error_detail(&text),
            });
        }

        let created: CreatePostResponse = serde_json::from_str(&text)
            .map_err(|e| PostError::InvalidResponse(format!("{e}: {text}")))?;

        debug!(id = %created.data.id, reply_to = ?reply_to.map(PostId::as_str), "Post created");
        Ok(PostId(created.data.id))
    }
}
