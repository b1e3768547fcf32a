//! X API data types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PostError;

/// Opaque identifier of an accepted post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub String);

impl PostId {
    /// Create a post id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// OAuth 1.0a user-context credentials.
#[derive(Clone, Default)]
pub struct Credentials {
    /// Consumer (API) key.
    pub api_key: Option<String>,
    /// Consumer (API) secret.
    pub api_secret: Option<String>,
    /// User access token.
    pub access_token: Option<String>,
    /// User access token secret.
    pub access_token_secret: Option<String>,
}

// Secrets stay out of logs and panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key.is_some())
            .field("api_secret", &self.api_secret.is_some())
            .field("access_token", &self.access_token.is_some())
            .field("access_token_secret", &self.access_token_secret.is_some())
            .finish()
    }
}

impl Credentials {
    /// Names of the environment keys that are unset or empty.
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("API_KEY", &self.api_key),
            ("API_SECRET", &self.api_secret),
            ("ACCESS_TOKEN", &self.access_token),
            ("ACCESS_TOKEN_SECRET", &self.access_token_secret),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| name)
        .collect()
    }

    /// Resolve into a complete key set, failing with every missing key named.
    pub fn require(&self) -> Result<OAuthKeys, PostError> {
        let missing = self.missing();
        if !missing.is_empty() {
            return Err(PostError::MissingCredentials(missing));
        }

        Ok(OAuthKeys {
            consumer_key: self.api_key.clone().unwrap_or_default(),
            consumer_secret: self.api_secret.clone().unwrap_or_default(),
            token: self.access_token.clone().unwrap_or_default(),
            token_secret: self.access_token_secret.clone().unwrap_or_default(),
        })
    }
}

/// Validated OAuth 1.0a key set.
#[derive(Clone)]
pub struct OAuthKeys {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub token: String,
    pub token_secret: String,
}

/// Body of `POST /2/tweets`.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePostRequest<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<ReplySettings<'a>>,
}

/// Reply target of a new post.
#[derive(Debug, Clone, Serialize)]
pub struct ReplySettings<'a> {
    pub in_reply_to_tweet_id: &'a str,
}

/// Response of `POST /2/tweets`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePostResponse {
    pub data: CreatedPost,
}

/// The post the API created.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedPost {
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials() {
        let creds = Credentials {
            api_key: Some("key".to_string()),
            api_secret: Some("  ".to_string()),
            access_token: None,
            access_token_secret: Some("secret".to_string()),
        };
        assert_eq!(creds.missing(), vec!["API_SECRET", "ACCESS_TOKEN"]);
        assert!(matches!(
            creds.require(),
            Err(PostError::MissingCredentials(keys)) if keys.len() == 2
        ));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let creds = Credentials {
            api_key: Some("super-secret-key".to_string()),
            ..Default::default()
        };
        let debug = format!("{creds:?}");
        assert!(!debug.contains("super-secret-key"));
    }

    #[test]
    fn test_request_serialization() {
        let body = CreatePostRequest {
            text: "hello",
            reply: None,
        };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"text":"hello"}"#);

        let body = CreatePostRequest {
            text: "hello",
            reply: Some(ReplySettings {
                in_reply_to_tweet_id: "42",
            }),
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"text":"hello","reply":{"in_reply_to_tweet_id":"42"}}"#
        );
    }
}
