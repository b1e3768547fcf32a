//! Runtime configuration.
//!
//! Built once at startup from the environment (and an optional `.env` file),
//! then overridden by CLI flags and passed down to each component.

use std::path::PathBuf;
use std::time::Duration;

use crate::notes::{ParseMode, DEFAULT_CHUNK_LIMIT};
use crate::progress::DEFAULT_REMOTE;
use crate::session::{SessionConfig, DEFAULT_MAX_PER_RUN, DEFAULT_PAUSE};
use crate::twitter::{Credentials, DEFAULT_API_BASE_URL};

/// Default notes file.
pub const DEFAULT_NOTES_FILE: &str = "notes.txt";

/// Complete configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// OAuth 1.0a credentials.
    pub credentials: Credentials,
    /// Notes file to read.
    pub notes_file: PathBuf,
    /// How the notes file is split into blocks.
    pub notes_mode: ParseMode,
    /// Max characters per post.
    pub chunk_limit: usize,
    /// Sleep between live posts.
    pub pause: Duration,
    /// Max posts per run.
    pub max_per_run: usize,
    /// Print instead of posting.
    pub dry_run: bool,
    /// Cursor file; progress tracking is off when unset.
    pub cursor_file: Option<PathBuf>,
    /// Commit and push the cursor file after each live run.
    pub push_progress: bool,
    /// Remote the cursor commit is pushed to.
    pub progress_remote: String,
    /// Optional cap on consecutive rate-limit retries of one post.
    pub max_rate_limit_retries: Option<u32>,
    /// X API base URL.
    pub api_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            notes_file: PathBuf::from(DEFAULT_NOTES_FILE),
            notes_mode: ParseMode::default(),
            chunk_limit: DEFAULT_CHUNK_LIMIT,
            pause: DEFAULT_PAUSE,
            max_per_run: DEFAULT_MAX_PER_RUN,
            dry_run: false,
            cursor_file: None,
            push_progress: false,
            progress_remote: DEFAULT_REMOTE.to_string(),
            max_rate_limit_retries: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables (all optional)
    /// - `API_KEY`, `API_SECRET`, `ACCESS_TOKEN`, `ACCESS_TOKEN_SECRET`
    /// - `NOTES_FILE` (default: notes.txt), `NOTES_MODE` (paragraph | line)
    /// - `CHUNK_LIMIT` (default: 280), `PAUSE_SEC` (default: 2),
    ///   `MAX_PER_RUN` (default: 15), `DRY_RUN` (default: false)
    /// - `CURSOR_FILE`, `PUSH_PROGRESS`, `PROGRESS_REMOTE` (default: origin)
    /// - `MAX_RATE_LIMIT_RETRIES`, `X_API_BASE_URL`
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup.
    #[must_use]
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let credentials = Credentials {
            api_key: non_empty("API_KEY"),
            api_secret: non_empty("API_SECRET"),
            access_token: non_empty("ACCESS_TOKEN"),
            access_token_secret: non_empty("ACCESS_TOKEN_SECRET"),
        };
        tracing::debug!(
            api_key_loaded = credentials.api_key.is_some(),
            "Loaded credentials from environment"
        );

        let notes_mode = non_empty("NOTES_MODE")
            .and_then(|v| match v.parse() {
                Ok(mode) => Some(mode),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring NOTES_MODE");
                    None
                }
            })
            .unwrap_or(defaults.notes_mode);

        let pause = parse_var::<f64>(&var, "PAUSE_SEC")
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .unwrap_or(defaults.pause);

        Self {
            credentials,
            notes_file: non_empty("NOTES_FILE").map_or(defaults.notes_file, PathBuf::from),
            notes_mode,
            chunk_limit: parse_var(&var, "CHUNK_LIMIT")
                .filter(|limit| *limit > 0)
                .unwrap_or(defaults.chunk_limit),
            pause,
            max_per_run: parse_var(&var, "MAX_PER_RUN").unwrap_or(defaults.max_per_run),
            dry_run: var("DRY_RUN").is_some_and(|v| is_truthy(&v)),
            cursor_file: non_empty("CURSOR_FILE").map(PathBuf::from),
            push_progress: var("PUSH_PROGRESS").is_some_and(|v| is_truthy(&v)),
            progress_remote: non_empty("PROGRESS_REMOTE").unwrap_or(defaults.progress_remote),
            max_rate_limit_retries: parse_var(&var, "MAX_RATE_LIMIT_RETRIES"),
            api_base_url: non_empty("X_API_BASE_URL").unwrap_or(defaults.api_base_url),
        }
    }

    /// Session settings derived from this configuration.
    #[must_use]
    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            max_per_run: self.max_per_run,
            pause: self.pause,
            max_rate_limit_retries: self.max_rate_limit_retries,
        }
    }
}

/// Parse an optional variable, warning and falling back on bad values.
fn parse_var<T: std::str::FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = var(key)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(value) = raw.parse() {
        Some(value)
    } else {
        tracing::warn!(key, value = raw, "Ignoring unparsable value, using default");
        None
    }
}

fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("true") || value == "1"
}
