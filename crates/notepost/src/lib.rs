//! Post a local notes file to X (Twitter).
//!
//! This crate provides:
//! - Word-aware chunking of notes into post-sized pieces
//! - Threaded, paced posting sessions that wait out rate limits
//! - An X API v2 client with OAuth 1.0a signing
//! - A persisted cursor so scheduled runs continue where the last one stopped

pub mod config;
pub mod error;
pub mod notes;
pub mod pipeline;
pub mod progress;
pub mod session;
pub mod twitter;

// Re-export main types
pub use config::Config;
pub use error::{PostError, SessionAborted};
pub use notes::{chunk_text, load_notes, ParseMode};
pub use pipeline::{Pipeline, RunOutcome};
pub use progress::{CursorFile, ProgressSink, ProgressTracker};
pub use session::{Delivery, SessionConfig, SessionPoster, SessionReport};
pub use twitter::{Credentials, PostId, PostingClient, XClient};
