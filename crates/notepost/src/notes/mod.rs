//! Notes module.
//!
//! Turns a notes file into the ordered queue of post-sized strings.

mod chunker;
mod loader;

pub use chunker::{chunk_text, DEFAULT_CHUNK_LIMIT};
pub use loader::{load_notes, parse_blocks, parse_notes, ParseMode, BLOCK_SENTINEL};
