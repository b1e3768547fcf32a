//! Word-aware splitting of text into post-sized chunks.

/// Default maximum post length in characters.
pub const DEFAULT_CHUNK_LIMIT: usize = 280;

/// Split `text` into chunks of at most `limit` characters without breaking words.
///
/// Whitespace is normalised to single spaces. A word is appended to the
/// current chunk only while the result still fits; otherwise the chunk is
/// closed and the word starts the next one. A single word longer than
/// `limit` is emitted as its own oversized chunk rather than being cut.
///
/// Lengths are counted in `char`s, not bytes.
#[must_use]
pub fn chunk_text(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= limit {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            chunks.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<&str> {
        text.split_whitespace().collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(chunk_text("", DEFAULT_CHUNK_LIMIT).is_empty());
        assert!(chunk_text("   \n\t ", DEFAULT_CHUNK_LIMIT).is_empty());
    }

    #[test]
    fn test_short_text_is_single_normalised_chunk() {
        let chunks = chunk_text("  hello   there\n world ", DEFAULT_CHUNK_LIMIT);
        assert_eq!(chunks, vec!["hello there world"]);
    }

    #[test]
    fn test_exact_limit_fits() {
        // "aaaa bbbb" is 9 chars
        assert_eq!(chunk_text("aaaa bbbb", 9), vec!["aaaa bbbb"]);
        assert_eq!(chunk_text("aaaa bbbb", 8), vec!["aaaa", "bbbb"]);
    }

    #[test]
    fn test_long_text_respects_limit_and_word_order() {
        let text = "the quick brown fox jumps over the lazy dog ".repeat(20);
        let chunks = chunk_text(&text, 50);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 50, "chunk too long: {chunk}");
        }

        let rejoined: Vec<&str> = chunks.iter().flat_map(|c| c.split(' ')).collect();
        assert_eq!(rejoined, words(&text));
    }

    #[test]
    fn test_chunks_are_greedy() {
        let chunks = chunk_text("aa bb cc dd ee", 5);
        assert_eq!(chunks, vec!["aa bb", "cc dd", "ee"]);
    }

    #[test]
    fn test_oversized_word_is_its_own_chunk() {
        let long = "x".repeat(30);
        let text = format!("{long} tail");
        let chunks = chunk_text(&text, 10);
        assert_eq!(chunks, vec![long.clone(), "tail".to_string()]);

        let chunks = chunk_text(&format!("head {long}"), 10);
        assert_eq!(chunks, vec!["head".to_string(), long]);
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        // 5 chars each, 10 bytes each
        let text = "ééééé ééééé";
        assert_eq!(chunk_text(text, 11), vec![text]);
        assert_eq!(chunk_text(text, 10).len(), 2);
    }
}
