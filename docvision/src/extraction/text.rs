//! Text statistics shared by every extraction path.

/// Appended to an excerpt that was cut short.
pub const CONTINUATION_MARKER: &str = "...";

/// Bounded prefix of `text`.
///
/// Text of at most `max_chars` characters is returned unchanged. Longer text
/// is cut to exactly `max_chars` characters and gets [`CONTINUATION_MARKER`].
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => {
            let mut truncated = String::with_capacity(byte_index + CONTINUATION_MARKER.len());
            truncated.push_str(&text[..byte_index]);
            truncated.push_str(CONTINUATION_MARKER);
            truncated
        }
        None => text.to_string(),
    }
}

/// Length in characters, not bytes.
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Whitespace-delimited token count; runs of whitespace count as one separator.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
