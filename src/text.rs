//! Text cleanup helpers applied to page content before embedding.

/// Normalizes raw page text: drops every character that is not an ASCII
/// letter, digit, or underscore, collapses whitespace runs (including
/// newlines) to a single space, and trims the ends.
///
/// Total over any input; idempotent.
pub fn normalize(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    let mut pending_space = false;
    for c in raw.chars() {
        if c.is_whitespace() {
            pending_space = !cleaned.is_empty();
        } else if c.is_ascii_alphanumeric() || c == '_' {
            if pending_space {
                cleaned.push(' ');
                pending_space = false;
            }
            cleaned.push(c);
        }
    }
    cleaned
}

/// Splits `text` into windows of `chunk_size` whitespace-separated words.
///
/// The ingestion pipeline embeds whole pages and does not call this; it is
/// kept as a public helper for callers that want to pre-split oversized
/// documents (window size: [`crate::config::CHUNK_SIZE`]).
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<String> {
    if chunk_size == 0 {
        return Vec::new();
    }
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(chunk_size)
        .map(|window| window.join(" "))
        .collect()
}
