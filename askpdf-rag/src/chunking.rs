//! Splitting of oversized page text into sub-page segments.

/// Split `text` into pieces of at most `max_chars` characters, with
/// `overlap` characters shared between consecutive pieces.
///
/// Text at or under the cap is returned as a single piece. Boundaries
/// are counted in characters, not bytes, so multi-byte text is never
/// split mid-codepoint.
pub(crate) fn split_page_text(text: &str, max_chars: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_chars {
        return vec![text.to_string()];
    }

    // Config validation guarantees overlap < max_chars, so step >= 1.
    let step = max_chars.saturating_sub(overlap).max(1);
    let mut pieces = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + max_chars).min(chars.len());
        pieces.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }

    pieces
}
