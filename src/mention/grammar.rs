//! Mention grammar: marker, body alphabet and zero-width separators
//!
//! A mention is the marker followed by one or more characters from
//! `[a-zA-Z0-9._-]`, matched maximally, whose last character must be a word
//! character (`[a-zA-Z0-9_]`).

use std::borrow::Cow;

/// Default mention marker
pub const DEFAULT_MARKER: char = '@';

/// Heuristic upper bound on a mention's text, marker included
pub const MAX_MENTION_LEN: usize = 50;

/// ZERO WIDTH SPACE
pub const ZWSP: char = '\u{200B}';

/// ZERO WIDTH NON-JOINER
pub const ZWNJ: char = '\u{200C}';

/// Separator spliced between a mention and text that grew onto it
pub const FIX_SEPARATOR: &str = "\u{200B}\u{200C}\u{200B}";

/// Single marker used by the heuristic split
pub const SPLIT_MARKER: &str = "\u{200B}";

/// Character allowed inside a mention body
#[inline]
pub fn is_body_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')
}

/// Character that satisfies the trailing word boundary
#[inline]
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Internal span-splitting marker
#[inline]
pub fn is_zero_width(c: char) -> bool {
    c == ZWSP || c == ZWNJ
}

/// Remove zero-width markers for display. Borrows when there is nothing to strip.
pub fn strip_zero_width(text: &str) -> Cow<'_, str> {
    if text.chars().any(is_zero_width) {
        Cow::Owned(text.chars().filter(|c| !is_zero_width(*c)).collect())
    } else {
        Cow::Borrowed(text)
    }
}

/// Length in bytes of the longest valid body at the head of `text`.
///
/// Body characters are ASCII, so the result is also a char and UTF-16 count.
/// `limit` caps the body before the trailing boundary is applied.
pub fn body_len(text: &str, limit: usize) -> usize {
    let bytes = text.as_bytes();
    let mut len = text
        .chars()
        .take(limit)
        .take_while(|c| is_body_char(*c))
        .count();
    // release trailing `.` / `-` so the match ends on a word character
    while len > 0 && !is_word_char(bytes[len - 1] as char) {
        len -= 1;
    }
    len
}
