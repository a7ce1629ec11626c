//! UTF-16 offset helpers
//!
//! Hosts address text in UTF-16 code units (`String.length`,
//! `selectionStart`). Rust strings are UTF-8, so every offset that crosses the
//! boundary goes through these conversions.

/// Length of `text` in UTF-16 code units
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Byte index of the UTF-16 offset `unit`.
///
/// Returns `None` past the end of the text or between the halves of a
/// surrogate pair.
pub fn byte_index(text: &str, unit: usize) -> Option<usize> {
    let mut units = 0;
    for (byte, c) in text.char_indices() {
        if units == unit {
            return Some(byte);
        }
        units += c.len_utf16();
        if units > unit {
            return None;
        }
    }
    (units == unit).then_some(text.len())
}

/// UTF-16 offset of the byte index `byte` (which must be a char boundary)
pub fn unit_index(text: &str, byte: usize) -> usize {
    utf16_len(&text[..byte])
}

/// Character that starts at UTF-16 offset `unit`
pub fn char_at(text: &str, unit: usize) -> Option<char> {
    byte_index(text, unit).and_then(|b| text[b..].chars().next())
}

/// Text from UTF-16 offset `unit` to the end
pub fn tail(text: &str, unit: usize) -> Option<&str> {
    byte_index(text, unit).map(|b| &text[b..])
}

/// Replace the UTF-16 range `[start, end)` with `replacement`
pub fn splice(text: &str, start: usize, end: usize, replacement: &str) -> Option<String> {
    if start > end {
        return None;
    }
    let from = byte_index(text, start)?;
    let to = byte_index(text, end)?;
    let mut out = String::with_capacity(text.len() - (to - from) + replacement.len());
    out.push_str(&text[..from]);
    out.push_str(replacement);
    out.push_str(&text[to..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_offsets_match_bytes() {
        let text = "hello @bob";
        assert_eq!(utf16_len(text), 10);
        assert_eq!(byte_index(text, 6), Some(6));
        assert_eq!(byte_index(text, 10), Some(10));
        assert_eq!(byte_index(text, 11), None);
    }

    #[test]
    fn test_multibyte_offsets() {
        // 'é' is 2 bytes / 1 unit, '😀' is 4 bytes / 2 units
        let text = "é😀@a";
        assert_eq!(utf16_len(text), 5);
        assert_eq!(byte_index(text, 1), Some(2));
        assert_eq!(byte_index(text, 2), None);
        assert_eq!(byte_index(text, 3), Some(6));
        assert_eq!(unit_index(text, 6), 3);
        assert_eq!(char_at(text, 3), Some('@'));
    }

    #[test]
    fn test_splice() {
        assert_eq!(splice("hello @bob bye", 6, 10, "").as_deref(), Some("hello  bye"));
        assert_eq!(splice("ab", 1, 1, "X").as_deref(), Some("aXb"));
        assert_eq!(splice("ab", 2, 1, "X"), None);
        assert_eq!(splice("ab", 0, 3, ""), None);
    }

    #[test]
    fn test_tail() {
        assert_eq!(tail("@bob hi", 4), Some(" hi"));
        assert_eq!(tail("@bob", 4), Some(""));
        assert_eq!(tail("@bob", 5), None);
    }
}
