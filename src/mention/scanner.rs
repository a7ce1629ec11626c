//! MentionScanner - @mention span detection
//!
//! Finds every `@username` in a buffer with an explicit character-class scan
//! (no regex engine), reporting spans in UTF-16 offsets of the original
//! buffer. Zero-width markers never appear inside a reported span: they cut
//! the body, which is how spliced separators re-truncate a grown mention.

use serde::{Deserialize, Serialize};

use super::grammar::{self, DEFAULT_MARKER};

// ==================== TYPE DEFINITIONS ====================

/// One mention occurrence
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MentionSpan {
    /// UTF-16 offset of the marker
    pub start: usize,
    /// UTF-16 offset one past the last body character
    pub end: usize,
    /// Matched text, marker included
    pub text: String,
}

impl MentionSpan {
    /// Username without the marker
    pub fn username(&self) -> &str {
        let mut chars = self.text.chars();
        chars.next();
        chars.as_str()
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// `start < pos < end`
    pub fn contains_interior(&self, pos: usize) -> bool {
        self.start < pos && pos < self.end
    }
}

// ==================== SCANNER ====================

/// Stateless mention scanner
#[derive(Clone, Copy, Debug)]
pub struct MentionScanner {
    marker: char,
}

impl Default for MentionScanner {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

impl MentionScanner {
    pub fn new(marker: char) -> Self {
        Self { marker }
    }

    pub fn marker(&self) -> char {
        self.marker
    }

    /// Lazily scan `buffer`. The iterator can be cloned or `reset` to restart.
    pub fn scan<'a>(&self, buffer: &'a str) -> Mentions<'a> {
        Mentions {
            buffer,
            marker: self.marker,
            byte_pos: 0,
            unit_pos: 0,
        }
    }

    /// Eager scan for callers that index into the spans
    pub fn spans(&self, buffer: &str) -> Vec<MentionSpan> {
        self.scan(buffer).collect()
    }
}

/// Iterator over the mentions of one buffer, left to right
#[derive(Clone, Debug)]
pub struct Mentions<'a> {
    buffer: &'a str,
    marker: char,
    // search cursor: where the next marker lookup starts
    byte_pos: usize,
    unit_pos: usize,
}

impl<'a> Mentions<'a> {
    /// Rewind the search cursor to the start of the buffer
    pub fn reset(&mut self) {
        self.byte_pos = 0;
        self.unit_pos = 0;
    }
}

impl<'a> Iterator for Mentions<'a> {
    type Item = MentionSpan;

    fn next(&mut self) -> Option<MentionSpan> {
        loop {
            let rest = &self.buffer[self.byte_pos..];
            let Some(rel) = rest.find(self.marker) else {
                self.byte_pos = self.buffer.len();
                return None;
            };

            let marker_byte = self.byte_pos + rel;
            let marker_unit = self.unit_pos + super::offsets::utf16_len(&rest[..rel]);
            let body_byte = marker_byte + self.marker.len_utf8();
            let body = grammar::body_len(&self.buffer[body_byte..], usize::MAX);

            if body == 0 {
                self.byte_pos = body_byte;
                self.unit_pos = marker_unit + self.marker.len_utf16();
                continue;
            }

            // body characters are ASCII: bytes == units
            let end_byte = body_byte + body;
            let end_unit = marker_unit + self.marker.len_utf16() + body;
            self.byte_pos = end_byte;
            self.unit_pos = end_unit;

            return Some(MentionSpan {
                start: marker_unit,
                end: end_unit,
                text: self.buffer[marker_byte..end_byte].to_string(),
            });
        }
    }
}

impl std::iter::FusedIterator for Mentions<'_> {}

// ==================== SPAN QUERIES ====================

/// Span whose interior strictly contains `pos`
pub fn span_with_interior(spans: &[MentionSpan], pos: usize) -> Option<&MentionSpan> {
    spans.iter().find(|s| s.contains_interior(pos))
}

/// Span that starts exactly at `pos`
pub fn span_starting_at(spans: &[MentionSpan], pos: usize) -> Option<&MentionSpan> {
    spans.iter().find(|s| s.start == pos)
}

/// Span that ends exactly at `pos`
pub fn span_ending_at(spans: &[MentionSpan], pos: usize) -> Option<&MentionSpan> {
    spans.iter().find(|s| s.end == pos)
}

/// Convenience: scan with the default `@` marker
pub fn scan_mentions(buffer: &str) -> Vec<MentionSpan> {
    MentionScanner::default().spans(buffer)
}
