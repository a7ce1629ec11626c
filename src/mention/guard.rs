//! ExpansionGuard - keeps committed mentions from growing
//!
//! Host input widgets happily merge typed text into an adjacent `@name`,
//! because the new characters are still in the username alphabet. The guard
//! has two tools:
//!
//! - `prevent_expansion` runs before an insertion and separates the typed
//!   character from the mention with a plain space.
//! - `detect_and_fix` runs after an edit and splices zero-width markers at
//!   the old boundary of any mention that grew, so the next scan re-truncates
//!   it. Without a previous buffer it falls back to a best-effort heuristic
//!   that only looks at the shape of each mention.

use serde::{Deserialize, Serialize};

use super::config::MentionConfig;
use super::grammar::{self, FIX_SEPARATOR, SPLIT_MARKER};
use super::offsets;
use super::scanner::{span_ending_at, MentionScanner, MentionSpan};

/// Buffer and cursor after a guarded insertion
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GuardedEdit {
    pub buffer: String,
    pub cursor: usize,
    /// True when the guard spliced the insertion itself
    pub applied: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct ExpansionGuard {
    scanner: MentionScanner,
    max_len: usize,
    body_chars_only: bool,
}

impl Default for ExpansionGuard {
    fn default() -> Self {
        Self::new(&MentionConfig::default())
    }
}

impl ExpansionGuard {
    pub fn new(config: &MentionConfig) -> Self {
        Self {
            scanner: MentionScanner::new(config.marker),
            max_len: config.max_mention_len,
            body_chars_only: config.guard_body_chars_only,
        }
    }

    /// Insert `incoming` at `cursor`, separated by a space when the cursor
    /// sits exactly at the end of a mention.
    ///
    /// When no separation is needed the input is returned untouched with
    /// `applied: false` and the host inserts the character itself.
    pub fn prevent_expansion(&self, buffer: &str, cursor: usize, incoming: char) -> GuardedEdit {
        let untouched = GuardedEdit { buffer: buffer.to_string(), cursor, applied: false };

        if self.body_chars_only && !grammar::is_body_char(incoming) {
            return untouched;
        }
        let spans = self.scanner.spans(buffer);
        if span_ending_at(&spans, cursor).is_none() {
            return untouched;
        }

        let mut insert = String::with_capacity(1 + incoming.len_utf8());
        insert.push(' ');
        insert.push(incoming);
        match offsets::splice(buffer, cursor, cursor, &insert) {
            Some(buffer) => GuardedEdit {
                buffer,
                cursor: cursor + 1 + incoming.len_utf16(),
                applied: true,
            },
            None => untouched,
        }
    }

    /// Re-isolate mentions that grew during the last edit.
    pub fn detect_and_fix(&self, buffer: &str, previous: Option<&str>) -> String {
        let spans = self.scanner.spans(buffer);
        let cuts = match previous {
            Some(previous) => grown_boundaries(&spans, &self.scanner.spans(previous)),
            None => self.suspicious_boundaries(&spans),
        };
        if cuts.is_empty() {
            return buffer.to_string();
        }

        let separator = if previous.is_some() { FIX_SEPARATOR } else { SPLIT_MARKER };
        let mut fixed = buffer.to_string();
        // right to left so earlier offsets stay valid
        for &cut in cuts.iter().rev() {
            if let Some(next) = offsets::splice(&fixed, cut, cut, separator) {
                fixed = next;
            }
        }
        log::debug!("split {} grown mention(s) at {:?}", cuts.len(), cuts);
        fixed
    }

    /// Heuristic cut points for mentions that look wrong on their own.
    ///
    /// Best effort: a long but legitimate username is split as well.
    fn suspicious_boundaries(&self, spans: &[MentionSpan]) -> Vec<usize> {
        spans
            .iter()
            .filter(|span| self.is_suspicious(span))
            .filter_map(|span| {
                let marker_units = self.scanner.marker().len_utf16();
                let limit = self.max_len.saturating_sub(marker_units);
                let prefix = grammar::body_len(span.username(), limit);
                let cut = span.start + marker_units + prefix;
                (prefix > 0 && cut < span.end).then_some(cut)
            })
            .collect()
    }

    fn is_suspicious(&self, span: &MentionSpan) -> bool {
        let username = span.username();
        username.chars().any(char::is_whitespace)
            || username.chars().any(|c| !grammar::is_body_char(c))
            || span.len() > self.max_len
    }
}

/// Offsets where a previously seen mention has grown: same start, and the new
/// text extends the old text.
fn grown_boundaries(current: &[MentionSpan], previous: &[MentionSpan]) -> Vec<usize> {
    current
        .iter()
        .filter_map(|now| {
            let before = previous.iter().find(|p| p.start == now.start)?;
            let grew = now.text.len() > before.text.len() && now.text.starts_with(&before.text);
            grew.then(|| now.start + offsets::utf16_len(&before.text))
        })
        .collect()
}
