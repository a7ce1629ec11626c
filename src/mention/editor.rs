//! MentionEditor - one entry point for the host input widget
//!
//! Routes key events to the expansion guard (insertions) or the cursor
//! policy (everything else), and provides the post-click cursor clamp.
//! Holds configuration only; every call works on the snapshot it is given.

use std::borrow::Cow;

use super::config::MentionConfig;
use super::grammar;
use super::guard::{ExpansionGuard, GuardedEdit};
use super::offsets;
use super::policy::{CursorMentionPolicy, EditIntent, KeyEvent, PolicyResult};
use super::scanner::{span_with_interior, MentionScanner, MentionSpan};

#[derive(Clone, Debug, Default)]
pub struct MentionEditor {
    config: MentionConfig,
    scanner: MentionScanner,
    policy: CursorMentionPolicy,
    guard: ExpansionGuard,
}

impl MentionEditor {
    pub fn new(config: MentionConfig) -> Self {
        Self {
            scanner: MentionScanner::new(config.marker),
            policy: CursorMentionPolicy::new(&config),
            guard: ExpansionGuard::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &MentionConfig {
        &self.config
    }

    pub fn scan(&self, buffer: &str) -> Vec<MentionSpan> {
        self.scanner.spans(buffer)
    }

    /// Evaluate a key press. Unknown keys are never intercepted.
    pub fn handle_key(&self, buffer: &str, cursor: usize, event: &KeyEvent) -> PolicyResult {
        match event.intent() {
            Some(intent) => self.apply(buffer, cursor, intent),
            None => PolicyResult::pass(),
        }
    }

    /// Evaluate an edit intent
    pub fn apply(&self, buffer: &str, cursor: usize, intent: EditIntent) -> PolicyResult {
        match intent {
            EditIntent::InsertChar { ch } => {
                let edit = self.guard.prevent_expansion(buffer, cursor, ch);
                if edit.applied {
                    PolicyResult::rewrite(edit.buffer, edit.cursor)
                } else {
                    PolicyResult::pass()
                }
            }
            intent => self.policy.decide(buffer, cursor, intent),
        }
    }

    pub fn decide(&self, buffer: &str, cursor: usize, intent: EditIntent) -> PolicyResult {
        self.policy.decide(buffer, cursor, intent)
    }

    pub fn prevent_expansion(&self, buffer: &str, cursor: usize, incoming: char) -> GuardedEdit {
        self.guard.prevent_expansion(buffer, cursor, incoming)
    }

    pub fn detect_and_fix(&self, buffer: &str, previous: Option<&str>) -> String {
        self.guard.detect_and_fix(buffer, previous)
    }

    /// Post-click re-check: keep the cursor inside the buffer and out of any
    /// mention's interior (nearest edge, ties to the end). Never edits text.
    pub fn clamp_cursor(&self, buffer: &str, cursor: usize) -> usize {
        let len = offsets::utf16_len(buffer);
        let mut cursor = cursor.min(len);
        // between surrogate halves: step back onto the pair's start
        while cursor > 0 && offsets::byte_index(buffer, cursor).is_none() {
            cursor -= 1;
        }
        let spans = self.scanner.spans(buffer);
        match span_with_interior(&spans, cursor) {
            Some(span) => snap_to_edge(span, cursor),
            None => cursor,
        }
    }

    /// Buffer as shown to the user: zero-width markers removed
    pub fn display_text<'a>(&self, buffer: &'a str) -> Cow<'a, str> {
        grammar::strip_zero_width(buffer)
    }
}

/// Nearer edge of `span` for an interior position, ties to the end
pub(crate) fn snap_to_edge(span: &MentionSpan, pos: usize) -> usize {
    if pos - span.start < span.end - pos {
        span.start
    } else {
        span.end
    }
}
