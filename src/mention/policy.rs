//! CursorMentionPolicy - atomic cursor movement and deletion around mentions
//!
//! Given the buffer, the cursor and the pending edit, decides whether the host
//! must suppress its default handling and what text/cursor to apply instead.
//! Mentions behave as single units: the cursor never stops inside one and a
//! deletion never leaves half of one behind.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use super::config::MentionConfig;
use super::grammar;
use super::offsets;
use super::scanner::{
    span_ending_at, span_starting_at, span_with_interior, MentionScanner, MentionSpan,
};

// ==================== TYPE DEFINITIONS ====================

/// Modifier keys held during the edit
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Word-level jump / delete
    #[serde(default)]
    pub ctrl: bool,
    /// Line-level jump / delete
    #[serde(default)]
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { ctrl: false, meta: false };
    pub const CTRL: Modifiers = Modifiers { ctrl: true, meta: false };
    pub const META: Modifiers = Modifiers { ctrl: false, meta: true };
}

/// Pending edit operation
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditIntent {
    MoveLeft(Modifiers),
    MoveRight(Modifiers),
    MoveHome,
    MoveEnd,
    DeleteBackward(Modifiers),
    DeleteForward(Modifiers),
    InsertChar { ch: char },
}

/// Key-press event as delivered by the host widget
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// DOM key name (`ArrowLeft`, `Backspace`, `a`, ...)
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub meta: bool,
}

impl KeyEvent {
    pub fn new(key: &str, ctrl: bool, meta: bool) -> Self {
        Self { key: key.to_string(), ctrl, meta }
    }

    /// Map the event to an edit intent. Keys with no mention semantics map to `None`.
    pub fn intent(&self) -> Option<EditIntent> {
        let modifiers = Modifiers { ctrl: self.ctrl, meta: self.meta };
        match self.key.as_str() {
            "ArrowLeft" => Some(EditIntent::MoveLeft(modifiers)),
            "ArrowRight" => Some(EditIntent::MoveRight(modifiers)),
            "Home" => Some(EditIntent::MoveHome),
            "End" => Some(EditIntent::MoveEnd),
            "Backspace" => Some(EditIntent::DeleteBackward(modifiers)),
            "Delete" => Some(EditIntent::DeleteForward(modifiers)),
            key => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    // ctrl/meta + char is a shortcut, not typing
                    (Some(ch), None) if !self.ctrl && !self.meta => Some(EditIntent::InsertChar { ch }),
                    _ => None,
                }
            }
        }
    }
}

/// Outcome of a policy decision
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PolicyResult {
    /// Host must suppress its default handling
    pub intercepted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_cursor: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_buffer: Option<String>,
}

impl PolicyResult {
    /// Not intercepted: host default behavior
    pub fn pass() -> Self {
        Self::default()
    }

    /// Intercepted with nothing to apply
    pub fn suppress() -> Self {
        Self { intercepted: true, ..Self::default() }
    }

    /// Intercepted cursor move, text untouched
    pub fn move_to(cursor: usize) -> Self {
        Self { intercepted: true, new_cursor: Some(cursor), new_buffer: None }
    }

    /// Intercepted text rewrite
    pub fn rewrite(buffer: String, cursor: usize) -> Self {
        Self { intercepted: true, new_cursor: Some(cursor), new_buffer: Some(buffer) }
    }
}

// ==================== POLICY ====================

/// Decides how edits interact with the mentions of a buffer
#[derive(Clone, Copy, Debug)]
pub struct CursorMentionPolicy {
    scanner: MentionScanner,
    trailing_space_guard: bool,
}

impl Default for CursorMentionPolicy {
    fn default() -> Self {
        Self::new(&MentionConfig::default())
    }
}

impl CursorMentionPolicy {
    pub fn new(config: &MentionConfig) -> Self {
        Self {
            scanner: MentionScanner::new(config.marker),
            trailing_space_guard: config.trailing_space_guard,
        }
    }

    /// Decide whether `intent` at `cursor` must be intercepted.
    ///
    /// A cursor past the end of the buffer or inside a surrogate pair is
    /// never intercepted.
    pub fn decide(&self, buffer: &str, cursor: usize, intent: EditIntent) -> PolicyResult {
        if offsets::byte_index(buffer, cursor).is_none() {
            return PolicyResult::pass();
        }
        let spans = self.scanner.spans(buffer);
        if spans.is_empty() {
            return PolicyResult::pass();
        }

        let result = match intent {
            EditIntent::MoveLeft(m) if m.meta => move_home(buffer, &spans, cursor),
            EditIntent::MoveLeft(m) if m.ctrl => word_left(buffer, &spans, cursor),
            EditIntent::MoveLeft(_) => move_left(&spans, cursor),
            EditIntent::MoveRight(m) if m.meta => move_end(&spans, cursor),
            EditIntent::MoveRight(m) if m.ctrl => word_right(buffer, &spans, cursor),
            EditIntent::MoveRight(_) => move_right(buffer, &spans, cursor),
            EditIntent::MoveHome => move_home(buffer, &spans, cursor),
            EditIntent::MoveEnd => move_end(&spans, cursor),
            EditIntent::DeleteBackward(m) => self.delete_backward(buffer, &spans, cursor, m),
            EditIntent::DeleteForward(m) => delete_forward(buffer, &spans, cursor, m),
            EditIntent::InsertChar { .. } => PolicyResult::pass(),
        };

        if result.intercepted {
            log::debug!("intercepted {:?} at {} -> {:?}", intent, cursor, result.new_cursor);
        }
        result
    }

    fn delete_backward(
        &self,
        buffer: &str,
        spans: &[MentionSpan],
        cursor: usize,
        modifiers: Modifiers,
    ) -> PolicyResult {
        if modifiers.meta {
            return match span_with_interior(spans, cursor) {
                Some(span) => PolicyResult::move_to(span.start),
                None => PolicyResult::pass(),
            };
        }

        if let Some(span) = span_ending_at(spans, cursor) {
            return delete_range(buffer, span.start, span.end, span.start);
        }

        if modifiers.ctrl {
            if let Some(span) = span_with_interior(spans, cursor) {
                return PolicyResult::move_to(span.start);
            }
            // a word delete that would cut into a mention takes all of it
            return match word_left_target(buffer, cursor).and_then(|t| span_with_interior(spans, t)) {
                Some(span) => delete_range(buffer, span.start, cursor, span.start),
                None => PolicyResult::pass(),
            };
        }

        if let Some(span) = span_starting_at(spans, cursor) {
            return delete_range(buffer, span.start, span.end, span.start);
        }
        if let Some(span) = span_with_interior(spans, cursor) {
            return PolicyResult::move_to(span.start);
        }
        if self.trailing_space_guard && self.guards_trailing_space(buffer, spans, cursor) {
            return PolicyResult::suppress();
        }
        PolicyResult::pass()
    }

    /// Backspace on the lone space after a mention, with text still following
    fn guards_trailing_space(&self, buffer: &str, spans: &[MentionSpan], cursor: usize) -> bool {
        if cursor == 0 || span_ending_at(spans, cursor - 1).is_none() {
            return false;
        }
        if offsets::char_at(buffer, cursor - 1) != Some(' ') {
            return false;
        }
        // only a single space with text right after it can let the text fuse
        offsets::tail(buffer, cursor)
            .and_then(|rest| rest.chars().find(|c| !grammar::is_zero_width(*c)))
            .map_or(false, |c| !c.is_whitespace())
    }
}

// ==================== MOVEMENT ====================

fn move_left(spans: &[MentionSpan], cursor: usize) -> PolicyResult {
    match spans.iter().find(|s| s.start < cursor && cursor <= s.end) {
        Some(span) => PolicyResult::move_to(span.start),
        None => PolicyResult::pass(),
    }
}

/// Entering at span.start counts as entering the mention.
fn move_right(buffer: &str, spans: &[MentionSpan], cursor: usize) -> PolicyResult {
    let next = offsets::char_at(buffer, cursor).map_or(cursor, |ch| cursor + ch.len_utf16());
    match spans.iter().find(|s| s.start <= next && cursor < s.end) {
        Some(span) => PolicyResult::move_to(span.end),
        None => PolicyResult::pass(),
    }
}

/// Line-origin jump: stop at the end of the nearest mention between the
/// line start and the cursor.
fn move_home(buffer: &str, spans: &[MentionSpan], cursor: usize) -> PolicyResult {
    let origin = line_start(buffer, cursor);
    let nearest = spans
        .iter()
        .filter(|s| s.start >= origin && s.end < cursor)
        .last();
    if let Some(span) = nearest {
        return PolicyResult::move_to(span.end);
    }
    match span_with_interior(spans, cursor) {
        Some(span) => PolicyResult::move_to(span.start),
        None => PolicyResult::pass(),
    }
}

fn move_end(spans: &[MentionSpan], cursor: usize) -> PolicyResult {
    match span_with_interior(spans, cursor) {
        Some(span) => PolicyResult::move_to(span.end),
        None => PolicyResult::pass(),
    }
}

fn word_left(buffer: &str, spans: &[MentionSpan], cursor: usize) -> PolicyResult {
    if let Some(span) = spans.iter().find(|s| s.start < cursor && cursor <= s.end) {
        return PolicyResult::move_to(span.start);
    }
    match word_left_target(buffer, cursor).and_then(|t| span_with_interior(spans, t)) {
        Some(span) => PolicyResult::move_to(span.start),
        None => PolicyResult::pass(),
    }
}

fn word_right(buffer: &str, spans: &[MentionSpan], cursor: usize) -> PolicyResult {
    if let Some(span) = spans.iter().find(|s| s.start <= cursor && cursor < s.end) {
        return PolicyResult::move_to(span.end);
    }
    match word_right_target(buffer, cursor).and_then(|t| span_with_interior(spans, t)) {
        Some(span) => PolicyResult::move_to(span.end),
        None => PolicyResult::pass(),
    }
}

// ==================== DELETION ====================

fn delete_forward(buffer: &str, spans: &[MentionSpan], cursor: usize, modifiers: Modifiers) -> PolicyResult {
    if let Some(span) = span_with_interior(spans, cursor) {
        return PolicyResult::move_to(span.end);
    }
    if modifiers.meta {
        return PolicyResult::pass();
    }
    if let Some(span) = span_starting_at(spans, cursor) {
        return delete_range(buffer, span.start, span.end, span.start);
    }
    if modifiers.ctrl {
        if let Some(span) = word_right_target(buffer, cursor).and_then(|t| span_with_interior(spans, t)) {
            return delete_range(buffer, cursor, span.end, cursor);
        }
    }
    PolicyResult::pass()
}

fn delete_range(buffer: &str, start: usize, end: usize, cursor: usize) -> PolicyResult {
    match offsets::splice(buffer, start, end, "") {
        Some(text) => PolicyResult::rewrite(text, cursor),
        None => PolicyResult::pass(),
    }
}

// ==================== BOUNDARIES ====================

/// Start of the line holding `cursor`
fn line_start(buffer: &str, cursor: usize) -> usize {
    let Some(cut) = offsets::byte_index(buffer, cursor) else {
        return 0;
    };
    match buffer[..cut].rfind('\n') {
        Some(b) => offsets::unit_index(buffer, b + 1),
        None => 0,
    }
}

/// Where a word-left jump from `cursor` lands (start of the previous word)
pub(crate) fn word_left_target(buffer: &str, cursor: usize) -> Option<usize> {
    let cut = offsets::byte_index(buffer, cursor)?;
    buffer[..cut]
        .split_word_bound_indices()
        .rev()
        .find(|(_, word)| !word.trim().is_empty())
        .map(|(b, _)| offsets::unit_index(buffer, b))
}

/// Where a word-right jump from `cursor` lands (end of the next word)
pub(crate) fn word_right_target(buffer: &str, cursor: usize) -> Option<usize> {
    let cut = offsets::byte_index(buffer, cursor)?;
    buffer[cut..]
        .split_word_bound_indices()
        .find(|(_, word)| !word.trim().is_empty())
        .map(|(b, word)| offsets::unit_index(buffer, cut + b + word.len()))
}
