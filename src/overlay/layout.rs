//! OverlayLayoutEngine - highlighted mirror of the input field
//!
//! Splits the buffer into text and mention segments from the same scan the
//! cursor policy uses, so highlighting and interception always agree on where
//! a mention begins and ends. Caret placement is delegated to the host's text
//! measurement; if measuring fails the layout degrades to the raw text.

use serde::{Deserialize, Serialize};

use crate::mention::editor::snap_to_edge;
use crate::mention::grammar::strip_zero_width;
use crate::mention::offsets;
use crate::mention::scanner::{MentionScanner, MentionSpan};

use super::directory::UserDirectory;

// ==================== TYPE DEFINITIONS ====================

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Text,
    Mention,
}

impl SegmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentKind::Text => "text",
            SegmentKind::Mention => "mention",
        }
    }
}

/// One run of the overlay
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OverlaySegment {
    pub kind: SegmentKind,
    /// Displayed content: text without zero-width markers, or the mention's
    /// display name / username without the marker
    pub content: String,
    /// UTF-16 range in the buffer
    pub start: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<MentionSpan>,
}

/// Synthetic caret position in pixels, relative to the field's content box
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct CaretOffset {
    pub left: f64,
    pub top: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OverlayLayout {
    pub segments: Vec<OverlaySegment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caret: Option<CaretOffset>,
    /// True when layout failed and `segments` holds the raw buffer
    pub degraded: bool,
}

impl OverlayLayout {
    /// Fallback: the unprocessed buffer as a single text run, no caret.
    /// Zero-width markers are still stripped from the displayed content.
    pub fn raw(buffer: &str) -> Self {
        let content = strip_zero_width(buffer);
        let segments = if content.is_empty() {
            Vec::new()
        } else {
            vec![OverlaySegment {
                kind: SegmentKind::Text,
                content: content.into_owned(),
                start: 0,
                end: offsets::utf16_len(buffer),
                span: None,
            }]
        };
        Self { segments, caret: None, degraded: true }
    }
}

/// Measurement failures reported by the host
#[derive(Debug, Clone, PartialEq)]
pub enum MeasureError {
    Host(String),
    InvalidWidth(f64),
    InvalidLineHeight(f64),
}

impl std::fmt::Display for MeasureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeasureError::Host(msg) => write!(f, "Host measurement failed: {}", msg),
            MeasureError::InvalidWidth(w) => write!(f, "Invalid measured width: {}", w),
            MeasureError::InvalidLineHeight(h) => write!(f, "Invalid line height: {}", h),
        }
    }
}

impl std::error::Error for MeasureError {}

/// Host text-measurement primitive. Must reproduce the field's font metrics.
pub trait TextMeasurer {
    /// Rendered width of `text` styled as `kind`
    fn measure(&self, text: &str, kind: SegmentKind) -> Result<f64, MeasureError>;

    /// Distance between two baselines
    fn line_height(&self) -> f64;
}

// ==================== ENGINE ====================

pub struct OverlayLayoutEngine<M, D> {
    scanner: MentionScanner,
    measurer: M,
    directory: D,
}

impl<M: TextMeasurer, D: UserDirectory> OverlayLayoutEngine<M, D> {
    pub fn new(scanner: MentionScanner, measurer: M, directory: D) -> Self {
        Self { scanner, measurer, directory }
    }

    pub fn directory_mut(&mut self) -> &mut D {
        &mut self.directory
    }

    /// Decompose `buffer` into text and mention runs, left to right
    pub fn segments(&self, buffer: &str) -> Vec<OverlaySegment> {
        let mut segments = Vec::new();
        let mut cursor = 0;

        for span in self.scanner.scan(buffer) {
            self.push_text(buffer, cursor, span.start, &mut segments);
            let username = span.username();
            let content = self
                .directory
                .display_name(username)
                .unwrap_or_else(|| username.to_string());
            cursor = span.end;
            segments.push(OverlaySegment {
                kind: SegmentKind::Mention,
                content,
                start: span.start,
                end: span.end,
                span: Some(span),
            });
        }
        self.push_text(buffer, cursor, offsets::utf16_len(buffer), &mut segments);
        segments
    }

    fn push_text(&self, buffer: &str, start: usize, end: usize, segments: &mut Vec<OverlaySegment>) {
        if start >= end {
            return;
        }
        let (Some(from), Some(to)) = (offsets::byte_index(buffer, start), offsets::byte_index(buffer, end)) else {
            return;
        };
        let content = strip_zero_width(&buffer[from..to]);
        // a gap made only of markers renders as nothing
        if content.is_empty() {
            return;
        }
        segments.push(OverlaySegment {
            kind: SegmentKind::Text,
            content: content.into_owned(),
            start,
            end,
            span: None,
        });
    }

    /// Full layout; the caret is computed only when `cursor` is given
    pub fn layout(&self, buffer: &str, cursor: Option<usize>) -> OverlayLayout {
        let segments = self.segments(buffer);
        let caret = match cursor {
            None => None,
            Some(cursor) => match self.caret(buffer, &segments, cursor) {
                Ok(caret) => Some(caret),
                Err(e) => {
                    log::warn!("overlay degraded to raw text: {}", e);
                    return OverlayLayout::raw(buffer);
                }
            },
        };
        OverlayLayout { segments, caret, degraded: false }
    }

    fn caret(&self, buffer: &str, segments: &[OverlaySegment], cursor: usize) -> Result<CaretOffset, MeasureError> {
        let mut cursor = cursor.min(offsets::utf16_len(buffer));
        while cursor > 0 && offsets::byte_index(buffer, cursor).is_none() {
            cursor -= 1;
        }

        let mut caret = CaretOffset { left: 0.0, top: 0.0 };
        for segment in segments {
            if cursor <= segment.start {
                break;
            }
            match segment.kind {
                SegmentKind::Text => {
                    let upto = cursor.min(segment.end);
                    let (Some(from), Some(to)) =
                        (offsets::byte_index(buffer, segment.start), offsets::byte_index(buffer, upto))
                    else {
                        break;
                    };
                    self.advance_text(&mut caret, &strip_zero_width(&buffer[from..to]))?;
                }
                SegmentKind::Mention => {
                    let whole = match &segment.span {
                        Some(span) if cursor < segment.end => snap_to_edge(span, cursor) == span.end,
                        _ => true,
                    };
                    if whole {
                        caret.left += self.width(&segment.content, SegmentKind::Mention)?;
                    }
                }
            }
            if cursor < segment.end {
                break;
            }
        }
        Ok(caret)
    }

    fn advance_text(&self, caret: &mut CaretOffset, text: &str) -> Result<(), MeasureError> {
        let breaks = text.matches('\n').count();
        if breaks > 0 {
            let line_height = self.measurer.line_height();
            if !line_height.is_finite() || line_height < 0.0 {
                return Err(MeasureError::InvalidLineHeight(line_height));
            }
            caret.top += breaks as f64 * line_height;
            caret.left = 0.0;
        }
        let last_line = text.rsplit('\n').next().unwrap_or("");
        caret.left += self.width(last_line, SegmentKind::Text)?;
        Ok(())
    }

    fn width(&self, text: &str, kind: SegmentKind) -> Result<f64, MeasureError> {
        if text.is_empty() {
            return Ok(0.0);
        }
        let width = self.measurer.measure(text, kind)?;
        if !width.is_finite() || width < 0.0 {
            return Err(MeasureError::InvalidWidth(width));
        }
        Ok(width)
    }
}
