//! Tests for CursorMentionPolicy
//!
//! Atomic navigation and deletion around mention spans.

use crate::mention::config::MentionConfig;
use crate::mention::policy::{CursorMentionPolicy, EditIntent, KeyEvent, Modifiers, PolicyResult};
use crate::mention::scanner::scan_mentions;

fn decide(buffer: &str, cursor: usize, intent: EditIntent) -> PolicyResult {
    CursorMentionPolicy::default().decide(buffer, cursor, intent)
}

const LEFT: EditIntent = EditIntent::MoveLeft(Modifiers::NONE);
const RIGHT: EditIntent = EditIntent::MoveRight(Modifiers::NONE);
const BACKSPACE: EditIntent = EditIntent::DeleteBackward(Modifiers::NONE);
const DELETE: EditIntent = EditIntent::DeleteForward(Modifiers::NONE);

// ============================================================================
// Movement
// ============================================================================

#[test]
fn test_move_right_into_span_skips_to_end() {
    assert_eq!(decide("@ab", 0, RIGHT), PolicyResult::move_to(3));
    assert_eq!(decide("@ab", 1, RIGHT), PolicyResult::move_to(3));
    assert_eq!(decide("@ab", 2, RIGHT), PolicyResult::move_to(3));
}

#[test]
fn test_move_right_outside_span_passes() {
    assert_eq!(decide("x @ab y", 0, RIGHT), PolicyResult::pass());
    assert_eq!(decide("x @ab y", 5, RIGHT), PolicyResult::pass());
}

#[test]
fn test_move_right_onto_span_start_skips_to_end() {
    assert_eq!(decide("x @ab y", 1, RIGHT), PolicyResult::move_to(5));
    // the step over an astral char lands on the marker
    assert_eq!(decide("😀@bob", 0, RIGHT), PolicyResult::move_to(6));
}

#[test]
fn test_move_left_from_end_or_interior_lands_at_start() {
    assert_eq!(decide("x @ab y", 5, LEFT), PolicyResult::move_to(2));
    assert_eq!(decide("x @ab y", 4, LEFT), PolicyResult::move_to(2));
}

#[test]
fn test_move_left_from_start_exits_normally() {
    assert_eq!(decide("x @ab y", 2, LEFT), PolicyResult::pass());
    assert_eq!(decide("x @ab y", 7, LEFT), PolicyResult::pass());
}

#[test]
fn test_home_stops_after_nearest_mention() {
    let buffer = "@a then @bob and more";
    assert_eq!(decide(buffer, 20, EditIntent::MoveHome), PolicyResult::move_to(12));
    assert_eq!(decide(buffer, 12, EditIntent::MoveHome), PolicyResult::move_to(2));
    assert_eq!(decide(buffer, 2, EditIntent::MoveHome), PolicyResult::pass());
}

#[test]
fn test_meta_left_behaves_like_home() {
    let buffer = "hey @bob there";
    assert_eq!(
        decide(buffer, 14, EditIntent::MoveLeft(Modifiers::META)),
        PolicyResult::move_to(8)
    );
}

#[test]
fn test_home_only_considers_current_line() {
    let buffer = "@ann\nplain line";
    assert_eq!(decide(buffer, 15, EditIntent::MoveHome), PolicyResult::pass());
}

#[test]
fn test_end_from_interior_lands_at_span_end() {
    assert_eq!(decide("@alice x", 3, EditIntent::MoveEnd), PolicyResult::move_to(6));
    assert_eq!(decide("@alice x", 7, EditIntent::MoveEnd), PolicyResult::pass());
}

#[test]
fn test_ctrl_left_word_jump_into_mention_lands_at_start() {
    // word segmentation would stop at the 'b' of "bob"
    let buffer = "hi @bob ";
    assert_eq!(
        decide(buffer, 8, EditIntent::MoveLeft(Modifiers::CTRL)),
        PolicyResult::move_to(3)
    );
}

#[test]
fn test_ctrl_right_word_jump_over_hyphenated_mention() {
    // "user-123" is several words; the jump must cover the whole mention
    let buffer = "cc @user-123 ok";
    assert_eq!(
        decide(buffer, 2, EditIntent::MoveRight(Modifiers::CTRL)),
        PolicyResult::move_to(12)
    );
}

#[test]
fn test_ctrl_right_outside_mentions_passes() {
    assert_eq!(
        decide("@a plain words", 3, EditIntent::MoveRight(Modifiers::CTRL)),
        PolicyResult::pass()
    );
}

// ============================================================================
// Deletion
// ============================================================================

#[test]
fn test_backspace_at_end_deletes_whole_mention() {
    let result = decide("hello @user-123 bye", 15, BACKSPACE);
    assert_eq!(result, PolicyResult::rewrite("hello  bye".to_string(), 6));
}

#[test]
fn test_backspace_at_every_span_end_removes_exact_range() {
    let buffer = "@a, @bee and @c.d";
    for span in scan_mentions(buffer) {
        let result = decide(buffer, span.end, BACKSPACE);
        let mut expected = buffer.to_string();
        expected.replace_range(span.start..span.end, "");
        assert_eq!(result, PolicyResult::rewrite(expected, span.start));
    }
}

#[test]
fn test_backspace_at_start_deletes_following_mention() {
    assert_eq!(decide("x @ab", 2, BACKSPACE), PolicyResult::rewrite("x ".to_string(), 2));
}

#[test]
fn test_backspace_inside_moves_to_start() {
    assert_eq!(decide("x @abc", 4, BACKSPACE), PolicyResult::move_to(2));
}

#[test]
fn test_backspace_on_trailing_space_with_text_after_is_suppressed() {
    assert_eq!(decide("@bob hello", 5, BACKSPACE), PolicyResult::suppress());
}

#[test]
fn test_backspace_on_trailing_space_at_end_passes() {
    assert_eq!(decide("@bob ", 5, BACKSPACE), PolicyResult::pass());
    assert_eq!(decide("@bob   ", 5, BACKSPACE), PolicyResult::pass());
}

#[test]
fn test_backspace_on_first_of_two_spaces_passes() {
    assert_eq!(decide("@bob  hello", 5, BACKSPACE), PolicyResult::pass());
    assert_eq!(decide("@bob \u{200B}hello", 5, BACKSPACE), PolicyResult::suppress());
}

#[test]
fn test_trailing_space_guard_can_be_disabled() {
    let config = MentionConfig { trailing_space_guard: false, ..MentionConfig::default() };
    let policy = CursorMentionPolicy::new(&config);
    assert_eq!(policy.decide("@bob hello", 5, BACKSPACE), PolicyResult::pass());
}

#[test]
fn test_delete_at_start_removes_mention() {
    assert_eq!(decide("a @bob c", 2, DELETE), PolicyResult::rewrite("a  c".to_string(), 2));
}

#[test]
fn test_delete_inside_never_erases() {
    let buffer = "a @bobby c";
    let spans = scan_mentions(buffer);
    let span = &spans[0];
    for cursor in span.start + 1..span.end {
        let result = decide(buffer, cursor, DELETE);
        assert_eq!(result, PolicyResult::move_to(span.end), "cursor {}", cursor);
        assert!(result.new_buffer.is_none());
    }
}

#[test]
fn test_delete_at_end_passes() {
    assert_eq!(decide("@bob c", 4, DELETE), PolicyResult::pass());
}

#[test]
fn test_ctrl_backspace_widens_into_whole_mention_prefix() {
    // a plain word delete from here would take only "123 "
    let buffer = "cc @user-123 ";
    assert_eq!(
        decide(buffer, 13, EditIntent::DeleteBackward(Modifiers::CTRL)),
        PolicyResult::rewrite("cc ".to_string(), 3)
    );
}

#[test]
fn test_ctrl_backspace_at_end_removes_mention() {
    assert_eq!(
        decide("cc @user-123", 12, EditIntent::DeleteBackward(Modifiers::CTRL)),
        PolicyResult::rewrite("cc ".to_string(), 3)
    );
}

#[test]
fn test_ctrl_delete_widens_to_mention_end() {
    // a plain word delete would take " @" and leave "ab-cd"
    let buffer = "x @ab-cd";
    assert_eq!(
        decide(buffer, 1, EditIntent::DeleteForward(Modifiers::CTRL)),
        PolicyResult::rewrite("x".to_string(), 1)
    );
}

#[test]
fn test_meta_backspace_inside_moves_to_start_only() {
    let buffer = "x @abc";
    assert_eq!(
        decide(buffer, 4, EditIntent::DeleteBackward(Modifiers::META)),
        PolicyResult::move_to(2)
    );
    assert_eq!(
        decide(buffer, 6, EditIntent::DeleteBackward(Modifiers::META)),
        PolicyResult::pass()
    );
}

// ============================================================================
// Degraded input
// ============================================================================

#[test]
fn test_out_of_range_cursor_passes() {
    assert_eq!(decide("@bob", 99, BACKSPACE), PolicyResult::pass());
}

#[test]
fn test_cursor_inside_surrogate_pair_passes() {
    assert_eq!(decide("😀@bob", 1, RIGHT), PolicyResult::pass());
}

#[test]
fn test_no_mentions_passes() {
    assert_eq!(decide("plain text", 3, BACKSPACE), PolicyResult::pass());
    assert_eq!(decide("", 0, DELETE), PolicyResult::pass());
}

#[test]
fn test_insert_char_is_not_a_policy_concern() {
    assert_eq!(decide("@bob", 4, EditIntent::InsertChar { ch: 'x' }), PolicyResult::pass());
}

// ============================================================================
// Key events
// ============================================================================

#[test]
fn test_key_event_mapping() {
    assert_eq!(KeyEvent::new("ArrowLeft", true, false).intent(), Some(EditIntent::MoveLeft(Modifiers::CTRL)));
    assert_eq!(KeyEvent::new("Home", false, false).intent(), Some(EditIntent::MoveHome));
    assert_eq!(KeyEvent::new("Delete", false, true).intent(), Some(EditIntent::DeleteForward(Modifiers::META)));
    assert_eq!(KeyEvent::new("x", false, false).intent(), Some(EditIntent::InsertChar { ch: 'x' }));
    assert_eq!(KeyEvent::new("a", true, false).intent(), None);
    assert_eq!(KeyEvent::new("Shift", false, false).intent(), None);
}

#[test]
fn test_intent_json_shape() {
    let intent: EditIntent = serde_json::from_str(r#"{"kind":"move_left","ctrl":true}"#).unwrap();
    assert_eq!(intent, EditIntent::MoveLeft(Modifiers::CTRL));
    let intent: EditIntent = serde_json::from_str(r#"{"kind":"insert_char","ch":"q"}"#).unwrap();
    assert_eq!(intent, EditIntent::InsertChar { ch: 'q' });
    let intent: EditIntent = serde_json::from_str(r#"{"kind":"move_home"}"#).unwrap();
    assert_eq!(intent, EditIntent::MoveHome);
}

#[test]
fn test_result_json_omits_absent_fields() {
    let json = serde_json::to_string(&PolicyResult::pass()).unwrap();
    assert_eq!(json, r#"{"intercepted":false}"#);
    let json = serde_json::to_string(&PolicyResult::move_to(4)).unwrap();
    assert_eq!(json, r#"{"intercepted":true,"new_cursor":4}"#);
}
