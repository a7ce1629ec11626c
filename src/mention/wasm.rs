use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::mention::config::MentionConfig;
use crate::mention::editor::MentionEditor;
use crate::mention::guard::GuardedEdit;
use crate::mention::policy::{EditIntent, KeyEvent, PolicyResult};

/// Mention engine exposed to the host web client.
///
/// Every method is total: text that is not a string is treated as empty,
/// a negative or fractional cursor is never intercepted.
#[wasm_bindgen]
pub struct MentionEngine {
    inner: MentionEditor,
}

#[wasm_bindgen]
impl MentionEngine {
    /// Create an engine from an optional config object
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<MentionEngine, JsValue> {
        let config: MentionConfig = if config.is_null() || config.is_undefined() {
            MentionConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
        };
        config.validate().map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(MentionEngine { inner: MentionEditor::new(config) })
    }

    /// Array of `{ start, end, text }`
    #[wasm_bindgen(js_name = scan)]
    pub fn js_scan(&self, text: JsValue) -> JsValue {
        to_js(&self.inner.scan(&text_arg(&text)))
    }

    /// `{ intercepted, new_cursor?, new_buffer? }` for a `{ key, ctrl, meta }` event
    #[wasm_bindgen(js_name = handleKey)]
    pub fn js_handle_key(&self, text: JsValue, cursor: f64, event: JsValue) -> JsValue {
        let result = match (cursor_arg(cursor), serde_wasm_bindgen::from_value::<KeyEvent>(event)) {
            (Some(cursor), Ok(event)) => self.inner.handle_key(&text_arg(&text), cursor, &event),
            _ => PolicyResult::pass(),
        };
        to_js(&result)
    }

    /// Same as `handleKey` for a pre-built intent (`{ kind: "move_left", ctrl, meta }`)
    #[wasm_bindgen(js_name = decide)]
    pub fn js_decide(&self, text: JsValue, cursor: f64, intent: JsValue) -> JsValue {
        let result = match (cursor_arg(cursor), serde_wasm_bindgen::from_value::<EditIntent>(intent)) {
            (Some(cursor), Ok(intent)) => self.inner.apply(&text_arg(&text), cursor, intent),
            _ => PolicyResult::pass(),
        };
        to_js(&result)
    }

    /// `{ buffer, cursor, applied }`
    #[wasm_bindgen(js_name = preventExpansion)]
    pub fn js_prevent_expansion(&self, text: JsValue, cursor: f64, incoming: &str) -> JsValue {
        let text = text_arg(&text);
        let edit = match (cursor_arg(cursor), incoming.chars().next()) {
            (Some(cursor), Some(ch)) => self.inner.prevent_expansion(&text, cursor, ch),
            _ => GuardedEdit { cursor: cursor_arg(cursor).unwrap_or(0), buffer: text, applied: false },
        };
        to_js(&edit)
    }

    /// Corrected buffer; `previous` may be omitted
    #[wasm_bindgen(js_name = detectAndFix)]
    pub fn js_detect_and_fix(&self, text: JsValue, previous: JsValue) -> String {
        let previous = previous.as_string();
        self.inner.detect_and_fix(&text_arg(&text), previous.as_deref())
    }

    #[wasm_bindgen(js_name = clampCursor)]
    pub fn js_clamp_cursor(&self, text: JsValue, cursor: f64) -> u32 {
        let cursor = cursor_arg(cursor).unwrap_or(0);
        self.inner.clamp_cursor(&text_arg(&text), cursor) as u32
    }

    /// Text with zero-width markers removed
    #[wasm_bindgen(js_name = displayText)]
    pub fn js_display_text(&self, text: JsValue) -> String {
        self.inner.display_text(&text_arg(&text)).into_owned()
    }
}

/// Text argument, anything that is not a string reads as empty
pub(crate) fn text_arg(value: &JsValue) -> String {
    value.as_string().unwrap_or_default()
}

/// Cursor argument, `None` unless a non-negative integer
pub(crate) fn cursor_arg(value: f64) -> Option<usize> {
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0).then_some(value as usize)
}

pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    match serde_wasm_bindgen::to_value(value) {
        Ok(v) => v,
        Err(e) => {
            log::error!("serialization failed: {:?}", e);
            JsValue::NULL
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_arg_rejects_degraded_values() {
        assert_eq!(cursor_arg(3.0), Some(3));
        assert_eq!(cursor_arg(0.0), Some(0));
        assert_eq!(cursor_arg(-1.0), None);
        assert_eq!(cursor_arg(1.5), None);
        assert_eq!(cursor_arg(f64::NAN), None);
        assert_eq!(cursor_arg(f64::INFINITY), None);
    }
}
