use wasm_bindgen::prelude::*;

use crate::mention::config::MentionConfig;
use crate::mention::scanner::MentionScanner;
use crate::mention::wasm::{cursor_arg, text_arg, to_js};
use crate::overlay::directory::{StaticDirectory, UserData};
use crate::overlay::layout::{MeasureError, OverlayLayoutEngine, SegmentKind, TextMeasurer};

/// Measurement through a JS callback `(text, kind) => width`
pub struct JsTextMeasurer {
    measure: js_sys::Function,
    line_height: f64,
}

impl TextMeasurer for JsTextMeasurer {
    fn measure(&self, text: &str, kind: SegmentKind) -> Result<f64, MeasureError> {
        let width = self
            .measure
            .call2(&JsValue::NULL, &JsValue::from_str(text), &JsValue::from_str(kind.as_str()))
            .map_err(|e| MeasureError::Host(format!("{:?}", e)))?;
        width
            .as_f64()
            .ok_or_else(|| MeasureError::Host(format!("measure returned {:?}", width)))
    }

    fn line_height(&self) -> f64 {
        self.line_height
    }
}

/// Overlay layout exposed to the host web client
#[wasm_bindgen]
pub struct OverlayEngine {
    inner: OverlayLayoutEngine<JsTextMeasurer, StaticDirectory>,
}

#[wasm_bindgen]
impl OverlayEngine {
    /// # Arguments
    /// * `measure` - `(text: string, kind: "text" | "mention") => number`
    /// * `line_height` - pixel distance between lines
    /// * `config` - optional mention config object
    #[wasm_bindgen(constructor)]
    pub fn new(measure: js_sys::Function, line_height: f64, config: JsValue) -> Result<OverlayEngine, JsValue> {
        let config: MentionConfig = if config.is_null() || config.is_undefined() {
            MentionConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
        };
        config.validate().map_err(|e| JsValue::from_str(&e.to_string()))?;

        let measurer = JsTextMeasurer { measure, line_height };
        Ok(OverlayEngine {
            inner: OverlayLayoutEngine::new(MentionScanner::new(config.marker), measurer, StaticDirectory::new()),
        })
    }

    /// Replace the user directory with `[{ username, display_name }]`
    #[wasm_bindgen(js_name = hydrateUsers)]
    pub fn hydrate_users(&mut self, users: JsValue) -> Result<(), JsValue> {
        let users: Vec<UserData> = serde_wasm_bindgen::from_value(users)
            .map_err(|e| JsValue::from_str(&format!("Invalid users: {}", e)))?;
        self.inner.directory_mut().hydrate(users);
        Ok(())
    }

    /// `{ segments, caret?, degraded }`
    #[wasm_bindgen(js_name = layout)]
    pub fn js_layout(&self, text: JsValue, cursor: Option<f64>) -> JsValue {
        let cursor = cursor.and_then(cursor_arg);
        to_js(&self.inner.layout(&text_arg(&text), cursor))
    }

    /// Segments only, no measurement
    #[wasm_bindgen(js_name = segments)]
    pub fn js_segments(&self, text: JsValue) -> JsValue {
        to_js(&self.inner.segments(&text_arg(&text)))
    }
}
