//! MentionCore: @mention editing engine for the chat composer
//!
//! A Rust/WASM implementation of the composer's mention handling.
//!
//! # Architecture
//!
//! ## Mention Components
//! - `scanner.rs` - MentionScanner: `@username` span detection (character-class scan)
//! - `policy.rs` - CursorMentionPolicy: atomic cursor movement and deletion
//! - `guard.rs` - ExpansionGuard: keeps committed mentions from absorbing typed text
//! - `editor.rs` - MentionEditor: key routing + post-click cursor clamp
//! - `config.rs` - MentionConfig: marker, heuristic limits, guard switches
//!
//! ## Overlay Components
//! - `layout.rs` - OverlayLayoutEngine: highlighted segments + synthetic caret
//! - `directory.rs` - UserDirectory: username -> display name
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { MentionEngine, OverlayEngine } from 'mentioncore';
//!
//! await init();
//!
//! const engine = new MentionEngine({ trailing_space_guard: true });
//!
//! textarea.addEventListener('keydown', (e) => {
//!   const result = engine.handleKey(textarea.value, textarea.selectionStart,
//!     { key: e.key, ctrl: e.ctrlKey, meta: e.metaKey });
//!   if (result.intercepted) {
//!     e.preventDefault();
//!     if (result.new_buffer !== undefined) textarea.value = result.new_buffer;
//!     if (result.new_cursor !== undefined) textarea.setSelectionRange(result.new_cursor, result.new_cursor);
//!   }
//! });
//!
//! // Highlight layer, measured with the textarea's own font
//! const overlay = new OverlayEngine((text, kind) => ctx.measureText(text).width, 20);
//! overlay.hydrateUsers([{ username: 'bob', display_name: 'Bob Builder' }]);
//! const { segments, caret } = overlay.layout(textarea.value, textarea.selectionStart);
//! ```

pub mod logging;
pub mod mention;
pub mod overlay;

// Public exports - Mention
pub use mention::*;

// Public exports - Overlay
pub use overlay::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    logging::init(log::LevelFilter::Warn);
}

/// Change the console log level (`"debug"`, `"info"`, `"warn"`, ...)
#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) {
    logging::init(logging::parse_level(level));
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("mentioncore v{}", env!("CARGO_PKG_VERSION"))
}
