//! B64Link: Base64 Detector + Linkify Engine
//!
//! A Rust/WASM implementation of the content-script core of the Base64
//! decode & linkify browser extension.
//!
//! # Architecture
//!
//! ## Decoding
//! - `decode/codec.rs` - Lenient Base64 decoder (URL-safe, missing padding, stray punctuation)
//! - `decode/url.rs` - URL classification of decoded text
//!
//! ## Document
//! - `dom/mod.rs` - `DocumentHost` trait the engine mutates through
//! - `dom/arena.rs` - In-memory document
//! - `dom/web.rs` - Live browser DOM via web-sys (wasm32)
//!
//! ## Linkify Engine
//! - `linkify/filters.rs` - Token boundary and container filters
//! - `linkify/selection.rs` - Single-selection replacer (context menu)
//! - `linkify/bulk.rs` - BulkScanner: whole-page conversion (popup button)
//! - `linkify/messages.rs` - Request/response contracts, delivery outcomes
//! - `linkify/host.rs` - Settings, menu and notification seams
//! - `linkify/dispatch.rs` - Request routing
//! - `linkify/cortex.rs` - LinkifyCortex WASM facade
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { LinkifyCortex } from 'b64link';
//!
//! await init();
//! const cortex = new LinkifyCortex();
//!
//! // Context menu: replace the selection
//! cortex.handleMessage({ type: 'decode-request', text: 'aHR0cHM6Ly9leGFtcGxlLmNvbQ==' });
//! // -> { ok: true, kind: 'url', value: 'https://example.com' }
//!
//! // Popup: convert the whole page
//! cortex.handleMessage({ type: 'scan-all-request', prefix: 'aHR' });
//! // -> { ok: true, nodesScanned, matchesFound, decodedOk, linksCreated, textReplaced, skipped, rejected, elapsedMs }
//! ```

pub mod config;
pub mod console;
pub mod decode;
pub mod dom;
pub mod error;
pub mod linkify;

pub use config::*;
pub use decode::*;
pub use error::*;
pub use linkify::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("b64link v{}", env!("CARGO_PKG_VERSION"))
}

/// Decode a Base64 string without touching the page
#[wasm_bindgen(js_name = decodeBase64)]
pub fn decode_base64(text: &str) -> Result<String, JsValue> {
    decode::decode(text).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Classify decoded text: `{ href, display }` or `null`
#[wasm_bindgen(js_name = classifyUrl)]
pub fn classify_url(text: &str) -> JsValue {
    match decode::classify(text) {
        Some(c) => serde_wasm_bindgen::to_value(&c).unwrap_or(JsValue::NULL),
        None => JsValue::NULL,
    }
}
