//! LinkifyCortex - WASM entry point for the content script
//!
//! # Usage (JavaScript)
//! ```javascript
//! import init, { LinkifyCortex } from 'b64link';
//!
//! await init();
//! const cortex = new LinkifyCortex({ maxTokenLength: 8192 });
//!
//! chrome.runtime.onMessage.addListener((msg, _sender, sendResponse) => {
//!   const reply = cortex.handleMessage(msg);
//!   if (reply !== undefined) sendResponse(reply);
//! });
//! ```

use wasm_bindgen::prelude::*;

use super::dispatch::Dispatcher;
use super::messages::{Request, Response};
use crate::config::ScanConfig;
use crate::console;
use crate::dom::web::WebDocument;

fn to_js(response: &Response) -> JsValue {
    // Plain objects, not Maps, so `resp.error` works on the JS side
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    match serde::Serialize::serialize(response, &serializer) {
        Ok(v) => v,
        Err(e) => {
            console::error(&format!("[LinkifyCortex] Serialization failed: {:?}", e));
            JsValue::NULL
        }
    }
}

#[wasm_bindgen]
pub struct LinkifyCortex {
    dispatcher: Dispatcher,
}

#[wasm_bindgen]
impl LinkifyCortex {
    /// Create a cortex with an optional `ScanConfig` object
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<LinkifyCortex, JsValue> {
        let config: ScanConfig = if config.is_null() || config.is_undefined() {
            ScanConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
        };
        Ok(Self {
            dispatcher: Dispatcher::new(config),
        })
    }

    /// Handle a runtime message. Returns `undefined` for message types this
    /// cortex does not own so the listener can stay silent.
    #[wasm_bindgen(js_name = handleMessage)]
    pub fn handle_message(&self, message: JsValue) -> JsValue {
        let raw: serde_json::Value = match serde_wasm_bindgen::from_value(message) {
            Ok(v) => v,
            Err(_) => return JsValue::UNDEFINED,
        };
        match Request::parse(&raw) {
            Ok(Some(request)) => self.run(&request),
            Ok(None) => JsValue::UNDEFINED,
            Err(e) => {
                console::warn(&format!("[LinkifyCortex] malformed request: {}", e));
                to_js(&Response::failed(&e))
            }
        }
    }

    /// Decode the current selection in place
    #[wasm_bindgen(js_name = decodeSelection)]
    pub fn decode_selection(&self, text: &str) -> JsValue {
        self.run(&Request::Decode {
            text: Some(text.to_string()),
        })
    }

    /// Convert every prefixed token on the page
    #[wasm_bindgen(js_name = scanPage)]
    pub fn scan_page(&self, prefix: Option<String>) -> JsValue {
        self.run(&Request::ScanAll { prefix })
    }

    /// Prefix used when a scan request names none
    #[wasm_bindgen(js_name = defaultPrefix)]
    pub fn default_prefix(&self) -> String {
        self.dispatcher.config().prefix.clone()
    }
}

impl LinkifyCortex {
    fn run(&self, request: &Request) -> JsValue {
        let mut document = match WebDocument::current() {
            Ok(d) => d,
            Err(e) => return to_js(&Response::failed(&e)),
        };

        let t0 = js_sys::Date::now();
        let response = self.dispatcher.handle(&mut document, request);
        let elapsed = js_sys::Date::now() - t0;
        let out = to_js(&response);

        if let Response::Scanned { stats, .. } = &response {
            console::log(&format!(
                "[LinkifyCortex] scan took {:.1}ms ({} nodes)",
                elapsed, stats.nodes_scanned
            ));
            if let Err(e) = js_sys::Reflect::set(&out, &JsValue::from_str("elapsedMs"), &JsValue::from_f64(elapsed)) {
                console::warn(&format!("[LinkifyCortex] could not attach timing: {:?}", e));
            }
        }
        out
    }
}
