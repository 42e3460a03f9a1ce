//! Browser console logging
//!
//! Thin wrappers over `web_sys::console`. Imported JS functions cannot be
//! called on native targets, so outside wasm32 the calls compile to nothing
//! and unit tests stay runnable with plain `cargo test`.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

pub fn log(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&JsValue::from_str(msg));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = msg;
}

pub fn warn(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&JsValue::from_str(msg));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = msg;
}

pub fn error(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&JsValue::from_str(msg));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = msg;
}
