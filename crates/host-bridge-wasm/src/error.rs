//! Error conversion: BridgeError → JsValue for wasm-bindgen boundaries.

use host_bridge::error::BridgeError;
use wasm_bindgen::JsValue;

/// Convert a `BridgeError` into a JS `Error` carrying the Rust display message.
pub fn to_js_error(e: BridgeError) -> JsValue {
    let msg = e.to_string();
    js_sys::Error::new(&msg).into()
}

/// Convert any `BridgeError` result into a `Result<T, JsValue>`.
pub trait IntoJsResult<T> {
    fn into_js(self) -> Result<T, JsValue>;
}

impl<T> IntoJsResult<T> for Result<T, BridgeError> {
    fn into_js(self) -> Result<T, JsValue> {
        self.map_err(to_js_error)
    }
}

/// Best-effort message from a thrown or rejected JS value.
pub fn js_error_message(e: &JsValue) -> String {
    use wasm_bindgen::JsCast;

    if let Some(s) = e.as_string() {
        s
    } else if let Some(err) = e.dyn_ref::<js_sys::Error>() {
        err.message().into()
    } else {
        format!("{e:?}")
    }
}

/// Report a failure that has no caller to return to.
pub fn warn(msg: &str) {
    web_sys::console::warn_1(&JsValue::from_str(msg));
}
