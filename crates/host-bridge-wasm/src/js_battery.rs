//! JsBattery: a `BatteryManager` implementation that delegates to the
//! browser's `BatteryManager` object, plus the `navigator.getBattery()`
//! factory that produces it.
//!
//! Getters cross the WASM boundary on every read; the browser mutates the
//! object in place, so nothing is cached on the Rust side.

use std::collections::HashMap;
use std::sync::Arc;

use host_bridge::battery::BatteryManager;
use host_bridge::bridge::Resolver;
use host_bridge::host::{CallbackId, EventTarget, HostCallback, HostFactory, Invocation};
use host_bridge::types::Origin;
use parking_lot::Mutex;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::error::{js_error_message, warn};

// ============================================================================
// JS extern types
// ============================================================================

#[wasm_bindgen]
extern "C" {
    /// The browser's battery status object.
    pub type JsBatteryManager;

    #[wasm_bindgen(method, getter)]
    fn charging(this: &JsBatteryManager) -> JsValue;

    #[wasm_bindgen(method, getter, js_name = "chargingTime")]
    fn charging_time(this: &JsBatteryManager) -> JsValue;

    #[wasm_bindgen(method, getter, js_name = "dischargingTime")]
    fn discharging_time(this: &JsBatteryManager) -> JsValue;

    #[wasm_bindgen(method, getter)]
    fn level(this: &JsBatteryManager) -> JsValue;

    #[wasm_bindgen(method, js_name = "addEventListener")]
    fn add_event_listener(this: &JsBatteryManager, event: &str, listener: &js_sys::Function);

    #[wasm_bindgen(method, js_name = "removeEventListener")]
    fn remove_event_listener(this: &JsBatteryManager, event: &str, listener: &js_sys::Function);

    /// `navigator.getBattery()`. Throws where the API is missing.
    #[wasm_bindgen(catch, js_namespace = navigator, js_name = "getBattery")]
    fn get_battery() -> Result<js_sys::Promise, JsValue>;
}

// ============================================================================
// JsBattery wrapper
// ============================================================================

type Listener = Closure<dyn Fn(JsValue)>;

/// Wraps a `JsBatteryManager` and implements `BatteryManager`.
///
/// Each registered `HostCallback` is backed by one JS closure, kept alive
/// here until the matching `remove_event_listener`.
pub struct JsBattery {
    inner: JsBatteryManager,
    origin: Origin,
    listeners: Mutex<HashMap<(String, CallbackId), Listener>>,
}

// SAFETY: WASM is single-threaded. JsValue and Closure are !Send/!Sync but in
// WASM there is only one thread, so these bounds are trivially satisfied.
unsafe impl Send for JsBattery {}
unsafe impl Sync for JsBattery {}

impl JsBattery {
    pub fn new(manager: JsBatteryManager) -> Self {
        Self {
            inner: manager,
            origin: Origin::next(),
            listeners: Mutex::new(HashMap::new()),
        }
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }
}

impl EventTarget for JsBattery {
    fn add_event_listener(&self, event: &str, callback: &HostCallback) {
        let key = (event.to_string(), callback.id());
        let mut listeners = self.listeners.lock();
        if listeners.contains_key(&key) {
            return;
        }
        let origin = self.origin;
        let callback = callback.clone();
        // Browsers always pass the Event; an undefined first argument means
        // the callback was invoked with nothing.
        let listener: Listener = Closure::new(move |event: JsValue| {
            let arg_count = usize::from(!event.is_undefined());
            callback.invoke(Invocation::new(origin, arg_count));
        });
        self.inner
            .add_event_listener(event, listener.as_ref().unchecked_ref());
        listeners.insert(key, listener);
    }

    fn remove_event_listener(&self, event: &str, callback: &HostCallback) {
        let key = (event.to_string(), callback.id());
        if let Some(listener) = self.listeners.lock().remove(&key) {
            self.inner
                .remove_event_listener(event, listener.as_ref().unchecked_ref());
        }
    }
}

impl BatteryManager for JsBattery {
    fn charging(&self) -> bool {
        self.inner.charging().as_bool().unwrap_or(false)
    }

    fn charging_time(&self) -> f64 {
        self.inner.charging_time().as_f64().unwrap_or(0.0)
    }

    fn discharging_time(&self) -> f64 {
        self.inner.discharging_time().as_f64().unwrap_or(0.0)
    }

    fn level(&self) -> f64 {
        self.inner.level().as_f64().unwrap_or(0.0)
    }
}

// ============================================================================
// NavigatorBattery factory
// ============================================================================

/// Acquires the battery manager through `navigator.getBattery()`.
pub struct NavigatorBattery;

impl HostFactory<dyn BatteryManager> for NavigatorBattery {
    fn request(&self, resolver: Resolver<dyn BatteryManager>) {
        let promise = match get_battery() {
            Ok(promise) => promise,
            Err(e) => {
                resolver.reject(js_error_message(&e));
                return;
            }
        };

        // Exactly one of the two continuations runs; whichever does takes
        // the resolver.
        let slot = Arc::new(Mutex::new(Some(resolver)));
        let on_ok = {
            let slot = Arc::clone(&slot);
            Closure::once_into_js(move |manager: JsValue| {
                let resolver = slot.lock().take();
                if let Some(resolver) = resolver {
                    let battery: Arc<dyn BatteryManager> =
                        Arc::new(JsBattery::new(manager.unchecked_into()));
                    resolver.resolve(battery);
                }
            })
        };
        let on_err = {
            let slot = Arc::clone(&slot);
            Closure::once_into_js(move |e: JsValue| {
                let resolver = slot.lock().take();
                if let Some(resolver) = resolver {
                    resolver.reject(js_error_message(&e));
                }
            })
        };

        let then = js_sys::Reflect::get(&promise, &JsValue::from_str("then"))
            .ok()
            .and_then(|f| f.dyn_into::<js_sys::Function>().ok());
        let attached = match then {
            Some(then) => then.call2(&promise, &on_ok, &on_err).is_ok(),
            None => false,
        };
        if !attached {
            warn("getBattery() did not return a thenable");
            let resolver = slot.lock().take();
            if let Some(resolver) = resolver {
                resolver.reject("getBattery() did not return a thenable");
            }
        }
    }
}
