//! WasmBattery: the battery bridge class exposed to JavaScript.
//!
//! ```js
//! const battery = new WasmBattery({ acquireTimeoutMs: 2000 });
//! await battery.init();
//! battery.addListenerLevelChange((snap) => console.log(snap.level));
//! ```
//!
//! `init()` never blocks: the main thread is the browser's event loop, so
//! the acquisition is awaited through a Promise with a `setTimeout` deadline.

use std::sync::Arc;

use host_bridge::battery::{BatteryBridge, BatteryEvent, BatterySnapshot};
use host_bridge::bridge::{Delivery, SnapshotSink};
use host_bridge::error::BridgeError;
use parking_lot::Mutex;
use wasm_bindgen::prelude::*;

use crate::conversions::{parse_options, snapshot_to_js, stats_to_js};
use crate::error::{js_error_message, to_js_error, warn, IntoJsResult};
use crate::js_battery::{JsBattery, JsBatteryManager, NavigatorBattery};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "setTimeout")]
    fn set_timeout(handler: &JsValue, timeout_ms: f64) -> JsValue;
}

// ============================================================================
// WasmBattery
// ============================================================================

#[wasm_bindgen]
pub struct WasmBattery {
    bridge: BatteryBridge,
}

#[wasm_bindgen]
impl WasmBattery {
    /// Create an uninitialized bridge over `navigator.getBattery()`.
    ///
    /// `options` is `{ acquireTimeoutMs?: number }`, or omitted.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<WasmBattery, JsValue> {
        let options = parse_options(&options)?;
        let bridge = BatteryBridge::with_options(NavigatorBattery, options).into_js()?;
        Ok(WasmBattery { bridge })
    }

    /// Wrap a battery manager the caller already obtained. Still requires
    /// `init()`, which then settles immediately.
    #[wasm_bindgen(js_name = "fromManager")]
    pub fn from_manager(manager: JsBatteryManager) -> WasmBattery {
        WasmBattery {
            bridge: BatteryBridge::from_manager(Arc::new(JsBattery::new(manager))),
        }
    }

    /// Acquire the host battery manager. Resolves once the bridge is ready;
    /// rejects on host denial or after `acquireTimeoutMs`.
    pub fn init(&self) -> js_sys::Promise {
        let timeout = self.bridge.options().acquire_timeout();
        js_sys::Promise::new(&mut |resolve, reject| {
            let settle = Arc::new(Mutex::new(Some(PromiseHandles { resolve, reject })));

            {
                let settle = Arc::clone(&settle);
                self.bridge.init_with(move |result| {
                    let handles = settle.lock().take();
                    if let Some(handles) = handles {
                        match result {
                            Ok(()) => handles.resolve(),
                            Err(e) => handles.reject(to_js_error(e)),
                        }
                    }
                });
            }

            if settle.lock().is_some() {
                let on_timeout = Closure::once_into_js(move || {
                    let handles = settle.lock().take();
                    if let Some(handles) = handles {
                        handles.reject(to_js_error(BridgeError::AcquisitionTimeout { timeout }));
                    }
                });
                set_timeout(&on_timeout, timeout.as_millis() as f64);
            }
        })
    }

    #[wasm_bindgen(getter, js_name = "isReady")]
    pub fn is_ready(&self) -> bool {
        self.bridge.is_ready()
    }

    /// The battery's current state, with `eventKind: "query"`.
    pub fn now(&self) -> Result<JsValue, JsValue> {
        let snapshot = self.bridge.now().into_js()?;
        snapshot_to_js(&snapshot)
    }

    /// Delivery counters: `{ delivered, malformed, overflow, disconnected, detached }`.
    pub fn stats(&self) -> Result<JsValue, JsValue> {
        stats_to_js(&self.bridge.stats())
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    #[wasm_bindgen(js_name = "addListenerChargingChange")]
    pub fn add_listener_charging_change(&self, callback: js_sys::Function) -> Result<(), JsValue> {
        self.add(BatteryEvent::ChargingChange, callback)
    }

    #[wasm_bindgen(js_name = "removeListenerChargingChange")]
    pub fn remove_listener_charging_change(&self) -> Result<(), JsValue> {
        self.remove(BatteryEvent::ChargingChange)
    }

    #[wasm_bindgen(js_name = "addListenerChargingTimeChange")]
    pub fn add_listener_charging_time_change(
        &self,
        callback: js_sys::Function,
    ) -> Result<(), JsValue> {
        self.add(BatteryEvent::ChargingTimeChange, callback)
    }

    #[wasm_bindgen(js_name = "removeListenerChargingTimeChange")]
    pub fn remove_listener_charging_time_change(&self) -> Result<(), JsValue> {
        self.remove(BatteryEvent::ChargingTimeChange)
    }

    #[wasm_bindgen(js_name = "addListenerDischargingTimeChange")]
    pub fn add_listener_discharging_time_change(
        &self,
        callback: js_sys::Function,
    ) -> Result<(), JsValue> {
        self.add(BatteryEvent::DischargingTimeChange, callback)
    }

    #[wasm_bindgen(js_name = "removeListenerDischargingTimeChange")]
    pub fn remove_listener_discharging_time_change(&self) -> Result<(), JsValue> {
        self.remove(BatteryEvent::DischargingTimeChange)
    }

    #[wasm_bindgen(js_name = "addListenerLevelChange")]
    pub fn add_listener_level_change(&self, callback: js_sys::Function) -> Result<(), JsValue> {
        self.add(BatteryEvent::LevelChange, callback)
    }

    #[wasm_bindgen(js_name = "removeListenerLevelChange")]
    pub fn remove_listener_level_change(&self) -> Result<(), JsValue> {
        self.remove(BatteryEvent::LevelChange)
    }
}

impl WasmBattery {
    fn add(&self, event: BatteryEvent, callback: js_sys::Function) -> Result<(), JsValue> {
        self.bridge
            .add_listener(event, JsCallbackSink(callback))
            .into_js()?;
        Ok(())
    }

    fn remove(&self, event: BatteryEvent) -> Result<(), JsValue> {
        self.bridge.remove_listener(event).into_js()?;
        Ok(())
    }
}

// ============================================================================
// JS glue
// ============================================================================

/// The resolve/reject pair of a pending `init()` promise.
struct PromiseHandles {
    resolve: js_sys::Function,
    reject: js_sys::Function,
}

// SAFETY: WASM is single-threaded.
unsafe impl Send for PromiseHandles {}
unsafe impl Sync for PromiseHandles {}

impl PromiseHandles {
    fn resolve(self) {
        let _ = self.resolve.call0(&JsValue::UNDEFINED);
    }

    fn reject(self, error: JsValue) {
        let _ = self.reject.call1(&JsValue::UNDEFINED, &error);
    }
}

/// A JS function receiving each snapshot as a plain object.
///
/// JS callbacks run synchronously and cannot apply back-pressure, so every
/// snapshot handed over counts as delivered; a throwing callback is reported
/// and ignored. A snapshot that cannot be converted never reaches the callback
/// and is counted as a closed delivery.
struct JsCallbackSink(js_sys::Function);

// SAFETY: WASM is single-threaded.
unsafe impl Send for JsCallbackSink {}
unsafe impl Sync for JsCallbackSink {}

impl SnapshotSink<BatterySnapshot> for JsCallbackSink {
    fn deliver(&self, snapshot: BatterySnapshot) -> Delivery {
        let payload = match snapshot_to_js(&snapshot) {
            Ok(payload) => payload,
            Err(e) => {
                warn(&format!(
                    "failed to convert battery snapshot: {}",
                    js_error_message(&e)
                ));
                return Delivery::Closed;
            }
        };
        if let Err(e) = self.0.call1(&JsValue::NULL, &payload) {
            warn(&format!(
                "battery {} listener threw: {}",
                snapshot.event_kind(),
                js_error_message(&e)
            ));
        }
        Delivery::Delivered
    }
}
