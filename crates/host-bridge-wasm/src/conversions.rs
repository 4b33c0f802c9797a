//! Rust ↔ JsValue helpers for snapshots, stats and options.

use host_bridge::battery::BatterySnapshot;
use host_bridge::types::{BridgeOptions, StatsSnapshot};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Serialize to a plain JS object. Integers come out as numbers, never BigInt.
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// `{ eventKind, charging, chargingTimeSeconds, dischargingTimeSeconds, level }`
pub fn snapshot_to_js(snapshot: &BatterySnapshot) -> Result<JsValue, JsValue> {
    to_js(snapshot)
}

pub fn stats_to_js(stats: &StatsSnapshot) -> Result<JsValue, JsValue> {
    to_js(stats)
}

/// Parse constructor options. `undefined` and `null` mean defaults.
pub fn parse_options(js: &JsValue) -> Result<BridgeOptions, JsValue> {
    if js.is_null() || js.is_undefined() {
        return Ok(BridgeOptions::default());
    }
    serde_wasm_bindgen::from_value(js.clone())
        .map_err(|e| JsValue::from_str(&format!("Invalid options: {e}")))
}
