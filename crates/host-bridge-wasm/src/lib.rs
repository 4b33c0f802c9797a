//! WASM bindings for host-bridge.
//!
//! Exposes the battery status bridge to JavaScript via wasm-bindgen. The
//! browser's `BatteryManager` sits behind the core `BatteryManager` trait
//! (`js_battery`), and `WasmBattery` (`battery`) is the exported class.

pub mod battery;
pub mod conversions;
pub mod error;
pub mod js_battery;
