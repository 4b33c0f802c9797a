//! Battery status capability.
//!
//! # Modules
//!
//! - [`event`]: [`BatteryEvent`], the four host events.
//! - [`manager`]: [`BatteryManager`] host surface and [`MemoryBattery`].
//! - [`snapshot`]: [`BatterySnapshot`] and the unknown-time sentinel.
//! - [`extract`]: normalization of host values into a snapshot.
//! - [`bridge`]: [`Battery`] capability and [`BatteryBridge`].

pub mod bridge;
pub mod event;
pub mod extract;
pub mod manager;
pub mod snapshot;

pub use bridge::{Battery, BatteryBridge, BatteryGate};
pub use event::BatteryEvent;
pub use extract::{extract, normalize_seconds, seconds_from_host};
pub use manager::{BatteryFields, BatteryManager, MemoryBattery};
pub use snapshot::{BatterySnapshot, UNKNOWN_SECONDS};
