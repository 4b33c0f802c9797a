//! host-bridge: expose event-emitting host objects as typed Rust values.
//!
//! A host environment (a browser, or anything implementing
//! [`host::EventTarget`]) owns an object that changes on its own and fires
//! named events. This crate:
//!   - acquires the object once, with a deadline ([`bridge::AcquisitionGate`]),
//!   - reads immutable, normalized snapshots off it on demand,
//!   - forwards each host event to a channel as a snapshot, at most one
//!     registration per event kind ([`bridge::EventBridge`]).
//!
//! The battery status object is the provided capability; see
//! [`battery::BatteryBridge`].

pub mod battery;
pub mod bridge;
pub mod error;
pub mod host;
pub mod types;

pub use battery::{BatteryBridge, BatteryEvent, BatteryManager, BatterySnapshot, MemoryBattery};
pub use bridge::{AcquisitionGate, Capability, EventBridge, EventKind, SnapshotSink};
pub use error::{BridgeError, Result};
pub use types::{BridgeOptions, Origin, StatsSnapshot, Trigger};
