//! BatterySnapshot: an immutable, normalized read of a `BatteryManager`.

use serde::Serialize;

use crate::types::{Origin, Trigger};

use super::event::BatteryEvent;

/// Sentinel for "remaining time unknown".
pub const UNKNOWN_SECONDS: i64 = -1;

/// The battery's state at the moment a listener fired or `now()` was called.
///
/// Fields are private: snapshots are only produced by extraction, so the
/// `-1` sentinel is always canonical. Serializes to the channel payload:
/// `{ eventKind, charging, chargingTimeSeconds, dischargingTimeSeconds, level }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatterySnapshot {
    event_kind: Trigger<BatteryEvent>,
    #[serde(skip)]
    origin: Origin,
    charging: bool,
    charging_time_seconds: i64,
    discharging_time_seconds: i64,
    level: f64,
}

impl BatterySnapshot {
    pub(crate) fn new(
        event_kind: Trigger<BatteryEvent>,
        origin: Origin,
        charging: bool,
        charging_time_seconds: i64,
        discharging_time_seconds: i64,
        level: f64,
    ) -> Self {
        Self {
            event_kind,
            origin,
            charging,
            charging_time_seconds,
            discharging_time_seconds,
            level,
        }
    }

    /// The event that produced this snapshot, or `Trigger::Query` for `now()`.
    pub fn event_kind(&self) -> Trigger<BatteryEvent> {
        self.event_kind
    }

    /// The host object that fired; `Origin::NONE` for queries.
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// The battery is currently being charged.
    pub fn charging(&self) -> bool {
        self.charging
    }

    /// Seconds until fully charged (`0` when already full), or `-1` if unknown.
    pub fn charging_time_seconds(&self) -> i64 {
        self.charging_time_seconds
    }

    /// Seconds until the battery is empty and the system suspends, or `-1`
    /// if unknown.
    pub fn discharging_time_seconds(&self) -> i64 {
        self.discharging_time_seconds
    }

    /// Charge level, nominally in `[0.0, 1.0]`. Not clamped.
    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn charging_time(&self) -> Option<u64> {
        known_seconds(self.charging_time_seconds)
    }

    pub fn discharging_time(&self) -> Option<u64> {
        known_seconds(self.discharging_time_seconds)
    }

    /// Equal normalized readings, ignoring which event (or query) and which
    /// host object produced them.
    pub fn same_reading(&self, other: &BatterySnapshot) -> bool {
        self.charging == other.charging
            && self.charging_time_seconds == other.charging_time_seconds
            && self.discharging_time_seconds == other.discharging_time_seconds
            && self.level == other.level
    }
}

fn known_seconds(seconds: i64) -> Option<u64> {
    if seconds < 0 {
        None
    } else {
        Some(seconds as u64)
    }
}
