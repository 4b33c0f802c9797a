//! Snapshot extraction and field normalization.
//!
//! Extraction always reads the object's current fields. The host mutates the
//! object in place, so a snapshot taken for an event reflects the latest
//! host state, not necessarily the state at the instant the event fired.

use crate::types::{Origin, Trigger};

use super::event::BatteryEvent;
use super::manager::BatteryManager;
use super::snapshot::{BatterySnapshot, UNKNOWN_SECONDS};

/// Canonicalize a remaining-time value: negatives become `-1`.
pub fn normalize_seconds(raw: i64) -> i64 {
    if raw < 0 {
        UNKNOWN_SECONDS
    } else {
        raw
    }
}

/// Convert a host-reported remaining time to whole seconds.
///
/// Negative and non-finite values (hosts report `Infinity` when the time
/// cannot be estimated) become `-1`; fractions are truncated.
pub fn seconds_from_host(raw: f64) -> i64 {
    if !raw.is_finite() || raw < 0.0 {
        return UNKNOWN_SECONDS;
    }
    normalize_seconds(raw as i64)
}

/// Read `object` into a snapshot tagged with `trigger` and `origin`.
pub fn extract<B: BatteryManager + ?Sized>(
    object: &B,
    trigger: Trigger<BatteryEvent>,
    origin: Origin,
) -> BatterySnapshot {
    BatterySnapshot::new(
        trigger,
        origin,
        object.charging(),
        seconds_from_host(object.charging_time()),
        seconds_from_host(object.discharging_time()),
        // Passed through: the host is trusted to stay within [0.0, 1.0].
        object.level(),
    )
}
