//! BatteryManager: typed view of the host's battery status object, and an
//! in-memory implementation.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::host::memory::MemoryEventTarget;
use crate::host::traits::{EventTarget, HostCallback};
use crate::types::Origin;

use super::event::BatteryEvent;

/// One typed getter per host field.
///
/// Getters return the host's raw values; normalization happens during
/// extraction. A field the host leaves undefined reads as `false` / `0.0`.
pub trait BatteryManager: EventTarget {
    fn charging(&self) -> bool;
    /// Seconds until full. Hosts may report negatives or `Infinity` for unknown.
    fn charging_time(&self) -> f64;
    /// Seconds until empty. Hosts may report negatives or `Infinity` for unknown.
    fn discharging_time(&self) -> f64;
    fn level(&self) -> f64;
}

// ============================================================================
// MemoryBattery
// ============================================================================

/// Raw field values. `None` models a field the host left undefined.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatteryFields {
    pub charging: Option<bool>,
    pub charging_time: Option<f64>,
    pub discharging_time: Option<f64>,
    pub level: Option<f64>,
}

/// An in-memory battery whose fields are set by hand and whose events are
/// fired with [`MemoryBattery::fire`].
pub struct MemoryBattery {
    target: MemoryEventTarget,
    fields: RwLock<BatteryFields>,
}

impl MemoryBattery {
    /// A battery with every field undefined.
    pub fn new() -> Self {
        Self::with_fields(BatteryFields::default())
    }

    pub fn with_fields(fields: BatteryFields) -> Self {
        Self {
            target: MemoryEventTarget::new(),
            fields: RwLock::new(fields),
        }
    }

    /// A battery with all four fields set.
    pub fn with_state(
        charging: bool,
        charging_time: f64,
        discharging_time: f64,
        level: f64,
    ) -> Self {
        Self::with_fields(BatteryFields {
            charging: Some(charging),
            charging_time: Some(charging_time),
            discharging_time: Some(discharging_time),
            level: Some(level),
        })
    }

    /// Shared handle typed as the trait object the bridge expects.
    pub fn into_manager(self: Arc<Self>) -> Arc<dyn BatteryManager> {
        self
    }

    pub fn origin(&self) -> Origin {
        self.target.origin()
    }

    pub fn fields(&self) -> BatteryFields {
        *self.fields.read()
    }

    pub fn set_fields(&self, fields: BatteryFields) {
        *self.fields.write() = fields;
    }

    pub fn set_charging(&self, charging: bool) {
        self.fields.write().charging = Some(charging);
    }

    pub fn set_charging_time(&self, seconds: f64) {
        self.fields.write().charging_time = Some(seconds);
    }

    pub fn set_discharging_time(&self, seconds: f64) {
        self.fields.write().discharging_time = Some(seconds);
    }

    pub fn set_level(&self, level: f64) {
        self.fields.write().level = Some(level);
    }

    /// Fire `event` with an event argument. Returns the callbacks invoked.
    pub fn fire(&self, event: BatteryEvent) -> usize {
        self.target.dispatch(event.as_str())
    }

    /// Fire `event` with no arguments, as a host might before the object is
    /// readable.
    pub fn fire_without_args(&self, event: BatteryEvent) -> usize {
        self.target.dispatch_without_args(event.as_str())
    }

    /// Host-side registrations for `event`.
    pub fn listener_count(&self, event: BatteryEvent) -> usize {
        self.target.listener_count(event.as_str())
    }

    pub fn total_listeners(&self) -> usize {
        self.target.total_listeners()
    }
}

impl Default for MemoryBattery {
    fn default() -> Self {
        Self::new()
    }
}

impl EventTarget for MemoryBattery {
    fn add_event_listener(&self, event: &str, callback: &HostCallback) {
        self.target.add_event_listener(event, callback)
    }

    fn remove_event_listener(&self, event: &str, callback: &HostCallback) {
        self.target.remove_event_listener(event, callback)
    }
}

impl BatteryManager for MemoryBattery {
    fn charging(&self) -> bool {
        self.fields.read().charging.unwrap_or(false)
    }

    fn charging_time(&self) -> f64 {
        self.fields.read().charging_time.unwrap_or(0.0)
    }

    fn discharging_time(&self) -> f64 {
        self.fields.read().discharging_time.unwrap_or(0.0)
    }

    fn level(&self) -> f64 {
        self.fields.read().level.unwrap_or(0.0)
    }
}
