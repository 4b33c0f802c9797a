//! BatteryEvent: the events a `BatteryManager` fires.

use std::fmt;

use crate::bridge::EventKind;

/// Host events of the Battery Status API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatteryEvent {
    /// The `charging` property changed.
    ChargingChange,
    /// The `chargingTime` property changed.
    ChargingTimeChange,
    /// The `dischargingTime` property changed.
    DischargingTimeChange,
    /// The `level` property changed.
    LevelChange,
}

impl BatteryEvent {
    pub const ALL: [BatteryEvent; 4] = [
        BatteryEvent::ChargingChange,
        BatteryEvent::ChargingTimeChange,
        BatteryEvent::DischargingTimeChange,
        BatteryEvent::LevelChange,
    ];

    /// Host event name, as passed to `addEventListener`.
    pub fn as_str(self) -> &'static str {
        match self {
            BatteryEvent::ChargingChange => "chargingchange",
            BatteryEvent::ChargingTimeChange => "chargingtimechange",
            BatteryEvent::DischargingTimeChange => "dischargingtimechange",
            BatteryEvent::LevelChange => "levelchange",
        }
    }
}

impl EventKind for BatteryEvent {
    fn tag(self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for BatteryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
