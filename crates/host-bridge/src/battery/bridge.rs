//! BatteryBridge: the battery capability on top of [`EventBridge`].
//!
//! Adds the typed per-event listener methods callers use instead of passing a
//! [`BatteryEvent`] around. Every listener method returns the bridge so calls
//! can be chained:
//!
//! ```ignore
//! bridge
//!     .init()?
//!     .add_listener_level_change(level_tx)?
//!     .add_listener_charging_change(charging_tx)?;
//! ```

use std::sync::Arc;

use crate::bridge::{AcquisitionGate, Capability, EventBridge, SnapshotSink};
use crate::error::Result;
use crate::host::traits::HostFactory;
use crate::types::{BridgeOptions, Origin, StatsSnapshot, Trigger};

use super::event::BatteryEvent;
use super::extract::extract as read_snapshot;
use super::manager::BatteryManager;
use super::snapshot::BatterySnapshot;

/// The battery status capability.
pub struct Battery;

impl Capability for Battery {
    type Object = dyn BatteryManager;
    type Kind = BatteryEvent;
    type Snapshot = BatterySnapshot;

    const NAME: &'static str = "battery";

    fn extract(
        object: &Self::Object,
        trigger: Trigger<BatteryEvent>,
        origin: Origin,
    ) -> BatterySnapshot {
        read_snapshot(object, trigger, origin)
    }
}

/// Gate type for battery managers; share one across bridges to reuse a
/// single host acquisition.
pub type BatteryGate = AcquisitionGate<dyn BatteryManager>;

pub struct BatteryBridge {
    inner: EventBridge<Battery>,
}

impl BatteryBridge {
    /// A bridge that acquires its battery manager through `factory`.
    pub fn new(factory: impl HostFactory<dyn BatteryManager> + 'static) -> Self {
        Self::from_gate(Arc::new(AcquisitionGate::new(factory)))
    }

    /// Like [`BatteryBridge::new`], with explicit options.
    pub fn with_options(
        factory: impl HostFactory<dyn BatteryManager> + 'static,
        options: BridgeOptions,
    ) -> Result<Self> {
        Self::from_gate_with_options(Arc::new(AcquisitionGate::new(factory)), options)
    }

    /// A bridge over an existing (possibly shared) gate.
    pub fn from_gate(gate: Arc<BatteryGate>) -> Self {
        Self {
            inner: EventBridge::new(gate),
        }
    }

    pub fn from_gate_with_options(gate: Arc<BatteryGate>, options: BridgeOptions) -> Result<Self> {
        Ok(Self {
            inner: EventBridge::with_options(gate, options)?,
        })
    }

    /// A bridge over a manager the caller already holds.
    pub fn from_manager(manager: Arc<dyn BatteryManager>) -> Self {
        Self::from_gate(Arc::new(AcquisitionGate::resolved(manager)))
    }

    // ========================================================================
    // Lifecycle and query
    // ========================================================================

    pub fn init(&self) -> Result<&Self> {
        self.inner.init()?;
        Ok(self)
    }

    pub fn init_with(&self, done: impl FnOnce(Result<()>) + Send + 'static) {
        self.inner.init_with(done)
    }

    pub fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    /// The battery's current state, tagged `query`.
    pub fn now(&self) -> Result<BatterySnapshot> {
        self.inner.now()
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    pub fn add_listener<S>(&self, event: BatteryEvent, sink: S) -> Result<&Self>
    where
        S: SnapshotSink<BatterySnapshot> + 'static,
    {
        self.inner.add_listener(event, sink)?;
        Ok(self)
    }

    pub fn remove_listener(&self, event: BatteryEvent) -> Result<&Self> {
        self.inner.remove_listener(event)?;
        Ok(self)
    }

    pub fn add_listener_charging_change<S>(&self, sink: S) -> Result<&Self>
    where
        S: SnapshotSink<BatterySnapshot> + 'static,
    {
        self.add_listener(BatteryEvent::ChargingChange, sink)
    }

    pub fn remove_listener_charging_change(&self) -> Result<&Self> {
        self.remove_listener(BatteryEvent::ChargingChange)
    }

    pub fn add_listener_charging_time_change<S>(&self, sink: S) -> Result<&Self>
    where
        S: SnapshotSink<BatterySnapshot> + 'static,
    {
        self.add_listener(BatteryEvent::ChargingTimeChange, sink)
    }

    pub fn remove_listener_charging_time_change(&self) -> Result<&Self> {
        self.remove_listener(BatteryEvent::ChargingTimeChange)
    }

    pub fn add_listener_discharging_time_change<S>(&self, sink: S) -> Result<&Self>
    where
        S: SnapshotSink<BatterySnapshot> + 'static,
    {
        self.add_listener(BatteryEvent::DischargingTimeChange, sink)
    }

    pub fn remove_listener_discharging_time_change(&self) -> Result<&Self> {
        self.remove_listener(BatteryEvent::DischargingTimeChange)
    }

    pub fn add_listener_level_change<S>(&self, sink: S) -> Result<&Self>
    where
        S: SnapshotSink<BatterySnapshot> + 'static,
    {
        self.add_listener(BatteryEvent::LevelChange, sink)
    }

    pub fn remove_listener_level_change(&self) -> Result<&Self> {
        self.remove_listener(BatteryEvent::LevelChange)
    }

    pub fn is_listening(&self, event: BatteryEvent) -> bool {
        self.inner.is_listening(event)
    }

    pub fn listening(&self) -> Vec<BatteryEvent> {
        self.inner.listening()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.inner.stats()
    }

    pub fn options(&self) -> &BridgeOptions {
        self.inner.options()
    }

    pub fn gate(&self) -> &Arc<BatteryGate> {
        self.inner.gate()
    }
}
