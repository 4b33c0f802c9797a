//! Tests for `EventBridge<C>` over a minimal capability.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use host_bridge::bridge::{
    AcquisitionGate, Capability, Delivery, EventBridge, EventKind, SnapshotSink,
};
use host_bridge::host::{EventTarget, HostCallback, MemoryEventTarget, MemoryFactory};
use host_bridge::{BridgeError, BridgeOptions, Origin, Trigger};
use tokio::sync::mpsc;

// ============================================================================
// Thermometer capability
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ThermoEvent {
    Change,
}

impl EventKind for ThermoEvent {
    fn tag(self) -> &'static str {
        "change"
    }
}

struct Thermometer {
    target: MemoryEventTarget,
    celsius: AtomicI64,
}

impl Thermometer {
    fn new(celsius: i64) -> Arc<Self> {
        Arc::new(Self {
            target: MemoryEventTarget::new(),
            celsius: AtomicI64::new(celsius),
        })
    }

    fn set(&self, celsius: i64) {
        self.celsius.store(celsius, Ordering::SeqCst);
    }
}

impl EventTarget for Thermometer {
    fn add_event_listener(&self, event: &str, callback: &HostCallback) {
        self.target.add_event_listener(event, callback)
    }

    fn remove_event_listener(&self, event: &str, callback: &HostCallback) {
        self.target.remove_event_listener(event, callback)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Reading {
    trigger: Trigger<ThermoEvent>,
    origin: Origin,
    celsius: i64,
}

struct Thermo;

impl Capability for Thermo {
    type Object = Thermometer;
    type Kind = ThermoEvent;
    type Snapshot = Reading;

    const NAME: &'static str = "thermometer";

    fn extract(object: &Thermometer, trigger: Trigger<ThermoEvent>, origin: Origin) -> Reading {
        Reading {
            trigger,
            origin,
            celsius: object.celsius.load(Ordering::SeqCst),
        }
    }
}

/// Forwards readings as unsigned kelvin; readings it cannot convert never
/// reach the channel and report the delivery as closed.
struct KelvinSink(mpsc::UnboundedSender<u16>);

impl SnapshotSink<Reading> for KelvinSink {
    fn deliver(&self, reading: Reading) -> Delivery {
        let Ok(kelvin) = u16::try_from(reading.celsius + 273) else {
            return Delivery::Closed;
        };
        match self.0.send(kelvin) {
            Ok(()) => Delivery::Delivered,
            Err(_) => Delivery::Closed,
        }
    }
}

fn ready_bridge(thermo: &Arc<Thermometer>) -> EventBridge<Thermo> {
    let gate = Arc::new(AcquisitionGate::resolved(Arc::clone(thermo)));
    let bridge = EventBridge::<Thermo>::new(gate);
    bridge.init().unwrap();
    bridge
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn operations_before_init_fail() {
    let thermo = Thermometer::new(20);
    let bridge = EventBridge::<Thermo>::new(Arc::new(AcquisitionGate::resolved(thermo)));
    let (tx, _rx) = mpsc::unbounded_channel();

    assert!(!bridge.is_ready());
    assert!(matches!(bridge.now(), Err(BridgeError::NotInitialized)));
    assert!(matches!(
        bridge.add_listener(ThermoEvent::Change, tx),
        Err(BridgeError::NotInitialized)
    ));
    assert!(matches!(
        bridge.remove_listener(ThermoEvent::Change),
        Err(BridgeError::NotInitialized)
    ));
}

#[test]
fn init_is_idempotent() {
    let thermo = Thermometer::new(20);
    let factory = Arc::new(MemoryFactory::immediate(Arc::clone(&thermo)));
    let bridge = EventBridge::<Thermo>::new(Arc::new(AcquisitionGate::new(Arc::clone(&factory))));

    bridge.init().unwrap().init().unwrap();

    assert!(bridge.is_ready());
    assert_eq!(factory.requests(), 1);
}

#[test]
fn init_with_completes_after_host_answers() {
    let factory = Arc::new(MemoryFactory::<Thermometer>::deferred());
    let bridge = EventBridge::<Thermo>::new(Arc::new(AcquisitionGate::new(Arc::clone(&factory))));
    let (done_tx, done_rx) = std::sync::mpsc::channel();

    bridge.init_with(move |r| done_tx.send(r.is_ok()).unwrap());
    assert!(!bridge.is_ready());

    factory.complete(Thermometer::new(18));
    assert!(done_rx.recv().unwrap());
    assert!(bridge.is_ready());
    assert_eq!(bridge.now().unwrap().celsius, 18);
}

#[test]
fn zero_timeout_is_rejected() {
    let gate = Arc::new(AcquisitionGate::resolved(Thermometer::new(0)));
    let result = EventBridge::<Thermo>::with_options(gate, BridgeOptions { acquire_timeout_ms: 0 });
    assert!(matches!(result, Err(BridgeError::InvalidOptions(_))));
}

#[test]
fn bridges_can_share_a_gate() {
    let thermo = Thermometer::new(5);
    let factory = Arc::new(MemoryFactory::immediate(Arc::clone(&thermo)));
    let gate = Arc::new(AcquisitionGate::new(Arc::clone(&factory)));

    let a = EventBridge::<Thermo>::new(Arc::clone(&gate));
    let b = EventBridge::<Thermo>::new(gate);
    a.init().unwrap();
    b.init().unwrap();

    assert_eq!(factory.requests(), 1);
    assert_eq!(a.now().unwrap(), b.now().unwrap());
}

// ============================================================================
// Query and delivery
// ============================================================================

#[test]
fn now_reads_current_fields_as_query() {
    let thermo = Thermometer::new(21);
    let bridge = ready_bridge(&thermo);

    thermo.set(23);
    let reading = bridge.now().unwrap();

    assert_eq!(reading.trigger, Trigger::Query);
    assert_eq!(reading.origin, Origin::NONE);
    assert_eq!(reading.celsius, 23);
}

#[test]
fn events_carry_trigger_and_origin() {
    let thermo = Thermometer::new(21);
    let bridge = ready_bridge(&thermo);
    let (tx, mut rx) = mpsc::unbounded_channel();
    bridge.add_listener(ThermoEvent::Change, tx).unwrap();

    thermo.set(25);
    thermo.target.dispatch("change");

    let reading = rx.try_recv().unwrap();
    assert_eq!(reading.trigger, Trigger::Event(ThermoEvent::Change));
    assert_eq!(reading.origin, thermo.target.origin());
    assert_eq!(reading.celsius, 25);
    assert_eq!(bridge.stats().delivered, 1);
}

#[test]
fn duplicate_add_keeps_first_sink() {
    let thermo = Thermometer::new(0);
    let bridge = ready_bridge(&thermo);
    let (first_tx, mut first_rx) = mpsc::unbounded_channel();
    let (second_tx, mut second_rx) = mpsc::unbounded_channel();

    bridge
        .add_listener(ThermoEvent::Change, first_tx)
        .unwrap()
        .add_listener(ThermoEvent::Change, second_tx)
        .unwrap();
    thermo.target.dispatch("change");

    assert!(first_rx.try_recv().is_ok());
    assert!(second_rx.try_recv().is_err());
    assert_eq!(thermo.target.listener_count("change"), 1);
}

#[test]
fn removed_listener_stops_delivery() {
    let thermo = Thermometer::new(0);
    let bridge = ready_bridge(&thermo);
    let (tx, mut rx) = mpsc::unbounded_channel();

    bridge.add_listener(ThermoEvent::Change, tx).unwrap();
    thermo.target.dispatch("change");
    bridge.remove_listener(ThermoEvent::Change).unwrap();
    thermo.target.dispatch("change");

    assert!(rx.try_recv().is_ok(), "delivered before removal");
    assert!(rx.try_recv().is_err(), "nothing after removal");
    assert!(!bridge.is_listening(ThermoEvent::Change));
}

#[test]
fn argless_firing_is_dropped_and_counted() {
    let thermo = Thermometer::new(0);
    let bridge = ready_bridge(&thermo);
    let (tx, mut rx) = mpsc::unbounded_channel();
    bridge.add_listener(ThermoEvent::Change, tx).unwrap();

    thermo.target.dispatch_without_args("change");

    assert!(rx.try_recv().is_err());
    let stats = bridge.stats();
    assert_eq!(stats.malformed, 1);
    assert_eq!(stats.delivered, 0);
}

#[test]
fn unconvertible_snapshot_is_not_counted_as_delivered() {
    let thermo = Thermometer::new(-300);
    let bridge = ready_bridge(&thermo);
    let (tx, mut rx) = mpsc::unbounded_channel();
    bridge
        .add_listener(ThermoEvent::Change, KelvinSink(tx))
        .unwrap();

    thermo.target.dispatch("change");
    thermo.set(20);
    thermo.target.dispatch("change");

    assert_eq!(rx.try_recv().unwrap(), 293);
    assert!(rx.try_recv().is_err());
    let stats = bridge.stats();
    assert_eq!(stats.delivered, 1);
    assert_eq!(stats.disconnected, 1);
}
