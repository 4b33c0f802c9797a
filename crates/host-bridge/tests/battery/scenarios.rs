//! End-to-end battery scenarios: host acquisition, listeners, delivery
//! policy and failure paths together.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use host_bridge::battery::{
    BatteryBridge, BatteryEvent, BatteryGate, BatteryManager, MemoryBattery,
};
use host_bridge::host::MemoryFactory;
use host_bridge::{AcquisitionGate, BridgeError, Origin, Trigger};
use tokio::sync::mpsc;

#[test]
fn level_change_after_init_reaches_channel() {
    let battery = Arc::new(MemoryBattery::with_state(true, 0.0, 0.0, 1.0));
    let factory = Arc::new(MemoryFactory::<dyn BatteryManager>::deferred());
    let bridge = Arc::new(BatteryBridge::new(Arc::clone(&factory)));

    let init = {
        let bridge = Arc::clone(&bridge);
        thread::spawn(move || bridge.init().map(|_| ()))
    };
    while factory.pending() == 0 {
        thread::sleep(Duration::from_millis(1));
    }
    factory.complete(Arc::clone(&battery).into_manager());
    init.join().unwrap().unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    bridge.add_listener_level_change(tx).unwrap();

    battery.set_charging_time(-5.0);
    battery.set_discharging_time(3600.0);
    battery.set_level(0.42);
    battery.fire(BatteryEvent::LevelChange);

    let snap = rx.try_recv().unwrap();
    assert_eq!(snap.event_kind(), Trigger::Event(BatteryEvent::LevelChange));
    assert!(snap.charging());
    assert_eq!(snap.charging_time_seconds(), -1);
    assert_eq!(snap.discharging_time_seconds(), 3600);
    assert_eq!(snap.level(), 0.42);
    assert!(rx.try_recv().is_err(), "exactly one snapshot per firing");
}

#[test]
fn now_after_init_reads_normalized_state() {
    let battery = Arc::new(MemoryBattery::with_state(true, -5.0, 3600.0, 0.42));
    let factory = MemoryFactory::<dyn BatteryManager>::immediate(battery.into_manager());
    let bridge = BatteryBridge::new(factory);
    bridge.init().unwrap();

    let snap = bridge.now().unwrap();

    assert_eq!(snap.event_kind(), Trigger::Query);
    assert_eq!(snap.origin(), Origin::NONE);
    assert!(snap.charging());
    assert_eq!(snap.charging_time_seconds(), -1);
    assert_eq!(snap.discharging_time_seconds(), 3600);
    assert_eq!(snap.level(), 0.42);
}

#[test]
fn now_matches_latest_event_reading() {
    let battery = Arc::new(MemoryBattery::with_state(false, 0.0, 7200.0, 0.8));
    let bridge = BatteryBridge::from_manager(Arc::clone(&battery).into_manager());
    bridge.init().unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    bridge.add_listener_discharging_time_change(tx).unwrap();

    battery.set_discharging_time(7000.0);
    battery.fire(BatteryEvent::DischargingTimeChange);

    let event = rx.try_recv().unwrap();
    let query = bridge.now().unwrap();
    assert_eq!(query.event_kind(), Trigger::Query);
    assert!(query.same_reading(&event));
}

#[test]
fn snapshots_read_fields_at_delivery_time() {
    let battery = Arc::new(MemoryBattery::with_state(true, 100.0, 0.0, 0.1));
    let bridge = BatteryBridge::from_manager(Arc::clone(&battery).into_manager());
    bridge.init().unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    bridge.add_listener_level_change(tx).unwrap();

    for level in [0.2, 0.3, 0.4] {
        battery.set_level(level);
        battery.fire(BatteryEvent::LevelChange);
    }

    let levels: Vec<f64> = std::iter::from_fn(|| rx.try_recv().ok())
        .map(|s| s.level())
        .collect();
    assert_eq!(levels, vec![0.2, 0.3, 0.4]);
}

#[test]
fn spurious_firing_is_dropped() {
    let battery = Arc::new(MemoryBattery::with_state(true, 0.0, 0.0, 1.0));
    let bridge = BatteryBridge::from_manager(Arc::clone(&battery).into_manager());
    bridge.init().unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    bridge.add_listener_charging_change(tx).unwrap();

    battery.fire_without_args(BatteryEvent::ChargingChange);
    battery.fire(BatteryEvent::ChargingChange);

    assert!(rx.try_recv().is_ok());
    assert!(rx.try_recv().is_err());
    let stats = bridge.stats();
    assert_eq!(stats.malformed, 1);
    assert_eq!(stats.delivered, 1);
}

#[test]
fn bounded_channel_drops_overflow() {
    let battery = Arc::new(MemoryBattery::with_state(true, 0.0, 0.0, 1.0));
    let bridge = BatteryBridge::from_manager(Arc::clone(&battery).into_manager());
    bridge.init().unwrap();
    let (tx, mut rx) = mpsc::channel(2);
    bridge.add_listener_level_change(tx).unwrap();

    for _ in 0..5 {
        battery.fire(BatteryEvent::LevelChange);
    }

    let stats = bridge.stats();
    assert_eq!(stats.delivered, 2);
    assert_eq!(stats.overflow, 3);
    assert_eq!(std::iter::from_fn(|| rx.try_recv().ok()).count(), 2);
}

#[test]
fn dropped_receiver_counts_disconnects() {
    let battery = Arc::new(MemoryBattery::with_state(true, 0.0, 0.0, 1.0));
    let bridge = BatteryBridge::from_manager(Arc::clone(&battery).into_manager());
    bridge.init().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    bridge.add_listener_level_change(tx).unwrap();

    drop(rx);
    battery.fire(BatteryEvent::LevelChange);

    assert_eq!(bridge.stats().disconnected, 1);
    assert!(bridge.is_listening(BatteryEvent::LevelChange), "listener stays registered");
}

#[test]
fn listeners_require_init() {
    let bridge = BatteryBridge::new(MemoryFactory::<dyn BatteryManager>::deferred());
    let (tx, _rx) = mpsc::unbounded_channel();

    assert!(matches!(bridge.add_listener_level_change(tx), Err(BridgeError::NotInitialized)));
    assert!(matches!(bridge.remove_listener_level_change(), Err(BridgeError::NotInitialized)));
    assert!(matches!(bridge.now(), Err(BridgeError::NotInitialized)));
}

#[test]
fn two_bridges_one_acquisition_independent_listeners() {
    let battery = Arc::new(MemoryBattery::with_state(true, 0.0, 0.0, 0.6));
    let factory = Arc::new(MemoryFactory::<dyn BatteryManager>::immediate(
        Arc::clone(&battery).into_manager(),
    ));
    let gate: Arc<BatteryGate> = Arc::new(AcquisitionGate::new(Arc::clone(&factory)));
    let a = BatteryBridge::from_gate(Arc::clone(&gate));
    let b = BatteryBridge::from_gate(gate);
    a.init().unwrap();
    b.init().unwrap();

    let (a_tx, mut a_rx) = mpsc::unbounded_channel();
    let (b_tx, mut b_rx) = mpsc::unbounded_channel();
    a.add_listener_level_change(a_tx).unwrap();
    b.add_listener_level_change(b_tx).unwrap();
    battery.fire(BatteryEvent::LevelChange);

    assert_eq!(factory.requests(), 1);
    assert_eq!(battery.listener_count(BatteryEvent::LevelChange), 2);
    assert!(a_rx.try_recv().is_ok());
    assert!(b_rx.try_recv().is_ok());

    a.remove_listener_level_change().unwrap();
    assert_eq!(battery.listener_count(BatteryEvent::LevelChange), 1);
}
