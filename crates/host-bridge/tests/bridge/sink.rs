//! Tests for `SnapshotSink` implementations.

use std::sync::Arc;

use host_bridge::bridge::{Delivery, SnapshotSink};
use parking_lot::Mutex;
use tokio::sync::mpsc;

/// A sink that records everything, for callers that poll instead of await.
#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<u32>>,
}

impl SnapshotSink<u32> for Recorder {
    fn deliver(&self, snapshot: u32) -> Delivery {
        self.seen.lock().push(snapshot);
        Delivery::Delivered
    }
}

#[test]
fn shared_sink_delivers_through_arc() {
    let recorder = Arc::new(Recorder::default());
    let sink: Arc<Recorder> = Arc::clone(&recorder);

    assert_eq!(sink.deliver(1), Delivery::Delivered);
    assert_eq!(sink.deliver(2), Delivery::Delivered);

    assert_eq!(*recorder.seen.lock(), vec![1, 2]);
}

#[test]
fn unbounded_preserves_order() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    for n in 0..100_u32 {
        assert_eq!(tx.deliver(n), Delivery::Delivered);
    }
    let received: Vec<u32> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
    assert_eq!(received, (0..100).collect::<Vec<_>>());
}

#[test]
fn bounded_keeps_oldest_when_full() {
    let (tx, mut rx) = mpsc::channel(2);
    assert_eq!(tx.deliver(1_u32), Delivery::Delivered);
    assert_eq!(tx.deliver(2), Delivery::Delivered);
    assert_eq!(tx.deliver(3), Delivery::Full);

    assert_eq!(rx.try_recv().unwrap(), 1);
    assert_eq!(tx.deliver(4), Delivery::Delivered);
    assert_eq!(rx.try_recv().unwrap(), 2);
    assert_eq!(rx.try_recv().unwrap(), 4);
}

#[test]
fn bounded_reports_closed_receiver() {
    let (tx, rx) = mpsc::channel::<u32>(4);
    drop(rx);
    assert_eq!(tx.deliver(1), Delivery::Closed);
}
