//! SnapshotSink: where a listener hands the snapshots it produces.
//!
//! The sink owns the buffering policy, so it is chosen explicitly by the
//! caller when a listener is added:
//!
//! | sink | when the consumer is slow | when the consumer is gone |
//! |---|---|---|
//! | `tokio::sync::mpsc::UnboundedSender` | buffers without limit | drops |
//! | `tokio::sync::mpsc::Sender` (bounded) | drops the new snapshot | drops |
//!
//! Neither blocks, so a slow consumer can never stall the host's dispatch
//! loop. Per listener, snapshots reach the sink in firing order.

use tokio::sync::mpsc;

/// Outcome of a single hand-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// Bounded buffer full; the snapshot was discarded.
    Full,
    /// Receiver dropped; the snapshot was discarded.
    Closed,
}

/// Destination for snapshots produced by host callbacks.
///
/// Called from the host's dispatch context; implementations must not block.
pub trait SnapshotSink<S>: Send + Sync {
    fn deliver(&self, snapshot: S) -> Delivery;
}

impl<S, T: SnapshotSink<S> + ?Sized> SnapshotSink<S> for std::sync::Arc<T> {
    fn deliver(&self, snapshot: S) -> Delivery {
        (**self).deliver(snapshot)
    }
}

impl<S: Send> SnapshotSink<S> for mpsc::UnboundedSender<S> {
    fn deliver(&self, snapshot: S) -> Delivery {
        match self.send(snapshot) {
            Ok(()) => Delivery::Delivered,
            Err(_) => Delivery::Closed,
        }
    }
}

impl<S: Send> SnapshotSink<S> for mpsc::Sender<S> {
    fn deliver(&self, snapshot: S) -> Delivery {
        match self.try_send(snapshot) {
            Ok(()) => Delivery::Delivered,
            Err(mpsc::error::TrySendError::Full(_)) => Delivery::Full,
            Err(mpsc::error::TrySendError::Closed(_)) => Delivery::Closed,
        }
    }
}
