//! Bridge layer: acquisition, listener bookkeeping and delivery, generic
//! over a [`Capability`].
//!
//! # Modules
//!
//! - [`capability`]: [`Capability`] and [`EventKind`] traits.
//! - [`gate`]: [`AcquisitionGate`] and its [`Resolver`].
//! - [`registry`]: [`ListenerRegistry`], one registration per kind.
//! - [`sink`]: [`SnapshotSink`] and the tokio channel implementations.
//! - [`adapter`]: [`EventBridge<C>`] tying the pieces together.

pub mod adapter;
pub mod capability;
pub mod gate;
pub mod registry;
pub mod sink;

pub use adapter::EventBridge;
pub use capability::{Capability, EventKind};
pub use gate::{AcquisitionGate, Resolver};
pub use registry::ListenerRegistry;
pub use sink::{Delivery, SnapshotSink};
