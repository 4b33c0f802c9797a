//! Capability: the type-level description of one wrapped host object.

use std::fmt::Debug;
use std::hash::Hash;

use crate::host::traits::EventTarget;
use crate::types::{Origin, Trigger};

/// A closed set of host event names, used as the listener registry key.
pub trait EventKind: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// The host-side event name passed to `addEventListener`.
    fn tag(self) -> &'static str;
}

/// Everything [`EventBridge`](super::EventBridge) needs to know about a host
/// capability: the object it wraps, the events it fires, and how a snapshot
/// is read off the object.
pub trait Capability: Send + Sync + 'static {
    /// Typed view of the host object, usually a `dyn Trait`.
    type Object: ?Sized + EventTarget + 'static;
    type Kind: EventKind;
    type Snapshot: Clone + Send + 'static;

    /// Short name used in log fields.
    const NAME: &'static str;

    /// Read the object's current fields into a snapshot. Must not fail.
    fn extract(object: &Self::Object, trigger: Trigger<Self::Kind>, origin: Origin)
        -> Self::Snapshot;
}
