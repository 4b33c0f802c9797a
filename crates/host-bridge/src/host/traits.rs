/// Host capability traits.
///
/// `EventTarget` is the narrow listener surface every wrapped host object
/// exposes (the `addEventListener` / `removeEventListener` pair).
/// Capability-specific traits such as `BatteryManager` extend it with one
/// typed getter per host field. `HostFactory` performs the asynchronous
/// request that yields the object in the first place.
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::bridge::gate::Resolver;
use crate::types::Origin;

// ============================================================================
// Callbacks
// ============================================================================

/// Identity of a registered callback. Hosts remove listeners by identity,
/// so an add/remove pair must present the same id.
pub type CallbackId = u64;

static NEXT_CALLBACK_ID: AtomicU64 = AtomicU64::new(1);

/// One host-side invocation of a registered callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation {
    /// The host object instance that fired (JS `this`).
    pub origin: Origin,
    /// Number of arguments the host passed. Zero marks a spurious firing.
    pub arg_count: usize,
}

impl Invocation {
    pub fn new(origin: Origin, arg_count: usize) -> Self {
        Self { origin, arg_count }
    }

    pub fn has_args(&self) -> bool {
        self.arg_count > 0
    }
}

type CallbackFn = dyn Fn(Invocation) + Send + Sync;

/// A closure handed to the host. Cloning shares the closure and keeps the id.
#[derive(Clone)]
pub struct HostCallback {
    id: CallbackId,
    f: Arc<CallbackFn>,
}

impl HostCallback {
    pub fn new(f: impl Fn(Invocation) + Send + Sync + 'static) -> Self {
        Self {
            id: NEXT_CALLBACK_ID.fetch_add(1, Ordering::Relaxed),
            f: Arc::new(f),
        }
    }

    pub fn id(&self) -> CallbackId {
        self.id
    }

    pub fn invoke(&self, invocation: Invocation) {
        (self.f)(invocation)
    }
}

impl fmt::Debug for HostCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostCallback").field("id", &self.id).finish()
    }
}

impl PartialEq for HostCallback {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for HostCallback {}

// ============================================================================
// Host surfaces
// ============================================================================

/// Listener registration on a host object.
///
/// Registration is assumed to succeed; hosts that can fail must log and
/// swallow. Implementors must be `Send + Sync` so one object can be shared by
/// every bridge and callback that refers to it.
pub trait EventTarget: Send + Sync {
    /// Register `callback` for the host event named `event`. Registering the
    /// same callback id twice for the same event has no further effect.
    fn add_event_listener(&self, event: &str, callback: &HostCallback);

    /// Unregister the callback with the same id. Unknown callbacks are ignored.
    fn remove_event_listener(&self, event: &str, callback: &HostCallback);
}

/// Asynchronous producer of a host object.
///
/// `request` starts the host call and returns immediately; the host completes
/// it later, possibly on another thread, by consuming the [`Resolver`].
pub trait HostFactory<O: ?Sized>: Send + Sync {
    fn request(&self, resolver: Resolver<O>);
}

impl<O: ?Sized, F: HostFactory<O> + ?Sized> HostFactory<O> for Arc<F> {
    fn request(&self, resolver: Resolver<O>) {
        (**self).request(resolver)
    }
}
