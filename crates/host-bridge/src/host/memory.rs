//! In-memory host: event targets and factories that live entirely in Rust.
//!
//! These stand in for the browser when running natively and in tests. They
//! follow host semantics closely enough to exercise the bridge:
//!   - Listeners are kept per event name in registration order; adding the
//!     same callback twice is ignored, like `addEventListener`.
//!   - Dispatch snapshots the listener list and releases the lock before any
//!     callback runs, so callbacks may add or remove listeners.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::bridge::gate::Resolver;
use crate::types::Origin;

use super::traits::{EventTarget, HostCallback, HostFactory, Invocation};

// ============================================================================
// MemoryEventTarget
// ============================================================================

/// A host object listener list with manual dispatch.
pub struct MemoryEventTarget {
    origin: Origin,
    /// event name → callbacks in registration order
    listeners: Mutex<HashMap<String, Vec<HostCallback>>>,
}

impl MemoryEventTarget {
    pub fn new() -> Self {
        Self {
            origin: Origin::next(),
            listeners: Mutex::new(HashMap::new()),
        }
    }

    /// The origin reported to callbacks fired by this target.
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Fire `event` with a single event argument, as a real host does.
    /// Returns the number of callbacks invoked.
    pub fn dispatch(&self, event: &str) -> usize {
        self.dispatch_with(event, 1)
    }

    /// Fire `event` with no arguments at all.
    pub fn dispatch_without_args(&self, event: &str) -> usize {
        self.dispatch_with(event, 0)
    }

    pub fn dispatch_with(&self, event: &str, arg_count: usize) -> usize {
        let snapshot: Vec<HostCallback> = {
            let guard = self.listeners.lock();
            guard.get(event).cloned().unwrap_or_default()
        };
        let invocation = Invocation::new(self.origin, arg_count);
        for cb in &snapshot {
            cb.invoke(invocation);
        }
        snapshot.len()
    }

    /// Number of callbacks currently registered for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.lock().get(event).map_or(0, Vec::len)
    }

    /// Number of callbacks registered across all events.
    pub fn total_listeners(&self) -> usize {
        self.listeners.lock().values().map(Vec::len).sum()
    }
}

impl Default for MemoryEventTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl EventTarget for MemoryEventTarget {
    fn add_event_listener(&self, event: &str, callback: &HostCallback) {
        let mut guard = self.listeners.lock();
        let list = guard.entry(event.to_string()).or_default();
        if !list.iter().any(|cb| cb.id() == callback.id()) {
            list.push(callback.clone());
        }
    }

    fn remove_event_listener(&self, event: &str, callback: &HostCallback) {
        let mut guard = self.listeners.lock();
        if let Some(list) = guard.get_mut(event) {
            list.retain(|cb| cb.id() != callback.id());
            if list.is_empty() {
                guard.remove(event);
            }
        }
    }
}

// ============================================================================
// MemoryFactory
// ============================================================================

enum Mode<O: ?Sized> {
    Immediate(Arc<O>),
    Deferred,
    Denied(String),
}

/// A scripted [`HostFactory`].
///
/// - `immediate` resolves inside `request`, like a host whose promise is
///   already settled.
/// - `deferred` parks every resolver until `complete` or `fail` is called,
///   possibly from another thread. Never calling either models a host that
///   never answers.
/// - `denied` rejects every request.
pub struct MemoryFactory<O: ?Sized> {
    mode: Mode<O>,
    pending: Mutex<Vec<Resolver<O>>>,
    requests: AtomicUsize,
}

impl<O: ?Sized> MemoryFactory<O> {
    fn with_mode(mode: Mode<O>) -> Self {
        Self {
            mode,
            pending: Mutex::new(Vec::new()),
            requests: AtomicUsize::new(0),
        }
    }

    pub fn immediate(object: Arc<O>) -> Self {
        Self::with_mode(Mode::Immediate(object))
    }

    pub fn deferred() -> Self {
        Self::with_mode(Mode::Deferred)
    }

    pub fn denied(reason: impl Into<String>) -> Self {
        Self::with_mode(Mode::Denied(reason.into()))
    }

    /// How many times the host was asked for its object.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Requests waiting for `complete` / `fail`.
    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }
}

impl<O: ?Sized + Send + Sync + 'static> MemoryFactory<O> {
    /// Resolve every parked request with `object`. Returns how many were parked.
    pub fn complete(&self, object: Arc<O>) -> usize {
        let parked = std::mem::take(&mut *self.pending.lock());
        let n = parked.len();
        for resolver in parked {
            resolver.resolve(Arc::clone(&object));
        }
        n
    }

    /// Reject every parked request. Returns how many were parked.
    pub fn fail(&self, reason: &str) -> usize {
        let parked = std::mem::take(&mut *self.pending.lock());
        let n = parked.len();
        for resolver in parked {
            resolver.reject(reason);
        }
        n
    }
}

impl<O: ?Sized + Send + Sync + 'static> HostFactory<O> for MemoryFactory<O> {
    fn request(&self, resolver: Resolver<O>) {
        self.requests.fetch_add(1, Ordering::SeqCst);
        match &self.mode {
            Mode::Immediate(object) => resolver.resolve(Arc::clone(object)),
            Mode::Deferred => self.pending.lock().push(resolver),
            Mode::Denied(reason) => resolver.reject(reason.clone()),
        }
    }
}
