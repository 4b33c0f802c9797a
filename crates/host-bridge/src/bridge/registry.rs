//! ListenerRegistry: at most one host registration per event kind.
//!
//! `add` and `remove` are idempotent: adding a kind that is already
//! registered leaves the existing registration (and its sink) untouched, and
//! removing a kind that is not registered does nothing.
//!
//! The check-and-register sequence runs under the registry lock so two
//! threads racing to add the same kind still produce a single host
//! registration. Host callbacks never touch the registry, so holding the lock
//! across the host's `addEventListener` cannot deadlock.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::host::traits::{EventTarget, HostCallback};

use super::capability::EventKind;

pub struct ListenerRegistry<K: EventKind> {
    handles: Mutex<HashMap<K, HostCallback>>,
}

impl<K: EventKind> ListenerRegistry<K> {
    pub fn new() -> Self {
        Self {
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// Register a callback for `kind` on `target` unless one is already live.
    ///
    /// `make_callback` only runs when a registration is actually made.
    /// Returns `true` if a new registration was made.
    pub fn add<T: EventTarget + ?Sized>(
        &self,
        target: &T,
        kind: K,
        make_callback: impl FnOnce() -> HostCallback,
    ) -> bool {
        let mut handles = self.handles.lock();
        if handles.contains_key(&kind) {
            return false;
        }
        let callback = make_callback();
        target.add_event_listener(kind.tag(), &callback);
        handles.insert(kind, callback);
        true
    }

    /// Unregister the live callback for `kind`, if any, and release it.
    ///
    /// Returns `true` if a registration was removed.
    pub fn remove<T: EventTarget + ?Sized>(&self, target: &T, kind: K) -> bool {
        let mut handles = self.handles.lock();
        match handles.remove(&kind) {
            Some(callback) => {
                target.remove_event_listener(kind.tag(), &callback);
                true
            }
            None => false,
        }
    }

    pub fn is_registered(&self, kind: K) -> bool {
        self.handles.lock().contains_key(&kind)
    }

    /// Kinds with a live registration.
    pub fn kinds(&self) -> Vec<K> {
        self.handles.lock().keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.handles.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.lock().is_empty()
    }
}

impl<K: EventKind> Default for ListenerRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}
