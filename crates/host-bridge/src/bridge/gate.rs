//! AcquisitionGate: single-flight, set-once acquisition of a host object.
//!
//! The host hands its object over asynchronously (a then-style continuation).
//! The gate turns that into:
//!   - `acquire(timeout)`: block the calling thread on a condition variable
//!     until the object arrives, the host rejects, or the deadline passes.
//!   - `acquire_with(done)`: register a continuation instead of blocking,
//!     for single-threaded hosts where blocking would deadlock the event loop.
//!
//! Only one host request is in flight at a time: concurrent callers join the
//! pending attempt. Once resolved the object is stored for the life of the
//! gate and never cleared. A rejected attempt leaves the gate retryable.
//!
//! The host request is always issued with the state lock released, so a
//! factory that resolves synchronously inside `request` does not deadlock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::error::{BridgeError, Result};
use crate::host::traits::HostFactory;

type Waiter<O> = Box<dyn FnOnce(Result<Arc<O>>) + Send>;

enum GateState<O: ?Sized> {
    /// No request issued yet.
    Idle,
    /// A host request is in flight; continuations wait here.
    Pending { waiters: Vec<Waiter<O>> },
    /// Resolved. Terminal.
    Ready(Arc<O>),
    /// The last attempt was rejected. The next caller retries.
    Failed(String),
}

struct GateShared<O: ?Sized> {
    state: Mutex<GateState<O>>,
    settled: Condvar,
}

impl<O: ?Sized> GateShared<O> {
    fn settle(&self, outcome: std::result::Result<Arc<O>, String>) {
        let waiters = {
            let mut state = self.state.lock();
            if matches!(*state, GateState::Ready(_)) {
                // Already resolved by an earlier attempt; late answers are ignored.
                return;
            }
            let previous = std::mem::replace(
                &mut *state,
                match &outcome {
                    Ok(object) => GateState::Ready(Arc::clone(object)),
                    Err(reason) => GateState::Failed(reason.clone()),
                },
            );
            self.settled.notify_all();
            match previous {
                GateState::Pending { waiters } => waiters,
                _ => Vec::new(),
            }
        };
        // Continuations run with the lock released.
        for waiter in waiters {
            match &outcome {
                Ok(object) => waiter(Ok(Arc::clone(object))),
                Err(reason) => waiter(Err(BridgeError::AcquisitionFailed(reason.clone()))),
            }
        }
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// The completion half handed to a [`HostFactory`].
///
/// Consumed by `resolve` or `reject`, so a request completes at most once.
/// A resolver dropped without completing rejects the attempt.
pub struct Resolver<O: ?Sized> {
    shared: Option<Weak<GateShared<O>>>,
}

impl<O: ?Sized> Resolver<O> {
    /// Hand the host object to the gate.
    pub fn resolve(mut self, object: Arc<O>) {
        if let Some(shared) = self.shared.take().and_then(|w| w.upgrade()) {
            tracing::debug!("host object acquired");
            shared.settle(Ok(object));
        }
    }

    /// Report that the host refused or failed the request.
    pub fn reject(mut self, reason: impl Into<String>) {
        if let Some(shared) = self.shared.take().and_then(|w| w.upgrade()) {
            let reason = reason.into();
            tracing::warn!(%reason, "host object acquisition rejected");
            shared.settle(Err(reason));
        }
    }
}

impl<O: ?Sized> Drop for Resolver<O> {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.take().and_then(|w| w.upgrade()) {
            shared.settle(Err("host dropped the request without answering".to_string()));
        }
    }
}

// ============================================================================
// AcquisitionGate
// ============================================================================

/// Owns the one-time handshake that yields a host object of type `O`.
///
/// Share it between bridges with `Arc` to make them use one acquisition.
pub struct AcquisitionGate<O: ?Sized> {
    shared: Arc<GateShared<O>>,
    factory: Option<Box<dyn HostFactory<O>>>,
    requests: AtomicU64,
}

impl<O: ?Sized + Send + Sync + 'static> AcquisitionGate<O> {
    /// A gate that will ask `factory` for the object on first use.
    pub fn new(factory: impl HostFactory<O> + 'static) -> Self {
        Self {
            shared: Arc::new(GateShared {
                state: Mutex::new(GateState::Idle),
                settled: Condvar::new(),
            }),
            factory: Some(Box::new(factory)),
            requests: AtomicU64::new(0),
        }
    }

    /// A gate that already holds its object.
    pub fn resolved(object: Arc<O>) -> Self {
        Self {
            shared: Arc::new(GateShared {
                state: Mutex::new(GateState::Ready(object)),
                settled: Condvar::new(),
            }),
            factory: None,
            requests: AtomicU64::new(0),
        }
    }

    /// Block until the host object is available, up to `timeout`.
    ///
    /// The first caller issues the host request; concurrent callers wait on
    /// the same attempt. On timeout the request stays in flight, and a late
    /// resolution is still stored for later callers.
    pub fn acquire(&self, timeout: Duration) -> Result<Arc<O>> {
        let deadline = Instant::now() + timeout;
        let mut state = self.shared.state.lock();

        let needs_request = match &*state {
            GateState::Ready(object) => return Ok(Arc::clone(object)),
            GateState::Pending { .. } => false,
            GateState::Idle | GateState::Failed(_) => true,
        };
        if needs_request {
            *state = GateState::Pending {
                waiters: Vec::new(),
            };
            drop(state);
            self.issue_request();
            state = self.shared.state.lock();
        }

        loop {
            match &*state {
                GateState::Ready(object) => return Ok(Arc::clone(object)),
                GateState::Failed(reason) => {
                    return Err(BridgeError::AcquisitionFailed(reason.clone()))
                }
                GateState::Idle => {
                    return Err(BridgeError::AcquisitionFailed(
                        "acquisition was reset while waiting".to_string(),
                    ))
                }
                GateState::Pending { .. } => {}
            }
            if self
                .shared
                .settled
                .wait_until(&mut state, deadline)
                .timed_out()
            {
                if let GateState::Ready(object) = &*state {
                    return Ok(Arc::clone(object));
                }
                tracing::warn!(
                    timeout_ms = timeout.as_millis() as u64,
                    "host object acquisition timed out"
                );
                return Err(BridgeError::AcquisitionTimeout { timeout });
            }
        }
    }

    /// Call `done` once the host object is available (or the attempt fails).
    ///
    /// Runs `done` immediately when already resolved. Never blocks.
    pub fn acquire_with(&self, done: impl FnOnce(Result<Arc<O>>) + Send + 'static) {
        let mut state = self.shared.state.lock();
        if let GateState::Ready(object) = &*state {
            let object = Arc::clone(object);
            drop(state);
            done(Ok(object));
            return;
        }
        if let GateState::Pending { waiters } = &mut *state {
            waiters.push(Box::new(done));
            return;
        }
        *state = GateState::Pending {
            waiters: vec![Box::new(done)],
        };
        drop(state);
        self.issue_request();
    }

    /// The host object, if acquisition has completed.
    pub fn get(&self) -> Option<Arc<O>> {
        match &*self.shared.state.lock() {
            GateState::Ready(object) => Some(Arc::clone(object)),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(*self.shared.state.lock(), GateState::Ready(_))
    }

    /// Number of host requests this gate has issued.
    pub fn requests_issued(&self) -> u64 {
        self.requests.load(Ordering::SeqCst)
    }

    fn issue_request(&self) {
        let resolver = Resolver {
            shared: Some(Arc::downgrade(&self.shared)),
        };
        match &self.factory {
            Some(factory) => {
                self.requests.fetch_add(1, Ordering::SeqCst);
                tracing::debug!("requesting host object");
                factory.request(resolver);
            }
            None => resolver.reject("gate has no host factory"),
        }
    }
}
