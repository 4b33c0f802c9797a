//! EventBridge<C>: the generic host event bridge.
//!
//! Composes the [`AcquisitionGate`], the [`ListenerRegistry`] and the
//! capability's extractor into the public contract:
//!   - `init()` resolves the host object (blocking, with the configured
//!     timeout) and moves the bridge from *uninitialized* to *ready*.
//!   - `now()` reads a snapshot on demand.
//!   - `add_listener(kind, sink)` / `remove_listener(kind)` wire host events
//!     of one kind to a sink.
//!
//! Every operation other than `init` fails with `NotInitialized` until the
//! bridge is ready. There is no closed state.
//!
//! # Callbacks
//!
//! A registered callback holds a `Weak` reference to the host object, the
//! sink, and the shared stats. On each firing it:
//!   1. drops invocations without arguments (malformed, counted),
//!   2. extracts a snapshot from the object's *current* fields,
//!   3. hands it to the sink and records the outcome.
//!
//! Nothing is ever surfaced through the sink except successful snapshots.

use std::sync::{Arc, OnceLock};

use crate::error::{BridgeError, Result};
use crate::host::traits::HostCallback;
use crate::types::{BridgeOptions, BridgeStats, DropReason, Origin, StatsSnapshot, Trigger};

use super::capability::{Capability, EventKind};
use super::gate::AcquisitionGate;
use super::registry::ListenerRegistry;
use super::sink::{Delivery, SnapshotSink};

pub struct EventBridge<C: Capability> {
    gate: Arc<AcquisitionGate<C::Object>>,
    /// Set once by `init`; shared with `init_with` continuations.
    object: Arc<OnceLock<Arc<C::Object>>>,
    registry: ListenerRegistry<C::Kind>,
    stats: Arc<BridgeStats>,
    options: BridgeOptions,
}

impl<C: Capability> EventBridge<C> {
    /// Create an uninitialized bridge with default options.
    pub fn new(gate: Arc<AcquisitionGate<C::Object>>) -> Self {
        Self::build(gate, BridgeOptions::default())
    }

    /// Create an uninitialized bridge, validating `options` first.
    pub fn with_options(
        gate: Arc<AcquisitionGate<C::Object>>,
        options: BridgeOptions,
    ) -> Result<Self> {
        options.validate()?;
        Ok(Self::build(gate, options))
    }

    fn build(gate: Arc<AcquisitionGate<C::Object>>, options: BridgeOptions) -> Self {
        Self {
            gate,
            object: Arc::new(OnceLock::new()),
            registry: ListenerRegistry::new(),
            stats: Arc::new(BridgeStats::default()),
            options,
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Resolve the host object, blocking up to `acquire_timeout_ms`.
    ///
    /// Calling `init` on a ready bridge returns immediately.
    pub fn init(&self) -> Result<&Self> {
        if self.object.get().is_none() {
            let object = self.gate.acquire(self.options.acquire_timeout())?;
            let _ = self.object.set(object);
            tracing::debug!(capability = C::NAME, "bridge ready");
        }
        Ok(self)
    }

    /// Non-blocking `init`: `done` runs once the bridge is ready or the
    /// acquisition failed. The bridge is ready before `done` is called.
    pub fn init_with(&self, done: impl FnOnce(Result<()>) + Send + 'static) {
        if self.object.get().is_some() {
            done(Ok(()));
            return;
        }
        let slot = Arc::clone(&self.object);
        self.gate.acquire_with(move |result| {
            done(result.map(|object| {
                let _ = slot.set(object);
                tracing::debug!(capability = C::NAME, "bridge ready");
            }))
        });
    }

    pub fn is_ready(&self) -> bool {
        self.object.get().is_some()
    }

    // ========================================================================
    // Query
    // ========================================================================

    /// Read the host object's current fields.
    pub fn now(&self) -> Result<C::Snapshot> {
        let object = self.ready_object()?;
        Ok(C::extract(object, Trigger::Query, Origin::NONE))
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    /// Deliver a snapshot to `sink` every time the host fires `kind`.
    ///
    /// If `kind` already has a listener this is a no-op: the existing sink
    /// keeps receiving and `sink` is dropped.
    pub fn add_listener<S>(&self, kind: C::Kind, sink: S) -> Result<&Self>
    where
        S: SnapshotSink<C::Snapshot> + 'static,
    {
        let object = self.ready_object()?;
        let added = self
            .registry
            .add(&**object, kind, || self.make_callback(object, kind, sink));
        if added {
            tracing::debug!(capability = C::NAME, event = kind.tag(), "listener registered");
        } else {
            tracing::debug!(
                capability = C::NAME,
                event = kind.tag(),
                "listener already registered, keeping existing sink"
            );
        }
        Ok(self)
    }

    /// Stop delivering `kind`. Snapshots already handed to the sink stay
    /// there; the channel is neither drained nor closed by the bridge.
    pub fn remove_listener(&self, kind: C::Kind) -> Result<&Self> {
        let object = self.ready_object()?;
        if self.registry.remove(&**object, kind) {
            tracing::debug!(capability = C::NAME, event = kind.tag(), "listener removed");
        }
        Ok(self)
    }

    pub fn is_listening(&self, kind: C::Kind) -> bool {
        self.registry.is_registered(kind)
    }

    /// Kinds that currently have a listener, in no particular order.
    pub fn listening(&self) -> Vec<C::Kind> {
        self.registry.kinds()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn options(&self) -> &BridgeOptions {
        &self.options
    }

    pub fn gate(&self) -> &Arc<AcquisitionGate<C::Object>> {
        &self.gate
    }

    fn ready_object(&self) -> Result<&Arc<C::Object>> {
        self.object.get().ok_or(BridgeError::NotInitialized)
    }

    fn make_callback<S>(&self, object: &Arc<C::Object>, kind: C::Kind, sink: S) -> HostCallback
    where
        S: SnapshotSink<C::Snapshot> + 'static,
    {
        let object = Arc::downgrade(object);
        let stats = Arc::clone(&self.stats);
        HostCallback::new(move |invocation| {
            if !invocation.has_args() {
                tracing::debug!(
                    capability = C::NAME,
                    event = kind.tag(),
                    reason = %DropReason::Malformed,
                    "dropping host event fired without arguments"
                );
                stats.record_dropped(DropReason::Malformed);
                return;
            }
            let Some(object) = object.upgrade() else {
                stats.record_dropped(DropReason::Detached);
                return;
            };
            let snapshot = C::extract(&object, Trigger::Event(kind), invocation.origin);
            match sink.deliver(snapshot) {
                Delivery::Delivered => stats.record_delivered(),
                Delivery::Full => {
                    tracing::warn!(
                        capability = C::NAME,
                        event = kind.tag(),
                        reason = %DropReason::Overflow,
                        "delivery channel full, dropping snapshot"
                    );
                    stats.record_dropped(DropReason::Overflow);
                }
                Delivery::Closed => {
                    tracing::debug!(
                        capability = C::NAME,
                        event = kind.tag(),
                        reason = %DropReason::Disconnected,
                        "delivery channel closed, dropping snapshot"
                    );
                    stats.record_dropped(DropReason::Disconnected);
                }
            }
        })
    }
}
