use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize, Serializer};

use crate::bridge::EventKind;
use crate::error::{BridgeError, Result};

// ---------------------------------------------------------------------------
// Origin
// ---------------------------------------------------------------------------

/// Opaque handle naming the host object instance a snapshot was read from.
///
/// Host adapters allocate one per wrapped object with [`Origin::next`];
/// on-demand reads carry [`Origin::NONE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Origin(Option<u64>);

static NEXT_ORIGIN: AtomicU64 = AtomicU64::new(1);

impl Origin {
    /// Placeholder origin used for queries.
    pub const NONE: Origin = Origin(None);

    /// Allocate a fresh, process-unique origin.
    pub fn next() -> Self {
        Origin(Some(NEXT_ORIGIN.fetch_add(1, Ordering::Relaxed)))
    }

    pub fn id(self) -> Option<u64> {
        self.0
    }

    pub fn is_none(self) -> bool {
        self.0.is_none()
    }
}

// ---------------------------------------------------------------------------
// Trigger
// ---------------------------------------------------------------------------

/// What produced a snapshot: an on-demand query or a host event of kind `K`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger<K> {
    Query,
    Event(K),
}

impl<K: EventKind> Trigger<K> {
    /// Wire name: `"query"` or the event kind's host tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Query => "query",
            Trigger::Event(kind) => kind.tag(),
        }
    }

    pub fn kind(&self) -> Option<K> {
        match self {
            Trigger::Query => None,
            Trigger::Event(kind) => Some(*kind),
        }
    }
}

impl<K: EventKind> fmt::Display for Trigger<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<K: EventKind> Serialize for Trigger<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// BridgeOptions
// ---------------------------------------------------------------------------

/// Default deadline for host object acquisition.
pub const DEFAULT_ACQUIRE_TIMEOUT_MS: u64 = 5_000;

/// Longest accepted deadline. Browser timers hold their delay in an `i32`
/// and fire immediately on anything larger.
pub const MAX_ACQUIRE_TIMEOUT_MS: u64 = i32::MAX as u64;

/// Bridge configuration. Every field has a default, so `{}` is a valid
/// options object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BridgeOptions {
    /// How long `init()` waits for the host to hand over its object.
    pub acquire_timeout_ms: u64,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            acquire_timeout_ms: DEFAULT_ACQUIRE_TIMEOUT_MS,
        }
    }
}

impl BridgeOptions {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.acquire_timeout_ms == 0 {
            return Err(BridgeError::InvalidOptions(
                "acquireTimeoutMs must be greater than zero".to_string(),
            ));
        }
        if self.acquire_timeout_ms > MAX_ACQUIRE_TIMEOUT_MS {
            return Err(BridgeError::InvalidOptions(format!(
                "acquireTimeoutMs must be at most {MAX_ACQUIRE_TIMEOUT_MS}, got {}",
                self.acquire_timeout_ms
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Delivery diagnostics
// ---------------------------------------------------------------------------

/// Why a host firing did not end up on the delivery channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The host invoked the callback with no arguments.
    Malformed,
    /// A bounded channel was full.
    Overflow,
    /// The receiving end of the channel was gone.
    Disconnected,
    /// The host object was released before the callback ran.
    Detached,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DropReason::Malformed => "malformed",
            DropReason::Overflow => "overflow",
            DropReason::Disconnected => "disconnected",
            DropReason::Detached => "detached",
        })
    }
}

/// Lock-free counters shared between a bridge and the callbacks it registers.
#[derive(Debug, Default)]
pub struct BridgeStats {
    delivered: AtomicU64,
    malformed: AtomicU64,
    overflow: AtomicU64,
    disconnected: AtomicU64,
    detached: AtomicU64,
}

impl BridgeStats {
    pub fn record_delivered(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self, reason: DropReason) {
        let counter = match reason {
            DropReason::Malformed => &self.malformed,
            DropReason::Overflow => &self.overflow,
            DropReason::Disconnected => &self.disconnected,
            DropReason::Detached => &self.detached,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            delivered: self.delivered.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
            overflow: self.overflow.load(Ordering::Relaxed),
            disconnected: self.disconnected.load(Ordering::Relaxed),
            detached: self.detached.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`BridgeStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub delivered: u64,
    pub malformed: u64,
    pub overflow: u64,
    pub disconnected: u64,
    pub detached: u64,
}

impl StatsSnapshot {
    pub fn dropped(&self) -> u64 {
        self.malformed + self.overflow + self.disconnected + self.detached
    }
}
