use std::time::Duration;

use thiserror::Error;

// ---------------------------------------------------------------------------
// BridgeError: top-level rollup
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Bridge not initialized. Call init() first.")]
    NotInitialized,

    #[error("Host object acquisition timed out after {}ms", .timeout.as_millis())]
    AcquisitionTimeout { timeout: Duration },

    #[error("Host object acquisition failed: {0}")]
    AcquisitionFailed(String),

    #[error("Invalid bridge options: {0}")]
    InvalidOptions(String),
}

/// Convenience alias: the default error type is `BridgeError`.
pub type Result<T, E = BridgeError> = std::result::Result<T, E>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
