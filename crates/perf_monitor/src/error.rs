//! Error types for the monitor.
//!
//! Monitoring itself never fails: unmatched end calls, missing probe
//! capabilities, and panicking observers all degrade to defaults. The only
//! fallible surfaces are spawning a sampler thread and report export.

use thiserror::Error;

/// Errors that can occur around the monitor.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Failed to spawn a background sampler thread
    #[error("failed to spawn sampler thread: {0}")]
    Sampler(#[from] std::io::Error),

    /// Failed to serialize a report
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for monitor operations.
pub type MonitorResult<T> = Result<T, MonitorError>;
