//! Error types for sequencer configuration
//!
//! Sequencing itself never fails: bad ids are rejected with `false`. Errors
//! only surface when a configuration cannot describe a usable ring.

use thiserror::Error;

/// Reasons a [`SequencerConfig`](crate::config::SequencerConfig) is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A ring needs at least one position past 0 to detect anything
    #[error("ring capacity must be positive")]
    ZeroCapacity,

    /// Capacity would allocate more slots than allowed
    #[error("ring capacity {capacity} exceeds the maximum of {max}")]
    CapacityTooLarge {
        /// Requested capacity
        capacity: u64,
        /// Largest accepted capacity
        max: u64,
    },

    /// Initial cursor points past the last ring position
    #[error("initial cursor {cursor} is outside the ring (capacity {capacity})")]
    CursorOutOfRange {
        /// Requested cursor
        cursor: i64,
        /// Ring capacity
        capacity: u64,
    },

    /// Log level is not one tracing understands
    #[error("invalid log level '{0}', must be one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}
