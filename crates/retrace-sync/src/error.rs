//! Error types for snapshot buffering.

use thiserror::Error;

/// Invalid buffer configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Buffer capacity must be at least one entry.
    #[error("max_size must be greater than zero, got {value}")]
    InvalidMaxSize {
        /// The rejected capacity.
        value: usize,
    },
}

/// Errors from adding to or sampling a buffer.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SyncError {
    /// A snapshot time or sample time was NaN or infinite.
    #[error("snapshot time must be finite, got {time}")]
    NonFiniteTime {
        /// The rejected time.
        time: f64,
    },
}
