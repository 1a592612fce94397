//! Sync configuration.

use serde::Deserialize;

use crate::error::ConfigError;

/// Default number of snapshots a buffer retains.
pub const DEFAULT_MAX_SIZE: usize = 120;

/// Configuration for a [`SnapshotBuffer`](crate::SnapshotBuffer) or
/// [`RemoteStateSync`](crate::RemoteStateSync).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Maximum retained snapshots. Must be positive. Default: 120.
    pub max_size: usize,
}

impl SyncConfig {
    /// Validate all invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_size == 0 {
            return Err(ConfigError::InvalidMaxSize {
                value: self.max_size,
            });
        }
        Ok(())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}
