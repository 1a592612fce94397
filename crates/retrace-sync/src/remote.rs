//! A snapshot buffer bundled with a fixed interpolation policy.

use std::fmt;

use crate::buffer::{SnapshotBuffer, SnapshotEntry};
use crate::config::SyncConfig;
use crate::error::{ConfigError, SyncError};
use crate::interpolate::Interpolate;

/// Samples asynchronously arriving remote state for rendering.
///
/// The interpolation policy is chosen once at construction: either
/// hold-last-value ([`new`](Self::new)) or a supplied interpolator
/// ([`with_interpolation`](Self::with_interpolation)). Everything else
/// delegates to the underlying [`SnapshotBuffer`].
pub struct RemoteStateSync<T> {
    buffer: SnapshotBuffer<T>,
    interpolate: Option<Box<dyn Interpolate<T> + Send + Sync>>,
}

impl<T: Clone> RemoteStateSync<T> {
    /// A hold-last-value sync.
    pub fn new(config: &SyncConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            buffer: SnapshotBuffer::from_config(config)?,
            interpolate: None,
        })
    }

    /// A sync that blends between bracketing snapshots with `interp`.
    pub fn with_interpolation(
        config: &SyncConfig,
        interp: impl Interpolate<T> + Send + Sync + 'static,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            buffer: SnapshotBuffer::from_config(config)?,
            interpolate: Some(Box::new(interp)),
        })
    }

    /// Store a snapshot describing `time`.
    pub fn add_snapshot(&mut self, time: f64, snapshot: T) -> Result<(), SyncError> {
        self.buffer.add(time, snapshot)
    }

    /// Sample the state at `time` using the configured policy.
    pub fn sample(&self, time: f64) -> Result<Option<T>, SyncError> {
        self.buffer.sample_inner(time, self.interpolate.as_deref())
    }

    /// The most recent snapshot.
    pub fn latest(&self) -> Option<&SnapshotEntry<T>> {
        self.buffer.latest()
    }

    /// Drop all snapshots.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Number of retained snapshots.
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    /// Whether this sync interpolates (as opposed to holding last value).
    pub fn interpolates(&self) -> bool {
        self.interpolate.is_some()
    }
}

impl<T: fmt::Debug> fmt::Debug for RemoteStateSync<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteStateSync")
            .field("buffer", &self.buffer)
            .field("interpolates", &self.interpolate.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolate::Linear;

    #[test]
    fn hold_last_policy() {
        let mut sync = RemoteStateSync::new(&SyncConfig::default()).unwrap();
        sync.add_snapshot(0.0, 0.0_f64).unwrap();
        sync.add_snapshot(1.0, 1.0).unwrap();
        assert!(!sync.interpolates());
        assert_eq!(sync.sample(0.5), Ok(Some(0.0)));
    }

    #[test]
    fn interpolating_policy() {
        let mut sync = RemoteStateSync::with_interpolation(&SyncConfig::default(), Linear).unwrap();
        sync.add_snapshot(0.0, 0.0_f64).unwrap();
        sync.add_snapshot(1.0, 1.0).unwrap();
        assert_eq!(sync.sample(0.25), Ok(Some(0.25)));
    }

    #[test]
    fn closure_policy() {
        let mut sync = RemoteStateSync::with_interpolation(
            &SyncConfig { max_size: 2 },
            |a: &i64, b: &i64, t: f64| if t < 0.5 { *a } else { *b },
        )
        .unwrap();
        sync.add_snapshot(0.0, 10).unwrap();
        sync.add_snapshot(2.0, 20).unwrap();
        assert_eq!(sync.sample(1.5), Ok(Some(20)));
    }

    #[test]
    fn delegates_bookkeeping() {
        let mut sync = RemoteStateSync::new(&SyncConfig { max_size: 2 }).unwrap();
        for t in 0..5 {
            sync.add_snapshot(f64::from(t), t).unwrap();
        }
        assert_eq!(sync.size(), 2);
        assert_eq!(sync.latest().map(|e| e.snapshot), Some(4));
        sync.clear();
        assert_eq!(sync.size(), 0);
        assert_eq!(sync.sample(3.0), Ok(None));
    }

    #[test]
    fn rejects_zero_capacity() {
        assert!(RemoteStateSync::<f64>::new(&SyncConfig { max_size: 0 }).is_err());
    }
}
