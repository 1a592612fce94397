//! Bounded, time-sorted snapshot storage with clamped sampling.

use std::collections::VecDeque;

use tracing::trace;

use crate::config::{SyncConfig, DEFAULT_MAX_SIZE};
use crate::error::{ConfigError, SyncError};
use crate::interpolate::Interpolate;

/// A snapshot tagged with the time it describes.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotEntry<T> {
    /// Time the snapshot describes. Always finite.
    pub time: f64,
    /// The snapshot payload.
    pub snapshot: T,
}

/// A bounded window of snapshots kept in ascending time order.
///
/// Insertion tolerates out-of-order arrival. When the buffer overflows,
/// the entries with the smallest times are evicted, regardless of when
/// they arrived. Entries with equal times keep their arrival order, and
/// sampling at that time yields the latest arrival.
///
/// # Examples
///
/// ```
/// use retrace_sync::{Linear, SnapshotBuffer};
///
/// let mut buf = SnapshotBuffer::new(4).unwrap();
/// buf.add(2.0, 20.0_f64).unwrap();
/// buf.add(1.0, 10.0).unwrap(); // late arrival, sorted into place
///
/// assert_eq!(buf.sample(1.5).unwrap(), Some(10.0)); // hold last
/// assert_eq!(buf.sample_with(1.5, &Linear).unwrap(), Some(15.0));
/// assert_eq!(buf.sample(9.0).unwrap(), Some(20.0)); // clamped
/// ```
#[derive(Clone, Debug)]
pub struct SnapshotBuffer<T> {
    entries: VecDeque<SnapshotEntry<T>>,
    max_size: usize,
}

impl<T: Clone> SnapshotBuffer<T> {
    /// Create an empty buffer holding at most `max_size` snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMaxSize`] if `max_size` is zero.
    pub fn new(max_size: usize) -> Result<Self, ConfigError> {
        Self::from_config(&SyncConfig { max_size })
    }

    /// Create an empty buffer from a validated config.
    pub fn from_config(config: &SyncConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            entries: VecDeque::with_capacity(config.max_size.min(DEFAULT_MAX_SIZE)),
            max_size: config.max_size,
        })
    }

    /// Insert `snapshot` at `time`, then evict down to capacity.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NonFiniteTime`] if `time` is NaN or infinite;
    /// the buffer is left unchanged.
    pub fn add(&mut self, time: f64, snapshot: T) -> Result<(), SyncError> {
        if !time.is_finite() {
            return Err(SyncError::NonFiniteTime { time });
        }
        // First index whose time is strictly greater: equal times stay in
        // arrival order.
        let at = self.entries.partition_point(|e| e.time <= time);
        self.entries.insert(at, SnapshotEntry { time, snapshot });

        let excess = self.entries.len().saturating_sub(self.max_size);
        if excess > 0 {
            self.entries.drain(..excess);
            trace!(evicted = excess, retained = self.entries.len(), "snapshot buffer evicted");
        }
        Ok(())
    }

    /// Sample the state at `time`, holding the earlier snapshot between
    /// stored times.
    ///
    /// Returns `Ok(None)` only when the buffer is empty.
    pub fn sample(&self, time: f64) -> Result<Option<T>, SyncError> {
        self.sample_inner(time, None::<&fn(&T, &T, f64) -> T>)
    }

    /// Sample the state at `time`, blending the bracketing snapshots with
    /// `interp`.
    ///
    /// Outside the stored range the nearest endpoint is returned as-is;
    /// an exact time match is returned without calling `interp`.
    pub fn sample_with<I>(&self, time: f64, interp: &I) -> Result<Option<T>, SyncError>
    where
        I: Interpolate<T> + ?Sized,
    {
        self.sample_inner(time, Some(interp))
    }

    pub(crate) fn sample_inner<I>(
        &self,
        time: f64,
        interp: Option<&I>,
    ) -> Result<Option<T>, SyncError>
    where
        I: Interpolate<T> + ?Sized,
    {
        if !time.is_finite() {
            return Err(SyncError::NonFiniteTime { time });
        }
        if self.entries.is_empty() {
            return Ok(None);
        }

        // First index whose time is strictly greater, so `idx - 1` is the
        // latest arrival at or before `time`.
        let idx = self.entries.partition_point(|e| e.time <= time);
        if idx == 0 {
            // Below the range: clamp to the earliest time, latest arrival.
            let earliest = self.entries[0].time;
            let end = self.entries.partition_point(|e| e.time <= earliest);
            return Ok(Some(self.entries[end - 1].snapshot.clone()));
        }
        let before = &self.entries[idx - 1];
        if before.time == time || idx == self.entries.len() {
            return Ok(Some(before.snapshot.clone()));
        }
        let after = &self.entries[idx];

        let value = match interp {
            Some(interp) => {
                let t = (time - before.time) / (after.time - before.time);
                interp.interpolate(&before.snapshot, &after.snapshot, t)
            }
            None => before.snapshot.clone(),
        };
        Ok(Some(value))
    }

    /// The entry with the largest time.
    pub fn latest(&self) -> Option<&SnapshotEntry<T>> {
        self.entries.back()
    }

    /// The entry with the smallest time.
    pub fn earliest(&self) -> Option<&SnapshotEntry<T>> {
        self.entries.front()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are retained.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained entries.
    pub fn capacity(&self) -> usize {
        self.max_size
    }

    /// Retained entries in ascending time order.
    pub fn iter(&self) -> impl Iterator<Item = &SnapshotEntry<T>> {
        self.entries.iter()
    }
}

impl<T: Clone> Default for SnapshotBuffer<T> {
    /// An empty buffer with the default capacity of 120.
    fn default() -> Self {
        Self {
            entries: VecDeque::with_capacity(DEFAULT_MAX_SIZE),
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}
