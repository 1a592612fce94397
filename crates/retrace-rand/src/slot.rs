//! The swappable active random source.
//!
//! A simulation holds a [`RandSlot`] and draws every random value
//! through it. The replay engine swaps the occupant (recorder while
//! live, tape player during playback) without the simulation noticing.
//! Exactly one source occupies a slot at any time.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use retrace_core::{RandError, RandomSource};
use tracing::trace;

use crate::seeded::{EntropyRand, SeededRand};

/// Shared handle to the active [`RandomSource`].
///
/// Cloning the handle shares the slot; it does not copy the source.
#[derive(Clone)]
pub struct RandSlot {
    active: Arc<Mutex<Box<dyn RandomSource>>>,
}

impl RandSlot {
    /// A slot initially holding `source`.
    pub fn new(source: impl RandomSource + 'static) -> Self {
        Self::from_boxed(Box::new(source))
    }

    /// A slot initially holding a boxed source.
    pub fn from_boxed(source: Box<dyn RandomSource>) -> Self {
        Self {
            active: Arc::new(Mutex::new(source)),
        }
    }

    /// A slot holding a [`SeededRand`] for `seed`.
    pub fn seeded(seed: &str) -> Self {
        Self::new(SeededRand::new(seed))
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn RandomSource>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Draw from the active source.
    pub fn next_f64(&self) -> Result<f64, RandError> {
        self.lock().next_f64()
    }

    /// Ranged draw from the active source; see [`RandomSource::range_f64`].
    pub fn range_f64(&self, min: f64, max: f64) -> Result<f64, RandError> {
        self.lock().range_f64(min, max)
    }

    /// Ranged draw from the active source; see [`RandomSource::range_int`].
    pub fn range_int(&self, min: i64, max: i64) -> Result<i64, RandError> {
        self.lock().range_int(min, max)
    }

    /// Put `source` in the slot and return the previous occupant.
    pub fn replace(&self, source: Box<dyn RandomSource>) -> Box<dyn RandomSource> {
        std::mem::replace(&mut *self.lock(), source)
    }

    /// Put `source` in the slot, dropping the previous occupant.
    pub fn set(&self, source: impl RandomSource + 'static) {
        drop(self.replace(Box::new(source)));
    }

    /// Occupy the slot with `source` until the returned guard drops.
    ///
    /// The guard restores the previous source on every exit path,
    /// including early `?` returns and unwinding.
    #[must_use = "dropping the guard immediately restores the previous source"]
    pub fn install(&self, source: Box<dyn RandomSource>) -> SlotGuard {
        trace!("installing scoped random source");
        let previous = self.replace(source);
        SlotGuard {
            slot: self.clone(),
            previous: Some(previous),
        }
    }

    /// Whether `other` is a handle to the same slot.
    pub fn ptr_eq(&self, other: &RandSlot) -> bool {
        Arc::ptr_eq(&self.active, &other.active)
    }
}

impl Default for RandSlot {
    /// A slot holding an [`EntropyRand`].
    fn default() -> Self {
        Self::new(EntropyRand::new())
    }
}

impl fmt::Debug for RandSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandSlot")
            .field("handles", &Arc::strong_count(&self.active))
            .finish_non_exhaustive()
    }
}

/// Restores a slot's previous source when dropped.
///
/// Returned by [`RandSlot::install`].
pub struct SlotGuard {
    slot: RandSlot,
    previous: Option<Box<dyn RandomSource>>,
}

impl SlotGuard {
    /// Restore the previous source now.
    pub fn restore(mut self) {
        self.put_back();
    }

    fn put_back(&mut self) {
        if let Some(previous) = self.previous.take() {
            drop(self.slot.replace(previous));
            trace!("restored previous random source");
        }
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.put_back();
    }
}

impl fmt::Debug for SlotGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotGuard")
            .field("armed", &self.previous.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tape::TapePlayer;

    #[test]
    fn handles_share_one_source() {
        let slot = RandSlot::seeded("shared");
        let other = slot.clone();
        let mut reference = SeededRand::new("shared");
        assert_eq!(slot.next_f64().unwrap(), reference.draw());
        // The clone continues the same sequence rather than restarting it.
        assert_eq!(other.next_f64().unwrap(), reference.draw());
        assert!(slot.ptr_eq(&other));
    }

    #[test]
    fn guard_restores_on_drop() {
        let slot = RandSlot::new(TapePlayer::new(vec![0.9]));
        {
            let _guard = slot.install(Box::new(TapePlayer::new(vec![0.1])));
            assert_eq!(slot.next_f64().unwrap(), 0.1);
        }
        assert_eq!(slot.next_f64().unwrap(), 0.9);
    }

    #[test]
    fn guard_restores_on_error_path() {
        fn drain(slot: &RandSlot) -> Result<(), RandError> {
            let _guard = slot.install(Box::new(TapePlayer::new(Vec::new())));
            slot.next_f64()?;
            Ok(())
        }

        let slot = RandSlot::new(TapePlayer::new(vec![0.4]));
        assert_eq!(drain(&slot), Err(RandError::Underrun { consumed: 0 }));
        assert_eq!(slot.next_f64().unwrap(), 0.4);
    }

    #[test]
    fn explicit_restore() {
        let slot = RandSlot::new(TapePlayer::new(vec![0.3]));
        let guard = slot.install(Box::new(TapePlayer::new(vec![0.7])));
        guard.restore();
        assert_eq!(slot.next_f64().unwrap(), 0.3);
    }

    #[test]
    fn replace_returns_previous_occupant() {
        let slot = RandSlot::new(TapePlayer::new(vec![0.6]));
        let mut previous = slot.replace(Box::new(TapePlayer::new(vec![0.2])));
        assert_eq!(previous.next_f64().unwrap(), 0.6);
        assert_eq!(slot.next_f64().unwrap(), 0.2);
    }
}
