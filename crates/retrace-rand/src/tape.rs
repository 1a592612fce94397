//! Random tapes: record every value a run consumed, then play them back.
//!
//! A seed alone cannot reproduce a run because the number of draws per
//! tick depends on state (spawns, collisions, skill rolls). The tape
//! captures the exact sequence handed out, so playback only has to
//! consume it in the same order.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use retrace_core::{RandError, RandomSource};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::seeded::SeededRand;

#[derive(Debug, Default)]
struct TapeState {
    values: Vec<f64>,
    sealed: bool,
}

/// An append-only list of drawn values with shared ownership.
///
/// [`share`](Tape::share) hands out another handle to the same storage
/// (this is how a [`TapeRecorder`] writes into a run's tape), while
/// [`Clone`] produces an independent deep copy. Once
/// [`seal`](Tape::seal)ed, appends are ignored.
///
/// Serializes as a plain array of numbers.
pub struct Tape {
    inner: Arc<Mutex<TapeState>>,
}

impl Tape {
    /// Create an empty, unsealed tape.
    pub fn new() -> Self {
        Self::from_values(Vec::new())
    }

    /// Create an unsealed tape holding `values`.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TapeState {
                values,
                sealed: false,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TapeState> {
        // A panic while holding the lock cannot leave the Vec half-written.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Another handle onto the same storage.
    pub fn share(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Whether `other` aliases the same storage.
    pub fn ptr_eq(&self, other: &Tape) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Append a value. Returns `false` (and drops the value) if sealed.
    pub fn push(&self, value: f64) -> bool {
        let mut state = self.lock();
        if state.sealed {
            return false;
        }
        state.values.push(value);
        true
    }

    /// Freeze the tape against further appends.
    pub fn seal(&self) {
        self.lock().sealed = true;
    }

    /// Whether the tape is frozen.
    pub fn is_sealed(&self) -> bool {
        self.lock().sealed
    }

    /// Number of recorded values.
    pub fn len(&self) -> usize {
        self.lock().values.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().values.is_empty()
    }

    /// Copy the recorded values out.
    pub fn to_vec(&self) -> Vec<f64> {
        self.lock().values.clone()
    }

    /// Keep only the first `len` values.
    pub fn truncate(&self, len: usize) {
        self.lock().values.truncate(len);
    }
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Tape {
    fn clone(&self) -> Self {
        let state = self.lock();
        Self {
            inner: Arc::new(Mutex::new(TapeState {
                values: state.values.clone(),
                sealed: state.sealed,
            })),
        }
    }
}

impl PartialEq for Tape {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let (a, b) = (self.to_vec(), other.to_vec());
        a.len() == b.len() && a.iter().zip(&b).all(|(x, y)| x.to_bits() == y.to_bits())
    }
}

impl fmt::Debug for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Tape")
            .field("len", &state.values.len())
            .field("sealed", &state.sealed)
            .finish()
    }
}

impl From<Vec<f64>> for Tape {
    fn from(values: Vec<f64>) -> Self {
        Self::from_values(values)
    }
}

impl Serialize for Tape {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.lock().values.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Tape {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        retrace_core::lenient::f64_vec(deserializer).map(Self::from_values)
    }
}

/// A seeded source that appends every value it returns to a [`Tape`].
///
/// # Examples
///
/// ```
/// use retrace_rand::{RandomSource, Tape, TapePlayer, TapeRecorder};
///
/// let tape = Tape::new();
/// let mut recorder = TapeRecorder::new("seed-A", tape.share());
/// let drawn: Vec<f64> = (0..3).map(|_| recorder.next_f64().unwrap()).collect();
///
/// let mut player = TapePlayer::from_tape(&tape);
/// for v in drawn {
///     assert_eq!(player.next_f64().unwrap(), v);
/// }
/// assert!(player.next_f64().is_err());
/// ```
#[derive(Debug)]
pub struct TapeRecorder {
    rng: SeededRand,
    tape: Tape,
}

impl TapeRecorder {
    /// Record draws from a generator seeded with `seed` into `tape`.
    pub fn new(seed: &str, tape: Tape) -> Self {
        Self {
            rng: SeededRand::new(seed),
            tape,
        }
    }

    /// Handle onto the tape being written.
    pub fn tape(&self) -> &Tape {
        &self.tape
    }
}

impl RandomSource for TapeRecorder {
    fn next_f64(&mut self) -> Result<f64, RandError> {
        let value = self.rng.draw();
        self.tape.push(value);
        Ok(value)
    }
}

/// Replays recorded values in order.
///
/// Each call returns the next value; a call past the end fails with
/// [`RandError::Underrun`] and keeps failing.
#[derive(Clone, Debug)]
pub struct TapePlayer {
    values: Vec<f64>,
    pos: usize,
}

impl TapePlayer {
    /// Play back `values` from the start.
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            pos: 0,
        }
    }

    /// Play back a snapshot of `tape`'s current contents.
    pub fn from_tape(tape: &Tape) -> Self {
        Self::new(tape.to_vec())
    }

    /// Values consumed so far.
    pub fn consumed(&self) -> usize {
        self.pos
    }

    /// Values left before underrun.
    pub fn remaining(&self) -> usize {
        self.values.len() - self.pos
    }
}

impl RandomSource for TapePlayer {
    fn next_f64(&mut self) -> Result<f64, RandError> {
        let value = *self.values.get(self.pos).ok_or(RandError::Underrun {
            consumed: self.pos,
        })?;
        self.pos += 1;
        Ok(value)
    }
}
