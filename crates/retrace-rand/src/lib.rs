//! Deterministic random sources for Retrace.
//!
//! Every source implements [`RandomSource`] from `retrace-core`:
//!
//! - [`SeededRand`]: pure function of its seed; the same seed always
//!   produces the same sequence.
//! - [`TapeRecorder`]: a seeded generator that appends every value it
//!   hands out to a shared [`Tape`].
//! - [`TapePlayer`]: replays a frozen tape value by value and fails with
//!   an underrun once it runs dry, which is how a diverged replay shows
//!   itself.
//! - [`EntropyRand`]: non-deterministic default for live play outside
//!   of recording.
//!
//! The active source for a simulation lives in a [`RandSlot`]. Swapping
//! sources through [`RandSlot::install`] returns a [`SlotGuard`] that
//! puts the previous source back when dropped.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod seed;
pub mod seeded;
pub mod slot;
pub mod tape;

pub use retrace_core::{RandError, RandomSource};
pub use seed::seed_from_str;
pub use seeded::{EntropyRand, SeededRand};
pub use slot::{RandSlot, SlotGuard};
pub use tape::{Tape, TapePlayer, TapeRecorder};
