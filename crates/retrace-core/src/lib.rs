//! Core types and traits for Retrace deterministic replay.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions shared across the Retrace workspace:
//! input snapshots and discrete actions, the random source contract,
//! the simulation contract driven by the replay engine, and the error
//! types that cross those seams.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod input;
pub mod lenient;
pub mod traits;

pub use error::{RandError, SimulationError};
pub use input::{Action, ActionList, Cursor, InputSnapshot, Movement};
pub use traits::{InputSource, RandomSource, Simulation};
