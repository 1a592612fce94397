//! Fixed-step simulation loop for Retrace.
//!
//! Converts variable-length host frame callbacks (timestamps in
//! milliseconds, as delivered by an animation-frame scheduler) into a
//! whole number of fixed-size simulation ticks. Frame timing never leaks
//! into the simulation: every tick sees exactly `sim_dt`, which is what
//! makes a recorded run replayable tick for tick.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod fixed_step;

pub use config::{ConfigError, LoopConfig, DEFAULT_MAX_FRAME, DEFAULT_SIM_DT};
pub use fixed_step::{FixedStepLoop, FnTickHandler, FrameReport, TickFlow, TickHandler};
