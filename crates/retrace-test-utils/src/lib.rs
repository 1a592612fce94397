//! Test utilities and mock types for Retrace development.
//!
//! Provides a [`ScriptedSimulation`] whose random consumption varies per
//! tick (so tape replay is actually exercised), plus fakes for every
//! host seam the replay engine talks to: [`FakeCanvas`],
//! [`FakeRecorderFactory`], [`RecordingHost`] and
//! [`RecordingStatusSink`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod capture;
mod fixtures;
mod host;
mod sim;

pub use capture::{FakeCanvas, FakeRecorderFactory, RecorderStats};
pub use fixtures::{drive_live_run, scripted_input};
pub use host::{HostCall, RecordingHost, RecordingStatusSink, SettableInput};
pub use sim::{ScriptedSimulation, SimState, TraceEntry};
