//! Retrace: deterministic record and replay for fixed-step simulations.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Retrace sub-crates. Adding `retrace` as a single dependency is
//! enough for most hosts.
//!
//! # Quick start
//!
//! ```rust
//! use retrace::prelude::*;
//!
//! // A walker that drifts with its input plus a random jitter.
//! struct Walker {
//!     rand: RandSlot,
//!     input: Box<dyn InputSource>,
//!     x: f64,
//! }
//!
//! impl Simulation for Walker {
//!     fn start_run(&mut self) -> Result<(), SimulationError> {
//!         self.x = 0.0;
//!         Ok(())
//!     }
//!     fn update(&mut self, dt: f64) -> Result<(), SimulationError> {
//!         self.x += self.input.movement().dx * dt + self.rand.next_f64()?;
//!         Ok(())
//!     }
//!     fn render(&mut self) -> Result<(), SimulationError> { Ok(()) }
//!     fn is_over(&self) -> bool { false }
//!     fn swap_input(&mut self, input: Box<dyn InputSource>) -> Box<dyn InputSource> {
//!         std::mem::replace(&mut self.input, input)
//!     }
//! }
//!
//! let rand = RandSlot::default();
//! let live = ReplayInput::new();
//! let mut sim = Walker { rand: rand.clone(), input: Box::new(live.clone()), x: 0.0 };
//! let mut engine = ReplayEngine::new(ReplayConfig::default(), rand).unwrap();
//!
//! // Record ten live ticks.
//! engine.start_recording("seed-A");
//! sim.start_run().unwrap();
//! for _ in 0..10 {
//!     live.set(Movement::new(1.0, 0.0), Cursor::default());
//!     let actions = engine.drain_pending_actions();
//!     engine.record_tick(live.snapshot(), actions);
//!     sim.update(engine.config().sim_dt).unwrap();
//! }
//! let live_x = sim.x;
//! engine.mark_ended();
//!
//! // Play them back: same input, same random draws, same result.
//! let report = engine.play(&mut sim, PlayOptions::new()).unwrap().unwrap();
//! assert_eq!(report.ticks_processed, 10);
//! assert_eq!(sim.x, live_x);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `retrace-core` | Input types, errors, simulation and random traits |
//! | [`random`] | `retrace-rand` | Seeded generators, tapes, the shared random slot |
//! | [`engine`] | `retrace-engine` | Accumulator-based fixed-step loop |
//! | [`sync`] | `retrace-sync` | Timestamped snapshot buffer and interpolation |
//! | [`replay`] | `retrace-replay` | Recording, playback, capture and payloads |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and traits (`retrace-core`).
///
/// Per-tick input ([`types::Movement`], [`types::Cursor`],
/// [`types::Action`]) and the seams a host implements
/// ([`types::Simulation`], [`types::InputSource`],
/// [`types::RandomSource`]).
pub use retrace_core as types;

/// Deterministic randomness (`retrace-rand`).
///
/// [`random::RandSlot`] is the shared handle a simulation draws from;
/// the replay engine swaps [`random::TapeRecorder`] and
/// [`random::TapePlayer`] into it.
pub use retrace_rand as random;

/// Fixed-step simulation loop (`retrace-engine`).
pub use retrace_engine as engine;

/// Remote state interpolation (`retrace-sync`).
///
/// [`sync::RemoteStateSync`] buffers timestamped snapshots and samples
/// them at arbitrary render times.
pub use retrace_sync as sync;

/// Recording and deterministic playback (`retrace-replay`).
pub use retrace_replay as replay;

/// Common imports for typical Retrace usage.
///
/// ```rust
/// use retrace::prelude::*;
/// ```
///
/// Configuration error types are left out since each sub-crate has its
/// own; reach them through the module paths.
pub mod prelude {
    // Core types and traits
    pub use retrace_core::{
        Action, Cursor, InputSnapshot, InputSource, Movement, RandError, RandomSource, Simulation,
        SimulationError,
    };

    // Randomness
    pub use retrace_rand::{RandSlot, SeededRand, Tape};

    // Loop
    pub use retrace_engine::{FixedStepLoop, LoopConfig, TickFlow, TickHandler};

    // Sync
    pub use retrace_sync::{Interpolate, Lerp, RemoteStateSync, SnapshotBuffer, SyncConfig};

    // Replay
    pub use retrace_replay::{
        CaptureMode, PlayOptions, PlaybackReport, RenderMode, ReplayConfig, ReplayEngine,
        ReplayError, ReplayHost, ReplayInput, ReplayRun, StatusMessage, StatusSink,
    };
}
