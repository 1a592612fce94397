//! Benchmark profiles and utilities for the Retrace replay framework.
//!
//! - [`reference_run`]: a sealed run with a seeded tape, sized per call
//! - [`TapeDrawSim`]: a simulation that consumes a fixed number of random
//!   values per tick, so playback cost is dominated by the replay machinery

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use retrace_core::{
    Action, Cursor, InputSnapshot, InputSource, Movement, Simulation, SimulationError,
};
use retrace_rand::{RandSlot, SeededRand};
use retrace_replay::{ReplayInput, ReplayRun, TickRecord};

/// Build a sealed run of `ticks` ticks with `draws_per_tick` tape values
/// per tick. Every eighth tick carries an aimed `"fire"` action.
pub fn reference_run(seed: &str, ticks: usize, draws_per_tick: usize) -> ReplayRun {
    let mut run = ReplayRun::new(seed);
    let mut rng = SeededRand::new(seed);
    for i in 0..ticks {
        let snapshot = InputSnapshot::new(
            Movement::new((i % 3) as f64 - 1.0, 0.0),
            Cursor::at(i as f64, 0.0),
        );
        let actions = if i % 8 == 0 {
            vec![Action::with_cursor("fire", Cursor::at(i as f64, 1.0))]
        } else {
            Vec::new()
        };
        run.ticks.push(TickRecord::new(snapshot, actions));
        for _ in 0..draws_per_tick {
            run.rng_tape.push(rng.draw());
        }
    }
    run.seal();
    run
}

/// Draws `draws_per_tick` values per update and folds them into `acc`.
pub struct TapeDrawSim {
    rand: RandSlot,
    input: Box<dyn InputSource>,
    draws_per_tick: usize,
    /// Running sum of input and draws.
    pub acc: f64,
}

impl TapeDrawSim {
    /// A simulation drawing from `rand`.
    pub fn new(rand: RandSlot, draws_per_tick: usize) -> Self {
        Self {
            rand,
            input: Box::new(ReplayInput::new()),
            draws_per_tick,
            acc: 0.0,
        }
    }
}

impl Simulation for TapeDrawSim {
    fn start_run(&mut self) -> Result<(), SimulationError> {
        self.acc = 0.0;
        Ok(())
    }

    fn update(&mut self, dt: f64) -> Result<(), SimulationError> {
        self.acc += self.input.movement().dx * dt;
        for _ in 0..self.draws_per_tick {
            self.acc += self.rand.next_f64()?;
        }
        Ok(())
    }

    fn render(&mut self) -> Result<(), SimulationError> {
        Ok(())
    }

    fn is_over(&self) -> bool {
        false
    }

    fn swap_input(&mut self, input: Box<dyn InputSource>) -> Box<dyn InputSource> {
        std::mem::replace(&mut self.input, input)
    }
}
