//! A small deterministic simulation for exercising record and replay.

use retrace_core::{InputSource, Simulation, SimulationError};
use retrace_rand::RandSlot;

use crate::host::SettableInput;

/// Coarse lifecycle of a [`ScriptedSimulation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimState {
    Idle,
    Running,
    Over,
}

/// One logged update.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceEntry {
    pub tick: usize,
    pub x: f64,
    pub y: f64,
    pub draws: usize,
    pub energy: f64,
}

/// A toy world: a point moved by input, with random "energy" pickups.
///
/// Each update draws one value, then `floor(first * 3)` more, so the
/// number of draws per tick depends on the random state itself. A
/// re-seeded generator would only reproduce this by luck; a tape must be
/// consumed in exactly the same pattern.
pub struct ScriptedSimulation {
    rand: RandSlot,
    input: Box<dyn InputSource>,
    state: SimState,
    end_after: Option<usize>,
    fail_at: Option<usize>,
    pub x: f64,
    pub y: f64,
    pub energy: f64,
    pub tick: usize,
    pub trace: Vec<TraceEntry>,
    pub actions: Vec<String>,
    pub starts: usize,
    pub updates: usize,
    pub renders: usize,
}

impl ScriptedSimulation {
    pub fn new(rand: RandSlot) -> Self {
        Self {
            rand,
            input: Box::new(SettableInput::new()),
            state: SimState::Idle,
            end_after: None,
            fail_at: None,
            x: 0.0,
            y: 0.0,
            energy: 0.0,
            tick: 0,
            trace: Vec::new(),
            actions: Vec::new(),
            starts: 0,
            updates: 0,
            renders: 0,
        }
    }

    /// Reach the terminal state after `ticks` updates.
    pub fn end_after(mut self, ticks: usize) -> Self {
        self.end_after = Some(ticks);
        self
    }

    /// Fail the update that would make `tick` ticks.
    pub fn fail_at(mut self, tick: usize) -> Self {
        self.fail_at = Some(tick);
        self
    }

    /// Replace the input source directly (live play).
    pub fn set_input(&mut self, input: impl InputSource + 'static) {
        self.input = Box::new(input);
    }

    pub fn input(&self) -> &dyn InputSource {
        self.input.as_ref()
    }

    pub fn state(&self) -> SimState {
        self.state
    }
}

impl Simulation for ScriptedSimulation {
    fn start_run(&mut self) -> Result<(), SimulationError> {
        self.state = SimState::Running;
        self.x = 0.0;
        self.y = 0.0;
        self.energy = 0.0;
        self.tick = 0;
        self.trace.clear();
        self.actions.clear();
        self.starts += 1;
        Ok(())
    }

    fn handle_action(&mut self, id: &str) -> Result<(), SimulationError> {
        self.actions.push(id.to_owned());
        if id == "boost" {
            // Aimed boost: jump toward the cursor by a random fraction.
            let cursor = self.input.cursor();
            if cursor.has {
                let f = self.rand.next_f64()?;
                self.x += (cursor.x - self.x) * f;
                self.y += (cursor.y - self.y) * f;
            }
        }
        Ok(())
    }

    fn update(&mut self, dt: f64) -> Result<(), SimulationError> {
        if self.state == SimState::Over {
            return Ok(());
        }
        if self.fail_at == Some(self.tick + 1) {
            return Err(SimulationError::failed(format!("scripted failure at tick {}", self.tick + 1)));
        }

        let movement = self.input.movement();
        self.x += movement.dx * dt * 100.0;
        self.y += movement.dy * dt * 100.0;

        let first = self.rand.next_f64()?;
        let extra = (first * 3.0).floor() as usize;
        self.energy += first;
        for _ in 0..extra {
            self.energy += self.rand.range_f64(-0.5, 0.5)?;
        }

        self.tick += 1;
        self.updates += 1;
        self.trace.push(TraceEntry {
            tick: self.tick,
            x: self.x,
            y: self.y,
            draws: 1 + extra,
            energy: self.energy,
        });
        if self.end_after.is_some_and(|n| self.tick >= n) {
            self.state = SimState::Over;
        }
        Ok(())
    }

    fn render(&mut self) -> Result<(), SimulationError> {
        self.renders += 1;
        Ok(())
    }

    fn is_over(&self) -> bool {
        self.state == SimState::Over
    }

    fn swap_input(&mut self, input: Box<dyn InputSource>) -> Box<dyn InputSource> {
        std::mem::replace(&mut self.input, input)
    }
}
