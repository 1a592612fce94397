//! Integration test: a host loop built from the facade.
//!
//! The fixed-step loop drives a live recorded session until the
//! simulation ends, the run replays to the same terminal state, and the
//! resulting positions feed a remote-state interpolator.

use retrace::prelude::*;
use retrace::engine::DEFAULT_SIM_DT;
use retrace::sync::Linear;
use retrace_test_utils::{scripted_input, ScriptedSimulation, SettableInput};

const END_AFTER: usize = 50;

struct LiveSession<'a> {
    engine: &'a mut ReplayEngine,
    sim: &'a mut ScriptedSimulation,
    input: &'a SettableInput,
    tick: usize,
}

impl TickHandler for LiveSession<'_> {
    fn on_tick(&mut self, dt: f64) -> TickFlow {
        let (movement, cursor) = scripted_input(self.tick);
        self.input.set(movement, cursor);
        if self.tick % 4 == 0 {
            self.engine.queue_action(Action::with_cursor("boost", cursor));
        }

        let actions = self.engine.drain_pending_actions();
        for action in &actions {
            self.sim.handle_action(&action.id).unwrap();
        }
        self.engine.record_tick(self.input.snapshot(), actions);
        self.sim.update(dt).unwrap();
        self.tick += 1;

        if self.sim.is_over() {
            self.engine.mark_ended();
            TickFlow::Stop
        } else {
            TickFlow::Continue
        }
    }
}

/// Run the live loop at a ragged ~60 Hz until the simulation ends.
fn record_live(slot: &RandSlot) -> (ReplayEngine, ScriptedSimulation) {
    let mut engine = ReplayEngine::new(ReplayConfig::default(), slot.clone()).unwrap();
    let mut sim = ScriptedSimulation::new(slot.clone()).end_after(END_AFTER);
    let input = SettableInput::new();
    sim.set_input(input.clone());

    engine.start_recording("seed-live");
    sim.start_run().unwrap();

    let mut looper = FixedStepLoop::new(LoopConfig::new(DEFAULT_SIM_DT)).unwrap();
    let mut session = LiveSession {
        engine: &mut engine,
        sim: &mut sim,
        input: &input,
        tick: 0,
    };
    let mut now = 0.0;
    let mut stopped = false;
    for frame in 0..200 {
        now += if frame % 3 == 0 { 20.0 } else { 15.0 };
        if looper.advance(now, &mut session).stopped {
            stopped = true;
            break;
        }
    }
    assert!(stopped, "live session never ended");
    (engine, sim)
}

#[test]
fn loop_recorded_run_replays_to_terminal_state() {
    let slot = RandSlot::default();
    let (mut engine, sim) = record_live(&slot);
    let run = engine.active_run().unwrap();
    assert!(run.ended);
    assert_eq!(run.tick_count(), END_AFTER);

    let mut replay_sim = ScriptedSimulation::new(slot.clone()).end_after(END_AFTER);
    let report = engine
        .play(&mut replay_sim, PlayOptions::new())
        .unwrap()
        .unwrap();

    assert!(report.reached_terminal);
    assert_eq!(report.ticks_processed, END_AFTER);
    assert_eq!(replay_sim.trace, sim.trace);
}

#[test]
fn replayed_positions_interpolate() {
    let slot = RandSlot::default();
    let (_, sim) = record_live(&slot);

    let mut remote = RemoteStateSync::with_interpolation(&SyncConfig::default(), Linear).unwrap();
    // Delivered out of order, stamped every 10 ms.
    for entry in sim.trace.iter().rev() {
        remote
            .add_snapshot(entry.tick as f64 * 10.0, (entry.x, entry.y))
            .unwrap();
    }
    assert_eq!(remote.size(), END_AFTER);

    let a = &sim.trace[9];
    let b = &sim.trace[10];
    let (x, y) = remote.sample(105.0).unwrap().unwrap();
    assert!((x - (a.x + b.x) / 2.0).abs() < 1e-9);
    assert!((y - (a.y + b.y) / 2.0).abs() < 1e-9);

    // Past the newest snapshot: clamp to it.
    let last = sim.trace.last().unwrap();
    assert_eq!(remote.sample(1e9).unwrap(), Some((last.x, last.y)));
}
