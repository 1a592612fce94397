//! Scripted live sessions.

use retrace_core::{Action, Cursor, InputSource, Movement, Simulation, SimulationError};
use retrace_replay::ReplayEngine;

use crate::host::SettableInput;
use crate::sim::ScriptedSimulation;

/// Deterministic live input for tick `i`.
pub fn scripted_input(i: usize) -> (Movement, Cursor) {
    let dx = ((i % 7) as f64 - 3.0) / 3.0;
    let dy = ((i % 5) as f64 - 2.0) / 2.0;
    (Movement::new(dx, dy), Cursor::at(i as f64 * 3.0, 100.0 - i as f64))
}

/// Play `ticks` live ticks of `sim` while `engine` records them.
///
/// Mirrors a host loop: set the live input, dispatch queued actions,
/// record the tick, then step. Every fourth tick fires an aimed
/// `"boost"` and every sixth a plain `"shield"`. Stops early if the
/// simulation ends. The caller starts recording; this starts the run.
pub fn drive_live_run(
    engine: &mut ReplayEngine,
    sim: &mut ScriptedSimulation,
    input: &SettableInput,
    ticks: usize,
) -> Result<(), SimulationError> {
    let dt = engine.config().sim_dt;
    sim.set_input(input.clone());
    sim.start_run()?;
    for i in 0..ticks {
        let (movement, cursor) = scripted_input(i);
        input.set(movement, cursor);
        if i % 4 == 0 {
            engine.queue_action(Action::with_cursor("boost", cursor));
        }
        if i % 6 == 0 {
            engine.queue_action(Action::new("shield"));
        }

        let actions = engine.drain_pending_actions();
        for action in &actions {
            sim.handle_action(&action.id)?;
        }
        engine.record_tick(input.snapshot(), actions);
        sim.update(dt)?;
        if sim.is_over() {
            break;
        }
    }
    Ok(())
}
