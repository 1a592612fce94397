//! Recorded run data and its persisted JSON shape.

use retrace_core::{Action, ActionList, Cursor, InputSnapshot, Movement};
use retrace_rand::Tape;
use serde::{Deserialize, Serialize};

use crate::error::PayloadError;

/// Input captured for one simulation tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickRecord {
    /// Movement vector for the tick.
    #[serde(rename = "move")]
    pub movement: Movement,
    /// Pointer state for the tick.
    pub cursor: Cursor,
    /// Discrete actions dispatched before the tick's step, in order.
    pub actions: ActionList,
}

impl TickRecord {
    /// Build a record from a snapshot and the tick's actions.
    pub fn new(snapshot: InputSnapshot, actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            movement: snapshot.movement,
            cursor: snapshot.cursor,
            actions: actions.into_iter().collect(),
        }
    }
}

/// A recorded run: seed, per-tick input log and random tape.
///
/// Mutable only while `ended` is false. [`Clone`] is a deep copy,
/// including the tape, so a clone can be handed off safely before or
/// after the run is sealed.
///
/// Serializes to `{seed, ticks, rngTape, ended}`; pending actions are
/// runtime state and never persisted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReplayRun {
    /// Seed string the run's generator was built from.
    pub seed: String,
    /// One record per tick, in recorded order.
    pub ticks: Vec<TickRecord>,
    /// Every random value the simulation consumed, in order.
    pub rng_tape: Tape,
    /// Actions queued since the last recorded tick.
    #[serde(skip)]
    pub pending_actions: Vec<Action>,
    /// Whether the run has been sealed.
    pub ended: bool,
}

impl ReplayRun {
    /// An empty, open run for `seed`.
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            ..Self::default()
        }
    }

    /// Whether the run can be played back: sealed with at least one tick.
    pub fn has_replay_data(&self) -> bool {
        self.ended && !self.ticks.is_empty()
    }

    /// Number of recorded ticks.
    pub fn tick_count(&self) -> usize {
        self.ticks.len()
    }

    /// Total recorded actions across all ticks.
    pub fn action_count(&self) -> usize {
        self.ticks.iter().map(|t| t.actions.len()).sum()
    }

    /// Seal the run and its tape.
    pub fn seal(&mut self) {
        self.ended = true;
        self.rng_tape.seal();
    }

    /// Serialize to the persisted JSON shape.
    pub fn to_json(&self) -> Result<String, PayloadError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse the persisted JSON shape.
    ///
    /// An ended run comes back with its tape sealed.
    pub fn from_json(json: &str) -> Result<Self, PayloadError> {
        let run: Self = serde_json::from_str(json)?;
        if run.ended {
            run.rng_tape.seal();
        }
        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_run() -> ReplayRun {
        let mut run = ReplayRun::new("seed-A");
        run.ticks.push(TickRecord::new(
            InputSnapshot::new(Movement::new(1.0, 0.0), Cursor::at(4.0, 5.0)),
            [Action::new("jump")],
        ));
        run.ticks.push(TickRecord::default());
        run.rng_tape.push(0.125);
        run.rng_tape.push(0.1 + 0.2);
        run.seal();
        run
    }

    #[test]
    fn persisted_shape_uses_original_field_names() {
        let json = sample_run().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["seed"], "seed-A");
        assert_eq!(value["ended"], true);
        assert_eq!(value["ticks"][0]["move"]["dx"], 1.0);
        assert_eq!(value["ticks"][0]["cursor"]["has"], true);
        assert_eq!(value["ticks"][0]["actions"][0]["id"], "jump");
        assert!(value["rngTape"].is_array());
        assert!(value.get("pendingActions").is_none());
    }

    #[test]
    fn json_round_trip_preserves_tape_bits() {
        let run = sample_run();
        let back = ReplayRun::from_json(&run.to_json().unwrap()).unwrap();
        assert_eq!(back, run);
        assert!(back.rng_tape.is_sealed());
    }

    #[test]
    fn clone_is_deep() {
        let mut run = ReplayRun::new("s");
        run.rng_tape.push(0.5);
        let copy = run.clone();
        run.rng_tape.push(0.75);
        run.ticks.push(TickRecord::default());
        assert_eq!(copy.rng_tape.len(), 1);
        assert!(copy.ticks.is_empty());
    }

    #[test]
    fn replay_data_requires_seal_and_ticks() {
        let mut run = ReplayRun::new("s");
        assert!(!run.has_replay_data());
        run.ticks.push(TickRecord::default());
        assert!(!run.has_replay_data());
        run.seal();
        assert!(run.has_replay_data());
        assert!(!sample_run().rng_tape.push(0.9));
    }

    #[test]
    fn counts() {
        let run = sample_run();
        assert_eq!(run.tick_count(), 2);
        assert_eq!(run.action_count(), 1);
    }

    #[test]
    fn missing_fields_default() {
        let run = ReplayRun::from_json(r#"{"seed":"x","ticks":[{}]}"#).unwrap();
        assert_eq!(run.ticks[0], TickRecord::default());
        assert!(!run.ended);
        assert!(run.rng_tape.is_empty());
    }
}
