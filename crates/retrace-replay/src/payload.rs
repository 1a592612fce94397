//! Upload and download shapes for recorded runs.
//!
//! [`build_payload`] turns a sealed run into a bounded, sanitized
//! [`ReplayPayload`] suitable for sending to a leaderboard service.
//! [`hydrate_payload`] does the reverse for a payload received from one,
//! producing a sealed [`ReplayRun`] ready for playback. Both enforce the
//! same [`ReplayLimits`] and replace non-finite numbers with zero.

use retrace_core::{lenient, Action, Cursor, Movement};
use retrace_rand::Tape;
use serde::{Deserialize, Serialize};

use crate::error::PayloadError;
use crate::run::{ReplayRun, TickRecord};

/// Payload format version written by [`build_payload`].
pub const PAYLOAD_VERSION: u32 = 1;

/// Simulation rate assumed when deriving a payload's duration.
pub const TICKS_PER_SECOND: f64 = 120.0;

/// Size caps applied to uploaded and downloaded runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReplayLimits {
    /// Ticks kept; later ticks are dropped. Default: 120 000.
    pub max_ticks: usize,
    /// Actions kept per tick. Default: 8.
    pub max_actions_per_tick: usize,
    /// Tape values kept. Default: 240 000.
    pub max_rng_tape: usize,
}

impl Default for ReplayLimits {
    fn default() -> Self {
        Self {
            max_ticks: 120_000,
            max_actions_per_tick: 8,
            max_rng_tape: 240_000,
        }
    }
}

/// Summary numbers for display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplayMeta {
    /// Recorded ticks.
    pub tick_count: usize,
    /// Recorded actions.
    pub action_count: usize,
    /// Run length in milliseconds.
    pub duration_ms: u64,
}

/// A sanitized run plus summary metadata, in the wire shape.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReplayPayload {
    /// Format version.
    #[serde(deserialize_with = "lenient::unsigned")]
    pub version: u32,
    /// Seed string.
    pub seed: String,
    /// Random tape.
    #[serde(deserialize_with = "lenient::f64_vec")]
    pub rng_tape: Vec<f64>,
    /// Per-tick input.
    pub ticks: Vec<TickRecord>,
    /// `ticks.len()` at build time.
    #[serde(deserialize_with = "lenient::unsigned")]
    pub tick_count: usize,
    /// Run length derived from the tick count.
    #[serde(deserialize_with = "lenient::unsigned")]
    pub duration_ms: u64,
    /// Total actions across all ticks.
    #[serde(deserialize_with = "lenient::unsigned")]
    pub action_count: usize,
    /// Final score. A fractional score is truncated on read.
    #[serde(deserialize_with = "lenient::i64_truncated")]
    pub score: i64,
    /// Unix time in milliseconds when the payload was built.
    #[serde(deserialize_with = "lenient::unsigned")]
    pub recorded_at: u64,
    /// Always true for a built payload.
    #[serde(deserialize_with = "lenient::truthy")]
    pub ended: bool,
}

impl ReplayPayload {
    /// Summary for [`describe_replay_meta`].
    ///
    /// Falls back to values derived from the ticks when the payload
    /// omits its counters.
    pub fn meta(&self) -> ReplayMeta {
        let tick_count = if self.tick_count > 0 {
            self.tick_count
        } else {
            self.ticks.len()
        };
        let duration_ms = if self.duration_ms > 0 {
            self.duration_ms
        } else {
            duration_for_ticks(tick_count)
        };
        ReplayMeta {
            tick_count,
            action_count: self.action_count,
            duration_ms,
        }
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, PayloadError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Build an upload payload from a sealed run.
///
/// Returns `None` unless the run is ended with a non-empty seed, ticks
/// and tape (after truncation to `limits`). Actions with empty ids are
/// dropped after the per-tick cap is applied.
pub fn build_payload(
    run: &ReplayRun,
    score: i64,
    recorded_at_ms: u64,
    limits: &ReplayLimits,
) -> Option<ReplayPayload> {
    if !run.ended || run.seed.is_empty() || run.ticks.is_empty() || run.rng_tape.is_empty() {
        return None;
    }
    let ticks = sanitize_ticks(&run.ticks, limits);
    let rng_tape = sanitize_tape(&run.rng_tape.to_vec(), limits);
    if ticks.is_empty() || rng_tape.is_empty() {
        return None;
    }

    let action_count = ticks.iter().map(|t| t.actions.len()).sum();
    Some(ReplayPayload {
        version: PAYLOAD_VERSION,
        seed: run.seed.clone(),
        rng_tape,
        tick_count: ticks.len(),
        duration_ms: duration_for_ticks(ticks.len()),
        ticks,
        action_count,
        score,
        recorded_at: recorded_at_ms,
        ended: true,
    })
}

/// Rebuild a sealed, playable run from a received payload.
///
/// Returns `None` unless the payload has a non-blank seed, ticks and
/// tape (after truncation to `limits`).
pub fn hydrate_payload(payload: &ReplayPayload, limits: &ReplayLimits) -> Option<ReplayRun> {
    let seed = payload.seed.trim();
    let ticks = sanitize_ticks(&payload.ticks, limits);
    let tape = sanitize_tape(&payload.rng_tape, limits);
    if seed.is_empty() || ticks.is_empty() || tape.is_empty() {
        return None;
    }

    let mut run = ReplayRun {
        seed: seed.to_owned(),
        ticks,
        rng_tape: Tape::from_values(tape),
        pending_actions: Vec::new(),
        ended: false,
    };
    run.seal();
    Some(run)
}

/// `"Ns"` below a minute, `"Mm SSs"` from a minute up.
pub fn format_duration_ms(ms: u64) -> String {
    let total = ms / 1000;
    let (minutes, seconds) = (total / 60, total % 60);
    if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}

/// One-line summary, e.g. `"Replay: 1m 05s • 7800 ticks • 12 inputs"`.
pub fn describe_replay_meta(meta: Option<&ReplayMeta>, has_replay: bool) -> String {
    let Some(meta) = meta.filter(|_| has_replay) else {
        return "Replay not captured yet.".to_owned();
    };
    let mut parts = vec![format_duration_ms(meta.duration_ms)];
    if meta.tick_count > 0 {
        parts.push(format!("{} ticks", meta.tick_count));
    }
    if meta.action_count > 0 {
        parts.push(format!("{} inputs", meta.action_count));
    }
    format!("Replay: {}", parts.join(" \u{2022} "))
}

fn duration_for_ticks(ticks: usize) -> u64 {
    (ticks as f64 * (1000.0 / TICKS_PER_SECOND)).round() as u64
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

fn sanitize_cursor(c: Cursor) -> Cursor {
    Cursor {
        x: finite_or_zero(c.x),
        y: finite_or_zero(c.y),
        has: c.has,
    }
}

fn sanitize_ticks(ticks: &[TickRecord], limits: &ReplayLimits) -> Vec<TickRecord> {
    ticks
        .iter()
        .take(limits.max_ticks)
        .map(|tick| TickRecord {
            movement: Movement::new(
                finite_or_zero(tick.movement.dx),
                finite_or_zero(tick.movement.dy),
            ),
            cursor: sanitize_cursor(tick.cursor),
            actions: tick
                .actions
                .iter()
                .take(limits.max_actions_per_tick)
                .filter(|a| !a.id.is_empty())
                .map(|a| Action {
                    id: a.id.clone(),
                    cursor: a.cursor.map(sanitize_cursor),
                })
                .collect(),
        })
        .collect()
}

fn sanitize_tape(tape: &[f64], limits: &ReplayLimits) -> Vec<f64> {
    tape.iter()
        .take(limits.max_rng_tape)
        .copied()
        .map(finite_or_zero)
        .collect()
}
