//! Error types for recording, playback, capture and payload handling.

use retrace_core::{RandError, SimulationError};
use thiserror::Error;

/// Invalid [`ReplayConfig`](crate::ReplayConfig) values.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// `sim_dt` is NaN, infinite, zero, or negative.
    #[error("sim_dt must be finite and positive, got {value}")]
    InvalidSimDt {
        /// The rejected value.
        value: f64,
    },
    /// `render_fps` is zero.
    #[error("render_fps must be positive")]
    InvalidRenderFps,
    /// `capture_fps` is zero.
    #[error("capture_fps must be positive")]
    InvalidCaptureFps,
}

/// Video capture failures.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// Capture was requested but no capture-capable surface is attached.
    #[error("replay capture requires a surface with capture_stream()")]
    MissingSurface,
    /// Capture was requested but no media recorder capability is attached.
    #[error("replay capture requires media recorder support")]
    MissingRecorder,
    /// The recorder backend reported a failure.
    #[error("recorder failed: {reason}")]
    Recorder {
        /// Backend-supplied description.
        reason: String,
    },
    /// The recorder did not confirm it stopped within the flush timeout.
    #[error("recorder did not stop within {timeout_ms} ms")]
    FlushTimeout {
        /// The timeout that elapsed.
        timeout_ms: u64,
    },
    /// The recorder's event channel closed before it confirmed stopping.
    #[error("recorder event channel closed before stop")]
    Disconnected,
}

impl CaptureError {
    /// Convenience constructor for [`CaptureError::Recorder`].
    pub fn recorder(reason: impl Into<String>) -> Self {
        Self::Recorder {
            reason: reason.into(),
        }
    }
}

/// Errors from [`ReplayEngine::play`](crate::ReplayEngine::play).
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ReplayError {
    /// The simulation asked for more random values than the run recorded.
    ///
    /// The replayed simulation consumed randomness differently from the
    /// recorded one, so its state can no longer match.
    #[error("replay diverged: random tape exhausted after {consumed} draws")]
    Divergence {
        /// Values drawn before the tape ran dry.
        consumed: usize,
    },
    /// Capture could not be set up or finished.
    #[error("capture: {0}")]
    Capture(#[from] CaptureError),
    /// The simulation failed for a reason other than divergence.
    #[error("simulation: {0}")]
    Simulation(#[source] SimulationError),
}

impl From<SimulationError> for ReplayError {
    fn from(err: SimulationError) -> Self {
        match err {
            SimulationError::Rand(RandError::Underrun { consumed }) => Self::Divergence { consumed },
            other => Self::Simulation(other),
        }
    }
}

/// Errors reading or writing persisted replay JSON.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// Malformed JSON or a shape mismatch.
    #[error("replay json: {0}")]
    Json(#[from] serde_json::Error),
}
