//! Replay engine configuration.

use serde::Deserialize;

use crate::error::ConfigError;

/// Configuration for a [`ReplayEngine`](crate::ReplayEngine).
///
/// Deserializable with per-field defaults.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Fixed simulation step (s). Must match the step the run was
    /// recorded with. Default: 1/120.
    pub sim_dt: f64,
    /// Target display rate used to derive the render cadence when the
    /// caller does not fix one. Default: 60.
    pub render_fps: u32,
    /// Frame rate requested from the capture surface. Default: 60.
    pub capture_fps: u32,
    /// Fall back to a thread yield between renders when the host offers
    /// no frame wait. Default: true.
    pub timer_yield: bool,
    /// How long to wait for the recorder to confirm it stopped (ms).
    /// Default: 5000.
    pub capture_flush_timeout_ms: u64,
}

impl ReplayConfig {
    /// Validate all invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.sim_dt.is_finite() || self.sim_dt <= 0.0 {
            return Err(ConfigError::InvalidSimDt { value: self.sim_dt });
        }
        if self.render_fps == 0 {
            return Err(ConfigError::InvalidRenderFps);
        }
        if self.capture_fps == 0 {
            return Err(ConfigError::InvalidCaptureFps);
        }
        Ok(())
    }

    /// Ticks between rendered frames.
    ///
    /// An explicit positive `render_every_ticks` wins; otherwise the
    /// cadence approximates one render per display frame, never below 1.
    pub fn cadence(&self, render_every_ticks: Option<u32>) -> u32 {
        match render_every_ticks {
            Some(n) if n > 0 => n,
            _ => {
                let per_frame = (1.0 / self.sim_dt) / f64::from(self.render_fps);
                // Saturating float-to-int cast; tiny sim_dt cannot overflow.
                (per_frame.round() as u32).max(1)
            }
        }
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            sim_dt: 1.0 / 120.0,
            render_fps: 60,
            capture_fps: 60,
            timer_yield: true,
            capture_flush_timeout_ms: 5_000,
        }
    }
}
