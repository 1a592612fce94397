//! Loop configuration, validation, and error types.

use serde::Deserialize;
use thiserror::Error;

/// Default cap on a single frame's contribution to the accumulator (s).
pub const DEFAULT_MAX_FRAME: f64 = 0.1;

/// Default fixed simulation step (s): 120 ticks per second.
pub const DEFAULT_SIM_DT: f64 = 1.0 / 120.0;

/// Errors detected by [`LoopConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// `sim_dt` is NaN, infinite, zero, or negative.
    #[error("sim_dt must be finite and positive, got {value}")]
    InvalidSimDt {
        /// The invalid value.
        value: f64,
    },
    /// `max_frame` is NaN, infinite, zero, or negative.
    #[error("max_frame must be finite and positive, got {value}")]
    InvalidMaxFrame {
        /// The invalid value.
        value: f64,
    },
}

/// Configuration for a [`FixedStepLoop`](crate::FixedStepLoop).
///
/// Deserializable so hosts can keep timing in a settings file; missing
/// fields take their defaults.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Fixed tick length in seconds. Default: 1/120.
    pub sim_dt: f64,
    /// Longest frame (seconds) fed into the accumulator; longer gaps
    /// (tab switches, debugger pauses) are clamped to this. Default: 0.1.
    pub max_frame: f64,
}

impl LoopConfig {
    /// A config with the given tick length and the default frame clamp.
    pub fn new(sim_dt: f64) -> Self {
        Self {
            sim_dt,
            max_frame: DEFAULT_MAX_FRAME,
        }
    }

    /// Validate all invariants. Values are never coerced.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.sim_dt.is_finite() || self.sim_dt <= 0.0 {
            return Err(ConfigError::InvalidSimDt { value: self.sim_dt });
        }
        if !self.max_frame.is_finite() || self.max_frame <= 0.0 {
            return Err(ConfigError::InvalidMaxFrame {
                value: self.max_frame,
            });
        }
        Ok(())
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SIM_DT)
    }
}
