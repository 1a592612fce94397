//! Error types shared across the Retrace workspace.
//!
//! Random-source failures live here because they cross two seams: a
//! [`RandomSource`](crate::RandomSource) raises them, the simulation
//! propagates them through its own step, and the replay engine finally
//! classifies a tape underrun as a divergence.

use thiserror::Error;

/// Errors raised by a [`RandomSource`](crate::RandomSource).
#[derive(Clone, Debug, PartialEq, Error)]
pub enum RandError {
    /// A tape player was asked for more values than the tape holds.
    ///
    /// During replay this means the simulation consumed randomness in a
    /// different pattern than the recorded run: the replay diverged.
    #[error("random tape underrun after {consumed} draws")]
    Underrun {
        /// Number of values successfully drawn before exhaustion.
        consumed: usize,
    },
    /// A ranged draw was requested with `max < min`.
    #[error("invalid range: [{min}, {max}]")]
    InvalidRange {
        /// Requested lower bound.
        min: f64,
        /// Requested upper bound.
        max: f64,
    },
}

/// Errors surfaced by a [`Simulation`](crate::Simulation) while the
/// replay engine drives it.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SimulationError {
    /// A random draw inside the simulation failed.
    #[error("random source: {0}")]
    Rand(#[from] RandError),
    /// The simulation reported a failure of its own.
    #[error("simulation failed: {reason}")]
    Failed {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl SimulationError {
    /// Convenience constructor for [`SimulationError::Failed`].
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn underrun_display_mentions_draw_count() {
        let err = RandError::Underrun { consumed: 7 };
        assert_eq!(err.to_string(), "random tape underrun after 7 draws");
    }

    #[test]
    fn rand_error_converts_into_simulation_error() {
        let err: SimulationError = RandError::Underrun { consumed: 0 }.into();
        assert!(matches!(
            err,
            SimulationError::Rand(RandError::Underrun { consumed: 0 })
        ));
        assert!(std::error::Error::source(&err).is_some());
    }
}
