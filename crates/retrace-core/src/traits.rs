//! Core abstraction traits: randomness, input, and the simulation
//! contract the replay engine drives.

use crate::error::{RandError, SimulationError};
use crate::input::{Cursor, InputSnapshot, Movement};

/// A source of uniformly distributed values in `[0, 1)`.
///
/// Simulations draw all of their randomness through this trait so that
/// a run can be recorded to a tape and reproduced exactly. Seeded,
/// tape-recording and tape-playing implementations live in
/// `retrace-rand`.
pub trait RandomSource: Send {
    /// Draw the next value in `[0, 1)`.
    ///
    /// # Errors
    ///
    /// Returns [`RandError::Underrun`] when a finite source (a tape
    /// player) is exhausted.
    fn next_f64(&mut self) -> Result<f64, RandError>;

    /// Draw a value in `[min, max)`.
    ///
    /// Consumes exactly one underlying draw.
    fn range_f64(&mut self, min: f64, max: f64) -> Result<f64, RandError> {
        if min.is_nan() || max.is_nan() || max < min {
            return Err(RandError::InvalidRange { min, max });
        }
        Ok(self.next_f64()? * (max - min) + min)
    }

    /// Draw an integer in `[min, max]` (inclusive on both ends).
    ///
    /// Consumes exactly one underlying draw.
    fn range_int(&mut self, min: i64, max: i64) -> Result<i64, RandError> {
        if max < min {
            return Err(RandError::InvalidRange {
                min: min as f64,
                max: max as f64,
            });
        }
        let span = i128::from(max) - i128::from(min) + 1;
        // Rounding near 1.0 can land exactly on `span`; clamp to keep max inclusive.
        let offset = ((self.next_f64()? * span as f64).floor() as i128).min(span - 1);
        Ok((i128::from(min) + offset) as i64)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_f64(&mut self) -> Result<f64, RandError> {
        (**self).next_f64()
    }
}

/// The input slot a simulation reads each tick.
///
/// Live play plugs in a device-backed implementation; replay swaps in a
/// synthetic one fed from the recorded ticks.
pub trait InputSource: Send {
    /// Current movement vector.
    fn movement(&self) -> Movement;

    /// Current pointer state.
    fn cursor(&self) -> Cursor;

    /// Both values at once.
    fn snapshot(&self) -> InputSnapshot {
        InputSnapshot::new(self.movement(), self.cursor())
    }
}

/// A simulation that the replay engine can drive tick by tick.
///
/// The engine never inspects simulation state beyond [`is_over`]; all
/// gameplay lives behind this trait.
///
/// [`is_over`]: Simulation::is_over
pub trait Simulation {
    /// Begin a fresh run (reset world state).
    fn start_run(&mut self) -> Result<(), SimulationError>;

    /// Dispatch a discrete action by id.
    ///
    /// The default ignores the action.
    fn handle_action(&mut self, id: &str) -> Result<(), SimulationError> {
        let _ = id;
        Ok(())
    }

    /// Advance exactly one fixed step of `dt` seconds.
    fn update(&mut self, dt: f64) -> Result<(), SimulationError>;

    /// Draw the current state.
    fn render(&mut self) -> Result<(), SimulationError>;

    /// Whether the run has reached its terminal state.
    fn is_over(&self) -> bool;

    /// Replace the input slot, returning the previous occupant.
    fn swap_input(&mut self, input: Box<dyn InputSource>) -> Box<dyn InputSource>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Returns a fixed sequence, then underruns.
    struct Fixed(Vec<f64>, usize);

    impl RandomSource for Fixed {
        fn next_f64(&mut self) -> Result<f64, RandError> {
            let v = self
                .0
                .get(self.1)
                .copied()
                .ok_or(RandError::Underrun { consumed: self.1 })?;
            self.1 += 1;
            Ok(v)
        }
    }

    #[test]
    fn range_int_is_inclusive() {
        let mut src = Fixed(vec![0.0, 0.999_999], 0);
        assert_eq!(src.range_int(1, 3).unwrap(), 1);
        assert_eq!(src.range_int(1, 3).unwrap(), 3);
    }

    #[test]
    fn range_rejects_inverted_bounds() {
        let mut src = Fixed(vec![0.5], 0);
        assert!(matches!(
            src.range_int(5, 4),
            Err(RandError::InvalidRange { .. })
        ));
        assert!(matches!(
            src.range_f64(3.0, 2.0),
            Err(RandError::InvalidRange { .. })
        ));
        // Rejected ranges do not consume a draw.
        assert_eq!(src.next_f64().unwrap(), 0.5);
    }

    #[test]
    fn range_f64_scales_draw() {
        let mut src = Fixed(vec![0.25], 0);
        assert_eq!(src.range_f64(10.0, 20.0).unwrap(), 12.5);
    }

    #[test]
    fn boxed_source_delegates() {
        let mut boxed: Box<dyn RandomSource> = Box::new(Fixed(vec![0.75], 0));
        assert_eq!(boxed.next_f64().unwrap(), 0.75);
        assert_eq!(
            boxed.next_f64(),
            Err(RandError::Underrun { consumed: 1 })
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn range_int_stays_in_bounds(
                draw in 0.0f64..1.0,
                min in -1000i64..1000,
                width in 0i64..1000,
            ) {
                let mut src = Fixed(vec![draw], 0);
                let v = src.range_int(min, min + width).unwrap();
                prop_assert!(v >= min && v <= min + width);
            }
        }
    }
}
