//! Accumulator-based fixed-step loop.
//!
//! Each [`advance`](FixedStepLoop::advance) call receives the host's
//! frame timestamp. The elapsed time (clamped to `max_frame`) is added to
//! an accumulator, and whole `sim_dt` ticks are drained from it. The
//! remainder carries into the next frame.
//!
//! A tick may end the run ([`TickFlow::Stop`]); the loop then drops the
//! rest of the accumulated time so nothing ticks after the terminal tick.

use tracing::trace;

use crate::config::{ConfigError, LoopConfig};

/// Returned by [`TickHandler::on_tick`] to continue or hard-stop the
/// current frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickFlow {
    /// Keep draining ticks.
    Continue,
    /// Abort remaining ticks this frame and zero the accumulator.
    Stop,
}

/// Receives frame and tick callbacks from a [`FixedStepLoop`].
pub trait TickHandler {
    /// Called once per frame before any tick, with the clamped frame length.
    fn on_frame_start(&mut self, frame_dt: f64) {
        let _ = frame_dt;
    }

    /// Called once per fixed tick with `sim_dt`.
    fn on_tick(&mut self, dt: f64) -> TickFlow;

    /// Called once per frame after all ticks.
    fn on_frame_end(&mut self, frame_dt: f64) {
        let _ = frame_dt;
    }
}

/// Adapts a tick closure into a [`TickHandler`] with no frame hooks.
pub struct FnTickHandler<F>(pub F);

impl<F: FnMut(f64) -> TickFlow> TickHandler for FnTickHandler<F> {
    fn on_tick(&mut self, dt: f64) -> TickFlow {
        (self.0)(dt)
    }
}

/// Outcome of one [`FixedStepLoop::advance`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Clamped frame length fed into the accumulator (0 for the baseline
    /// frame and ignored timestamps).
    pub frame_dt: f64,
    /// Ticks executed during this frame.
    pub ticks: u32,
    /// Whether a tick returned [`TickFlow::Stop`].
    pub stopped: bool,
}

/// Converts variable frame timestamps into whole fixed-size ticks.
///
/// # Examples
///
/// ```
/// use retrace_engine::{FixedStepLoop, FnTickHandler, LoopConfig, TickFlow};
///
/// let mut looper = FixedStepLoop::new(LoopConfig::new(1.0 / 32.0)).unwrap();
/// let mut ticks = 0;
/// let mut handler = FnTickHandler(|_dt| {
///     ticks += 1;
///     TickFlow::Continue
/// });
/// looper.advance(1000.0, &mut handler); // baseline only
/// looper.advance(1093.75, &mut handler); // 3/32 s -> 3 ticks
/// drop(handler);
/// assert_eq!(ticks, 3);
/// ```
#[derive(Clone, Debug)]
pub struct FixedStepLoop {
    sim_dt: f64,
    max_frame: f64,
    accumulator: f64,
    last_ts: Option<f64>,
}

impl FixedStepLoop {
    /// Build a loop from a validated config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `sim_dt` or `max_frame` is not finite
    /// and positive.
    pub fn new(config: LoopConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            sim_dt: config.sim_dt,
            max_frame: config.max_frame,
            accumulator: 0.0,
            last_ts: None,
        })
    }

    /// Feed a frame timestamp (milliseconds) and run the ticks it pays for.
    ///
    /// The first call after construction or [`reset`](Self::reset) only
    /// records a baseline. Non-finite timestamps are ignored.
    pub fn advance(&mut self, timestamp_ms: f64, handler: &mut impl TickHandler) -> FrameReport {
        if !timestamp_ms.is_finite() {
            return FrameReport::default();
        }
        let Some(last) = self.last_ts.replace(timestamp_ms) else {
            return FrameReport::default();
        };

        let frame_dt = ((timestamp_ms - last) / 1000.0).clamp(0.0, self.max_frame);
        handler.on_frame_start(frame_dt);
        self.accumulator += frame_dt;

        let mut report = FrameReport {
            frame_dt,
            ..FrameReport::default()
        };
        while self.accumulator >= self.sim_dt {
            let flow = handler.on_tick(self.sim_dt);
            self.accumulator -= self.sim_dt;
            report.ticks += 1;
            if flow == TickFlow::Stop {
                self.accumulator = 0.0;
                report.stopped = true;
                break;
            }
        }

        handler.on_frame_end(frame_dt);
        trace!(frame_dt, ticks = report.ticks, "frame advanced");
        report
    }

    /// Clear the accumulator and the baseline timestamp.
    ///
    /// Call on resume after a pause so the paused interval does not
    /// arrive as one large catch-up frame.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_ts = None;
    }

    /// Unconsumed simulation time (seconds), always `< sim_dt` between frames.
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Fraction of a tick left in the accumulator, for render interpolation.
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.sim_dt
    }

    /// The fixed tick length.
    pub fn sim_dt(&self) -> f64 {
        self.sim_dt
    }
}
