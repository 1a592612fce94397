//! Playback options, report, and the scoped state a playback owns.

use std::fmt;

use retrace_core::{InputSource, Simulation};
use retrace_rand::SlotGuard;
use tracing::trace;

use crate::capture::{CaptureMode, VideoBlob};
use crate::engine::ReplayFlag;
use crate::host::ReplayHost;
use crate::run::ReplayRun;

/// When to render during playback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Render every `cadence` ticks (plus the terminal/final frame).
    #[default]
    Cadence,
    /// Render after every tick.
    Always,
}

/// Which random source drove a playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RandSourceKind {
    /// The run's recorded tape.
    Tape,
    /// A fresh generator from the run's seed (runs recorded without a tape).
    Seeded,
}

/// Arguments to [`ReplayEngine::play`](crate::ReplayEngine::play).
///
/// # Examples
///
/// ```
/// use retrace_replay::{CaptureMode, PlayOptions, RenderMode};
///
/// let opts = PlayOptions::new()
///     .capture(CaptureMode::None)
///     .render_mode(RenderMode::Always)
///     .render_final(false);
/// assert_eq!(opts.render_mode, RenderMode::Always);
/// ```
pub struct PlayOptions<'a> {
    /// Whether to record the playback to video.
    pub capture_mode: CaptureMode,
    /// Run to play; `None` plays the engine's active run.
    pub run: Option<&'a ReplayRun>,
    /// Fixed render cadence; `None` or zero derives it from the config.
    pub render_every_ticks: Option<u32>,
    /// Cadence or every-tick rendering.
    pub render_mode: RenderMode,
    /// Render the terminal frame and any trailing ticks the cadence missed.
    pub render_final: bool,
    /// Called after each render instead of the engine's default yield.
    pub yield_between_renders: Option<&'a mut dyn FnMut()>,
}

impl<'a> PlayOptions<'a> {
    /// Defaults: no capture, active run, derived cadence, final render on.
    pub fn new() -> Self {
        Self {
            capture_mode: CaptureMode::None,
            run: None,
            render_every_ticks: None,
            render_mode: RenderMode::Cadence,
            render_final: true,
            yield_between_renders: None,
        }
    }

    /// Set the capture mode.
    pub fn capture(mut self, mode: CaptureMode) -> Self {
        self.capture_mode = mode;
        self
    }

    /// Play `run` instead of the active run.
    pub fn run(mut self, run: &'a ReplayRun) -> Self {
        self.run = Some(run);
        self
    }

    /// Fix the render cadence.
    pub fn render_every_ticks(mut self, ticks: u32) -> Self {
        self.render_every_ticks = Some(ticks);
        self
    }

    /// Set the render mode.
    pub fn render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = mode;
        self
    }

    /// Enable or disable the final render.
    pub fn render_final(mut self, enabled: bool) -> Self {
        self.render_final = enabled;
        self
    }

    /// Use `hook` as the yield between renders.
    pub fn yield_with(mut self, hook: &'a mut dyn FnMut()) -> Self {
        self.yield_between_renders = Some(hook);
        self
    }
}

impl Default for PlayOptions<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PlayOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayOptions")
            .field("capture_mode", &self.capture_mode)
            .field("run", &self.run.map(|r| r.seed.as_str()))
            .field("render_every_ticks", &self.render_every_ticks)
            .field("render_mode", &self.render_mode)
            .field("render_final", &self.render_final)
            .field("custom_yield", &self.yield_between_renders.is_some())
            .finish()
    }
}

/// Outcome of a completed playback.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackReport {
    /// Ticks stepped.
    pub ticks_processed: usize,
    /// Frames rendered, including the terminal and final renders.
    pub renders: usize,
    /// Ticks between cadence renders.
    pub cadence: u32,
    /// Whether the simulation reached its terminal state.
    pub reached_terminal: bool,
    /// Random source used.
    pub rand_source: RandSourceKind,
    /// Encoded video; `None` unless capture was requested.
    pub video: Option<VideoBlob>,
}

/// The cooperative pause after each render.
pub(crate) enum Yielder<'a> {
    Custom(&'a mut dyn FnMut()),
    Frame,
    Timer,
    None,
}

impl<'a> Yielder<'a> {
    /// Caller hook, else host frame wait, else timer yield, else nothing.
    pub(crate) fn resolve(
        custom: Option<&'a mut dyn FnMut()>,
        host: &dyn ReplayHost,
        timer_yield: bool,
    ) -> Self {
        match custom {
            Some(hook) => Self::Custom(hook),
            None if host.supports_frame_wait() => Self::Frame,
            None if timer_yield => Self::Timer,
            None => Self::None,
        }
    }

    pub(crate) fn pause(&mut self, host: &mut dyn ReplayHost) {
        match self {
            Self::Custom(hook) => (*hook)(),
            Self::Frame => host.wait_for_frame(),
            Self::Timer => std::thread::yield_now(),
            Self::None => {}
        }
    }
}

/// State swapped out for one playback, restored when dropped.
///
/// Teardown order: original input, original random source, game-over
/// UI, replaying flag.
pub(crate) struct PlaybackSession<'a> {
    pub(crate) sim: &'a mut dyn Simulation,
    pub(crate) host: &'a mut dyn ReplayHost,
    original_input: Option<Box<dyn InputSource>>,
    rand_guard: Option<SlotGuard>,
    flag: ReplayFlag,
}

impl<'a> PlaybackSession<'a> {
    /// Raise the replaying flag and take ownership of the simulation's
    /// input slot. The random source is handed over separately so the
    /// guard exists before anything else can fail.
    pub(crate) fn begin(
        sim: &'a mut dyn Simulation,
        host: &'a mut dyn ReplayHost,
        rand_guard: SlotGuard,
        replay_input: Box<dyn InputSource>,
        flag: ReplayFlag,
    ) -> Self {
        flag.set(true);
        let original_input = sim.swap_input(replay_input);
        Self {
            sim,
            host,
            original_input: Some(original_input),
            rand_guard: Some(rand_guard),
            flag,
        }
    }
}

impl Drop for PlaybackSession<'_> {
    fn drop(&mut self) {
        if let Some(input) = self.original_input.take() {
            drop(self.sim.swap_input(input));
        }
        if let Some(guard) = self.rand_guard.take() {
            guard.restore();
        }
        self.host.show_over();
        self.flag.set(false);
        trace!("playback state restored");
    }
}
