//! The replay engine: recording lifecycle and deterministic playback.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use retrace_core::{Action, InputSnapshot, RandomSource, Simulation, SimulationError};
use retrace_rand::{RandSlot, SeededRand, TapePlayer, TapeRecorder};
use tracing::{debug, info};

use crate::capture::{CaptureStrategy, CaptureSurface, RecorderFactory};
use crate::config::ReplayConfig;
use crate::error::{ConfigError, ReplayError};
use crate::host::{NoopHost, ReplayHost};
use crate::input::ReplayInput;
use crate::playback::{
    PlayOptions, PlaybackReport, PlaybackSession, RandSourceKind, RenderMode, Yielder,
};
use crate::run::{ReplayRun, TickRecord};
use crate::status::{NullStatus, StatusMessage, StatusSink};

/// Advances the simulation by one fixed step during playback.
///
/// Receives the step length and the tick's actions. Installed when the
/// host's live loop does more per tick than [`Simulation::update`].
pub type StepHook =
    Box<dyn FnMut(&mut dyn Simulation, f64, &[Action]) -> Result<(), SimulationError>>;

/// Shared, read-only view of whether a playback is in progress.
#[derive(Clone, Debug, Default)]
pub struct ReplayFlag(Arc<AtomicBool>);

impl ReplayFlag {
    /// A lowered flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a playback is in progress.
    pub fn get(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn set(&self, value: bool) {
        self.0.store(value, Ordering::Release);
    }
}

/// Records live runs and plays them back deterministically.
///
/// Lifecycle: idle, then [`start_recording`](Self::start_recording),
/// [`record_tick`](Self::record_tick) once per tick, and
/// [`mark_ended`](Self::mark_ended) to seal the run. A sealed run can be
/// [`play`](Self::play)ed any number of times. [`reset`](Self::reset)
/// returns to idle.
pub struct ReplayEngine {
    config: ReplayConfig,
    rand: RandSlot,
    host: Box<dyn ReplayHost>,
    status: Box<dyn StatusSink>,
    surface: Option<Box<dyn CaptureSurface>>,
    recorder: Option<Box<dyn RecorderFactory>>,
    step: Option<StepHook>,
    active_run: Option<ReplayRun>,
    replaying: ReplayFlag,
}

impl ReplayEngine {
    /// An engine with no host UI, status sink, or capture backends.
    pub fn new(config: ReplayConfig, rand: RandSlot) -> Result<Self, ConfigError> {
        Self::builder(rand).config(config).build()
    }

    /// Start configuring an engine that drives randomness through `rand`.
    ///
    /// `rand` must be the slot the simulation draws from.
    pub fn builder(rand: RandSlot) -> ReplayEngineBuilder {
        ReplayEngineBuilder {
            config: ReplayConfig::default(),
            rand,
            host: Box::new(NoopHost),
            status: Box::new(NullStatus),
            surface: None,
            recorder: None,
            step: None,
        }
    }

    // ── Recording ───────────────────────────────────────────────

    /// Begin a new run, replacing any previous one.
    ///
    /// Installs a tape recorder for `seed` into the random slot; every
    /// value the simulation draws from here on lands in the run's tape.
    pub fn start_recording(&mut self, seed: impl Into<String>) -> &ReplayRun {
        let run = ReplayRun::new(seed);
        self.rand.set(TapeRecorder::new(&run.seed, run.rng_tape.share()));
        self.status.notify(&StatusMessage::recording(&run.seed));
        info!(seed = %run.seed, "replay recording started");
        self.active_run.insert(run)
    }

    /// Buffer a discrete action for the next recorded tick.
    ///
    /// Ignored without an open run.
    pub fn queue_action(&mut self, action: Action) {
        if let Some(run) = self.open_run() {
            run.pending_actions.push(action);
        }
    }

    /// Take all buffered actions. Empty without an open run.
    pub fn drain_pending_actions(&mut self) -> Vec<Action> {
        self.open_run()
            .map(|run| std::mem::take(&mut run.pending_actions))
            .unwrap_or_default()
    }

    /// Discard buffered actions.
    pub fn clear_pending_actions(&mut self) {
        if let Some(run) = self.active_run.as_mut() {
            run.pending_actions.clear();
        }
    }

    /// Append one tick of input. Ignored without an open run.
    ///
    /// Call exactly once per simulation tick; repeated calls within a
    /// tick are recorded as separate ticks.
    pub fn record_tick(
        &mut self,
        snapshot: InputSnapshot,
        actions: impl IntoIterator<Item = Action>,
    ) {
        if let Some(run) = self.open_run() {
            run.ticks.push(TickRecord::new(snapshot, actions));
        }
    }

    /// Seal the active run and its tape. `None` without a run.
    ///
    /// The recorder stays installed; its later draws are not kept.
    pub fn mark_ended(&mut self) -> Option<&ReplayRun> {
        let run = self.active_run.as_mut()?;
        if !run.ended {
            run.seal();
            info!(
                seed = %run.seed,
                ticks = run.ticks.len(),
                tape = run.rng_tape.len(),
                "replay recording sealed"
            );
        }
        Some(&*run)
    }

    /// The current run, open or sealed.
    pub fn active_run(&self) -> Option<&ReplayRun> {
        self.active_run.as_ref()
    }

    /// Drop the active run and lower the replaying flag.
    pub fn reset(&mut self) {
        self.active_run = None;
        self.replaying.set(false);
    }

    fn open_run(&mut self) -> Option<&mut ReplayRun> {
        self.active_run.as_mut().filter(|run| !run.ended)
    }

    // ── Playback ────────────────────────────────────────────────

    /// Replay a sealed run against `sim`, tick by tick.
    ///
    /// Returns `Ok(None)` (after a status notification, with nothing
    /// touched) when there is no sealed, non-empty run to play. Capture
    /// capabilities are checked before any state changes.
    ///
    /// For the duration of the call the simulation's input and the
    /// random slot are swapped out; both are restored on every exit
    /// path, together with the game-over UI and the replaying flag.
    ///
    /// # Errors
    ///
    /// - [`ReplayError::Divergence`] if the simulation draws past the end
    ///   of the recorded tape.
    /// - [`ReplayError::Capture`] if capture was requested without a
    ///   surface or recorder, or the recorder fails.
    /// - [`ReplayError::Simulation`] for any other simulation failure.
    pub fn play(
        &mut self,
        sim: &mut dyn Simulation,
        options: PlayOptions<'_>,
    ) -> Result<Option<PlaybackReport>, ReplayError> {
        let Self {
            config,
            rand,
            host,
            status,
            surface,
            recorder,
            step,
            active_run,
            replaying,
        } = self;

        host.stop_music();

        let run = match options.run.or(active_run.as_ref()) {
            Some(run) if run.has_replay_data() => run,
            _ => {
                debug!("replay requested without a sealed run");
                status.notify(&StatusMessage::no_replay());
                return Ok(None);
            }
        };

        let capture = CaptureStrategy::resolve(
            options.capture_mode,
            surface.as_deref_mut().map(|s| s as &mut dyn CaptureSurface),
            recorder.as_deref_mut().map(|r| r as &mut dyn RecorderFactory),
        )?;

        let (source, rand_source) = if run.rng_tape.is_empty() {
            let seeded: Box<dyn RandomSource> = Box::new(SeededRand::new(&run.seed));
            (seeded, RandSourceKind::Seeded)
        } else {
            let tape: Box<dyn RandomSource> = Box::new(TapePlayer::from_tape(&run.rng_tape));
            (tape, RandSourceKind::Tape)
        };
        info!(
            seed = %run.seed,
            ticks = run.ticks.len(),
            tape = run.rng_tape.len(),
            source = ?rand_source,
            "replay playback starting"
        );

        let replay_input = ReplayInput::new();
        let mut session = PlaybackSession::begin(
            sim,
            &mut **host,
            rand.install(source),
            Box::new(replay_input.clone()),
            replaying.clone(),
        );

        session.host.reset_input();
        session.host.hide_menu();
        session.host.hide_over();
        session.sim.start_run()?;

        let capture = capture.start(
            config.capture_fps,
            Duration::from_millis(config.capture_flush_timeout_ms),
        )?;

        let cadence = config.cadence(options.render_every_ticks);
        let every_tick = options.render_mode == RenderMode::Always;
        let mut yielder = Yielder::resolve(
            options.yield_between_renders,
            &*session.host,
            config.timer_yield,
        );

        let mut ticks_processed = 0usize;
        let mut renders = 0usize;
        let mut reached_terminal = false;
        for tick in &run.ticks {
            apply_tick(
                &mut *session.sim,
                &replay_input,
                tick,
                config.sim_dt,
                step.as_mut(),
            )?;
            ticks_processed += 1;

            let over = session.sim.is_over();
            if every_tick || on_cadence(ticks_processed, cadence) || (options.render_final && over)
            {
                session.sim.render()?;
                renders += 1;
                yielder.pause(&mut *session.host);
            }
            if over {
                reached_terminal = true;
                break;
            }
        }

        if !every_tick
            && options.render_final
            && ticks_processed > 0
            && !on_cadence(ticks_processed, cadence)
            && !session.sim.is_over()
        {
            session.sim.render()?;
            renders += 1;
            yielder.pause(&mut *session.host);
        }

        let video = capture.map(|c| c.finish()).transpose()?;
        drop(session);

        info!(ticks_processed, renders, reached_terminal, "replay playback finished");
        Ok(Some(PlaybackReport {
            ticks_processed,
            renders,
            cadence,
            reached_terminal,
            rand_source,
            video,
        }))
    }

    // ── Accessors ───────────────────────────────────────────────

    /// Whether a playback is in progress.
    pub fn is_replaying(&self) -> bool {
        self.replaying.get()
    }

    /// A handle that observes the replaying state from elsewhere.
    pub fn replay_flag(&self) -> ReplayFlag {
        self.replaying.clone()
    }

    /// The random slot the engine swaps sources in.
    pub fn rand_slot(&self) -> &RandSlot {
        &self.rand
    }

    /// The engine's configuration.
    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }
}

impl fmt::Debug for ReplayEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplayEngine")
            .field("config", &self.config)
            .field("active_run", &self.active_run.as_ref().map(|r| r.seed.as_str()))
            .field("replaying", &self.replaying.get())
            .field("capture_surface", &self.surface.is_some())
            .field("recorder_factory", &self.recorder.is_some())
            .field("step_hook", &self.step.is_some())
            .finish_non_exhaustive()
    }
}

fn on_cadence(ticks: usize, cadence: u32) -> bool {
    ticks % cadence as usize == 0
}

/// Feed one recorded tick into the simulation and step it once.
fn apply_tick(
    sim: &mut dyn Simulation,
    input: &ReplayInput,
    tick: &TickRecord,
    sim_dt: f64,
    step: Option<&mut StepHook>,
) -> Result<(), SimulationError> {
    input.set(tick.movement, tick.cursor);
    for action in &tick.actions {
        if let Some(cursor) = action.cursor {
            input.set_cursor(cursor);
        }
        sim.handle_action(&action.id)?;
    }
    match step {
        Some(step) => (*step)(sim, sim_dt, tick.actions.as_slice()),
        None => sim.update(sim_dt),
    }
}

/// Configures a [`ReplayEngine`].
pub struct ReplayEngineBuilder {
    config: ReplayConfig,
    rand: RandSlot,
    host: Box<dyn ReplayHost>,
    status: Box<dyn StatusSink>,
    surface: Option<Box<dyn CaptureSurface>>,
    recorder: Option<Box<dyn RecorderFactory>>,
    step: Option<StepHook>,
}

impl ReplayEngineBuilder {
    /// Replace the default configuration.
    pub fn config(mut self, config: ReplayConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach host UI hooks.
    pub fn host(mut self, host: impl ReplayHost + 'static) -> Self {
        self.host = Box::new(host);
        self
    }

    /// Attach a status sink.
    pub fn status(mut self, status: impl StatusSink + 'static) -> Self {
        self.status = Box::new(status);
        self
    }

    /// Attach a capture-capable render surface.
    pub fn capture_surface(mut self, surface: impl CaptureSurface + 'static) -> Self {
        self.surface = Some(Box::new(surface));
        self
    }

    /// Attach the media recorder capability.
    pub fn recorder_factory(mut self, factory: impl RecorderFactory + 'static) -> Self {
        self.recorder = Some(Box::new(factory));
        self
    }

    /// Step the simulation through `hook` instead of [`Simulation::update`].
    pub fn step(
        mut self,
        hook: impl FnMut(&mut dyn Simulation, f64, &[Action]) -> Result<(), SimulationError>
            + 'static,
    ) -> Self {
        self.step = Some(Box::new(hook));
        self
    }

    /// Validate the configuration and build the engine.
    pub fn build(self) -> Result<ReplayEngine, ConfigError> {
        self.config.validate()?;
        Ok(ReplayEngine {
            config: self.config,
            rand: self.rand,
            host: self.host,
            status: self.status,
            surface: self.surface,
            recorder: self.recorder,
            step: self.step,
            active_run: None,
            replaying: ReplayFlag::new(),
        })
    }
}

impl fmt::Debug for ReplayEngineBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplayEngineBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
