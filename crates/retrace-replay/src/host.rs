//! Host UI affordances touched during playback.

/// Optional UI and scheduling hooks supplied by the host application.
///
/// Every method defaults to a no-op so hosts implement only what they
/// have. The engine calls them in a fixed order around playback:
/// `stop_music`, then `reset_input`, `hide_menu` and `hide_over` before
/// the first tick, and `show_over` during teardown on every exit path.
pub trait ReplayHost {
    /// Silence ambient audio.
    fn stop_music(&mut self) {}

    /// Clear any held live input.
    fn reset_input(&mut self) {}

    /// Hide the main menu.
    fn hide_menu(&mut self) {}

    /// Hide the game-over panel.
    fn hide_over(&mut self) {}

    /// Reveal the game-over panel.
    fn show_over(&mut self) {}

    /// Whether [`wait_for_frame`](Self::wait_for_frame) blocks until the
    /// host's next display frame.
    fn supports_frame_wait(&self) -> bool {
        false
    }

    /// Block until the next display frame.
    fn wait_for_frame(&mut self) {}
}

/// A host with no UI.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHost;

impl ReplayHost for NoopHost {}
