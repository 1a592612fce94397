//! User-facing status notifications.

/// A short status line for the host UI.
///
/// `class_name` is a styling hint (`"hint"`, `"hint bad"`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    /// Styling hint for the host.
    pub class_name: String,
    /// Text to display.
    pub text: String,
}

impl StatusMessage {
    /// A message with an arbitrary class and text.
    pub fn new(class_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            text: text.into(),
        }
    }

    /// Emitted when recording starts.
    pub fn recording(seed: &str) -> Self {
        Self::new("hint", format!("Recording replay\u{2026} Seed: {seed}"))
    }

    /// Emitted when playback is requested without a playable run.
    pub fn no_replay() -> Self {
        Self::new("hint bad", "No replay available yet (finish a run first).")
    }
}

/// Receives status notifications. Purely observational.
pub trait StatusSink {
    /// Deliver a message.
    fn notify(&mut self, message: &StatusMessage);
}

impl<F: FnMut(&StatusMessage)> StatusSink for F {
    fn notify(&mut self, message: &StatusMessage) {
        self(message)
    }
}

/// Discards every message.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullStatus;

impl StatusSink for NullStatus {
    fn notify(&mut self, _message: &StatusMessage) {}
}
