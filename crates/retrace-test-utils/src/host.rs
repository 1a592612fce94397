//! Fake host UI, status sink and live input.

use std::sync::{Arc, Mutex};

use retrace_core::{Cursor, InputSnapshot, InputSource, Movement};
use retrace_replay::{ReplayHost, StatusMessage, StatusSink};

/// A host hook invocation, in call order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostCall {
    StopMusic,
    ResetInput,
    HideMenu,
    HideOver,
    ShowOver,
    WaitForFrame,
}

/// Logs every host hook call. Clones share the log.
#[derive(Clone, Debug, Default)]
pub struct RecordingHost {
    calls: Arc<Mutex<Vec<HostCall>>>,
    frame_wait: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advertise a frame wait so the engine yields through the host.
    pub fn with_frame_wait() -> Self {
        Self {
            frame_wait: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: HostCall) -> usize {
        self.calls.lock().unwrap().iter().filter(|&&c| c == call).count()
    }

    fn log(&self, call: HostCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ReplayHost for RecordingHost {
    fn stop_music(&mut self) {
        self.log(HostCall::StopMusic);
    }

    fn reset_input(&mut self) {
        self.log(HostCall::ResetInput);
    }

    fn hide_menu(&mut self) {
        self.log(HostCall::HideMenu);
    }

    fn hide_over(&mut self) {
        self.log(HostCall::HideOver);
    }

    fn show_over(&mut self) {
        self.log(HostCall::ShowOver);
    }

    fn supports_frame_wait(&self) -> bool {
        self.frame_wait
    }

    fn wait_for_frame(&mut self) {
        self.log(HostCall::WaitForFrame);
    }
}

/// Collects status messages. Clones share the log.
#[derive(Clone, Debug, Default)]
pub struct RecordingStatusSink {
    messages: Arc<Mutex<Vec<StatusMessage>>>,
}

impl RecordingStatusSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<StatusMessage> {
        self.messages.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<StatusMessage> {
        self.messages.lock().unwrap().last().cloned()
    }
}

impl StatusSink for RecordingStatusSink {
    fn notify(&mut self, message: &StatusMessage) {
        self.messages.lock().unwrap().push(message.clone());
    }
}

/// A live input whose value tests set directly. Clones share state.
#[derive(Clone, Debug, Default)]
pub struct SettableInput {
    state: Arc<Mutex<InputSnapshot>>,
}

impl SettableInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, movement: Movement, cursor: Cursor) {
        *self.state.lock().unwrap() = InputSnapshot::new(movement, cursor);
    }
}

impl InputSource for SettableInput {
    fn movement(&self) -> Movement {
        self.state.lock().unwrap().movement
    }

    fn cursor(&self) -> Cursor {
        self.state.lock().unwrap().cursor
    }
}
