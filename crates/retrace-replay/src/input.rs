//! Synthetic input fed from recorded ticks.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use retrace_core::{Cursor, InputSnapshot, InputSource, Movement};

/// Input source swapped into the simulation during playback.
///
/// Cloning shares state: the engine keeps one handle and writes each
/// recorded tick into it while the simulation reads through the other.
#[derive(Clone, Debug, Default)]
pub struct ReplayInput {
    state: Arc<Mutex<InputSnapshot>>,
}

impl ReplayInput {
    /// A zeroed input with no cursor.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, InputSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Overwrite movement and cursor.
    pub fn set(&self, movement: Movement, cursor: Cursor) {
        *self.lock() = InputSnapshot::new(movement, cursor);
    }

    /// Overwrite only the cursor.
    pub fn set_cursor(&self, cursor: Cursor) {
        self.lock().cursor = cursor;
    }
}

impl InputSource for ReplayInput {
    fn movement(&self) -> Movement {
        self.lock().movement
    }

    fn cursor(&self) -> Cursor {
        self.lock().cursor
    }

    fn snapshot(&self) -> InputSnapshot {
        *self.lock()
    }
}
