//! Per-tick input state and discrete actions.
//!
//! These are the values a replay records once per simulation tick and
//! feeds back verbatim on playback. Field names serialize to the
//! persisted replay shape (`move`, `cursor`, `actions`).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::lenient;

/// Continuous movement vector sampled at a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Movement {
    /// Horizontal component.
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub dx: f64,
    /// Vertical component.
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub dy: f64,
}

impl Movement {
    /// Construct a movement vector.
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

/// Pointer position sampled at a tick.
///
/// `has` is false when no pointer is over the play surface; `x`/`y`
/// are then meaningless but still recorded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cursor {
    /// Horizontal position.
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub x: f64,
    /// Vertical position.
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub y: f64,
    /// Whether the pointer is present.
    #[serde(deserialize_with = "lenient::truthy")]
    pub has: bool,
}

impl Cursor {
    /// A present cursor at `(x, y)`.
    pub const fn at(x: f64, y: f64) -> Self {
        Self { x, y, has: true }
    }
}

/// A discrete, non-continuous input event (button press, skill use).
///
/// The optional cursor overrides the tick's cursor just before the
/// action is dispatched, so aimed actions replay at the recorded point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Action identifier dispatched to the simulation.
    pub id: String,
    /// Cursor position at the moment the action fired.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Cursor>,
}

impl Action {
    /// An action without a cursor override.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cursor: None,
        }
    }

    /// An action that carries its own cursor position.
    pub fn with_cursor(id: impl Into<String>, cursor: Cursor) -> Self {
        Self {
            id: id.into(),
            cursor: Some(cursor),
        }
    }
}

/// Actions recorded within a single tick. Almost always zero or one.
pub type ActionList = SmallVec<[Action; 2]>;

/// The continuous input state captured once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    /// Movement vector.
    pub movement: Movement,
    /// Pointer state.
    pub cursor: Cursor,
}

impl InputSnapshot {
    /// Construct a snapshot from its parts.
    pub const fn new(movement: Movement, cursor: Cursor) -> Self {
        Self { movement, cursor }
    }
}
