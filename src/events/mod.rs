//! Events flowing through the bridge
//!
//! `ButtonEvent` is what the line parser decodes from the wire;
//! `KeyTransition` is what the tracker reports after it has actually
//! pressed or released a key on the host.

use serde::{Deserialize, Serialize};

use crate::keys::Key;

/// A decoded `<ButtonId>:<level>` line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonEvent {
    /// Button identifier as sent by the device (e.g. `B1`)
    pub button_id: String,
    /// True only when the level field was exactly 1
    pub pressed: bool,
}

impl ButtonEvent {
    pub fn new(button_id: impl Into<String>, pressed: bool) -> Self {
        Self {
            button_id: button_id.into(),
            pressed,
        }
    }
}

/// Direction of a key transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Down,
    Up,
}

/// A key transition that was emitted to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyTransition {
    /// Button that caused the transition
    pub button_id: String,
    /// Key that was pressed or released
    pub key: Key,
    /// Whether the key went down or up
    pub direction: Direction,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Down => write!(f, "DOWN"),
            Direction::Up => write!(f, "UP"),
        }
    }
}

impl std::fmt::Display for KeyTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {} {}", self.button_id, self.key, self.direction)
    }
}
