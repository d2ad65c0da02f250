//! Key state tracker implementation
//!
//! Owns the held-state table and the keyboard sink. Repeated reports of
//! the same button level are ignored so the host never sees duplicate
//! presses or releases.

use std::collections::HashMap;

use tracing::{debug, error, info, warn};

use crate::events::{ButtonEvent, Direction, KeyTransition};
use crate::keys::{KeyAction, KeyMapping, KeySink};

/// Which buttons currently hold their key down on the host
///
/// Absent entries are not held.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeldState {
    held: HashMap<String, bool>,
}

impl HeldState {
    pub fn is_held(&self, button_id: &str) -> bool {
        self.held.get(button_id).copied().unwrap_or(false)
    }

    fn set(&mut self, button_id: &str, held: bool) {
        self.held.insert(button_id.to_string(), held);
    }

    /// Number of buttons currently held
    pub fn held_count(&self) -> usize {
        self.held.values().filter(|held| **held).count()
    }
}

/// Edge-triggered tracker that drives a key sink
pub struct KeyStateTracker<S: KeySink> {
    /// Static button -> key table
    mapping: KeyMapping,
    /// Per-button held flags
    held: HeldState,
    /// Where key actions go
    sink: S,
}

impl<S: KeySink> KeyStateTracker<S> {
    /// Create a tracker with nothing held
    pub fn new(mapping: KeyMapping, sink: S) -> Self {
        Self {
            mapping,
            held: HeldState::default(),
            sink,
        }
    }

    pub fn mapping(&self) -> &KeyMapping {
        &self.mapping
    }

    pub fn held(&self) -> &HeldState {
        &self.held
    }

    /// Apply a button event, emitting a key action only on a transition
    pub fn handle(&mut self, event: &ButtonEvent) -> Option<KeyTransition> {
        let Some(key) = self.mapping.key_for(&event.button_id) else {
            debug!(button = %event.button_id, "event for unmapped button ignored");
            return None;
        };

        let already_held = self.held.is_held(&event.button_id);
        if event.pressed == already_held {
            return None;
        }

        let (action, direction) = if event.pressed {
            (KeyAction::Press(key), Direction::Down)
        } else {
            (KeyAction::Release(key), Direction::Up)
        };

        if let Err(e) = self.sink.apply(action) {
            // Held-state keeps tracking what the host actually saw
            warn!(?e, button = %event.button_id, %key, "key action failed");
            return None;
        }

        self.held.set(&event.button_id, event.pressed);

        let transition = KeyTransition {
            button_id: event.button_id.clone(),
            key,
            direction,
        };
        info!("{transition}");
        Some(transition)
    }

    /// Release every key still held, in mapping order.
    ///
    /// Returns the number of keys released. Safe to call more than once;
    /// a second call finds nothing held.
    pub fn release_all(&mut self) -> usize {
        let mut released = 0;

        for (button_id, key) in self.mapping.iter() {
            if !self.held.is_held(button_id) {
                continue;
            }

            match self.sink.release(key) {
                Ok(()) => {
                    debug!(button = %button_id, %key, "released on shutdown");
                    released += 1;
                }
                Err(e) => {
                    error!(?e, button = %button_id, %key, "failed to release key on shutdown");
                }
            }
            self.held.set(button_id, false);
        }

        released
    }
}

impl<S: KeySink> Drop for KeyStateTracker<S> {
    fn drop(&mut self) {
        let released = self.release_all();
        if released > 0 {
            info!(released, "released held keys");
        }
    }
}
