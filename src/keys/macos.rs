//! Keyboard synthesis using macOS CGEvent
//!
//! Events are posted at the HID tap location so they look like hardware
//! key presses to the focused application.

use core_graphics::event::{CGEvent, CGEventTapLocation, CGKeyCode};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use tracing::debug;

use super::sink::{KeySink, SinkError};
use super::Key;

/// Sink that posts real key events into the macOS input stream
pub struct CgKeyboard {
    source: CGEventSource,
}

impl CgKeyboard {
    /// Create a keyboard backed by the HID system event source
    pub fn new() -> Result<Self, SinkError> {
        let source = CGEventSource::new(CGEventSourceStateID::HIDSystemState)
            .map_err(|_| SinkError::SourceCreation)?;
        Ok(Self { source })
    }

    fn post(&self, key: Key, down: bool) -> Result<(), SinkError> {
        let code: CGKeyCode = key.macos_keycode();
        let event = CGEvent::new_keyboard_event(self.source.clone(), code, down)
            .map_err(|_| SinkError::EventCreation(key))?;
        event.post(CGEventTapLocation::HID);
        debug!(key = %key, code, down, "posted keyboard event");
        Ok(())
    }
}

impl KeySink for CgKeyboard {
    fn press(&mut self, key: Key) -> Result<(), SinkError> {
        self.post(key, true)
    }

    fn release(&mut self, key: Key) -> Result<(), SinkError> {
        self.post(key, false)
    }
}
