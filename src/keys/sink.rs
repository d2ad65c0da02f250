//! Output sink trait for host key presses
//!
//! The tracker drives a `KeySink`; the concrete sink decides whether that
//! reaches the OS input stream (`CgKeyboard`) or only the log (`LogSink`).

use tracing::info;

use super::Key;

/// Errors raised while synthesizing key events
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to create keyboard event source - check Accessibility permissions")]
    SourceCreation,

    #[error("failed to create keyboard event for key {0}")]
    EventCreation(Key),

    #[error("keyboard synthesis is not supported on this platform")]
    Unsupported,
}

/// One side effect against the host keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press(Key),
    Release(Key),
}

/// Destination for key press/release actions
pub trait KeySink {
    /// Put the key down on the host
    fn press(&mut self, key: Key) -> Result<(), SinkError>;

    /// Let the key back up on the host
    fn release(&mut self, key: Key) -> Result<(), SinkError>;

    /// Apply a single action
    fn apply(&mut self, action: KeyAction) -> Result<(), SinkError> {
        match action {
            KeyAction::Press(key) => self.press(key),
            KeyAction::Release(key) => self.release(key),
        }
    }
}

impl<S: KeySink + ?Sized> KeySink for Box<S> {
    fn press(&mut self, key: Key) -> Result<(), SinkError> {
        (**self).press(key)
    }

    fn release(&mut self, key: Key) -> Result<(), SinkError> {
        (**self).release(key)
    }
}

/// Dry-run sink: logs actions instead of synthesizing them
#[derive(Debug, Default)]
pub struct LogSink;

impl KeySink for LogSink {
    fn press(&mut self, key: Key) -> Result<(), SinkError> {
        info!(key = %key.symbol(), "dry run: press");
        Ok(())
    }

    fn release(&mut self, key: Key) -> Result<(), SinkError> {
        info!(key = %key.symbol(), "dry run: release");
        Ok(())
    }
}
