//! Key symbols, the button-to-key table, and host keyboard sinks

mod key;
#[cfg(target_os = "macos")]
mod macos;
mod sink;

pub use key::{Key, KeyMapping};
#[cfg(target_os = "macos")]
pub use macos::CgKeyboard;
pub use sink::{KeyAction, KeySink, LogSink, SinkError};

/// Open the keyboard sink for this process
///
/// A dry run always logs instead of typing. Without CoreGraphics there is
/// no real keyboard to drive, so only the dry run is available.
pub fn open_sink(dry_run: bool) -> Result<Box<dyn KeySink>, SinkError> {
    if dry_run {
        return Ok(Box::new(LogSink));
    }

    #[cfg(target_os = "macos")]
    {
        Ok(Box::new(CgKeyboard::new()?))
    }

    #[cfg(not(target_os = "macos"))]
    {
        Err(SinkError::Unsupported)
    }
}
