//! Serial device discovery and the line-oriented connection

mod connection;
mod locator;

pub use connection::{open, LineReader};
pub use locator::{PortLocator, DEFAULT_PATTERNS};

use std::path::PathBuf;

/// Errors that can occur while finding or opening the device
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("no serial device found matching {patterns:?} - plug it in and try again")]
    NotFound { patterns: Vec<String> },

    #[error("invalid port pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: serialport::Error,
    },
}
