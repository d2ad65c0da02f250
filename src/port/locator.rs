//! Serial device discovery by device-node naming convention
//!
//! On macOS an Arduino-style board shows up as `/dev/cu.usbmodem*`, or as
//! `/dev/cu.usbserial*` behind a USB-serial adapter. Patterns are tried in
//! order and the first one with any match wins.

use std::path::PathBuf;

use tracing::debug;

use super::PortError;

/// Default discovery patterns, in priority order
pub const DEFAULT_PATTERNS: [&str; 2] = ["/dev/cu.usbmodem*", "/dev/cu.usbserial*"];

/// Finds a serial device path by scanning glob patterns in order
#[derive(Debug, Clone)]
pub struct PortLocator {
    patterns: Vec<String>,
}

impl PortLocator {
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    /// Scan once and return the first match of the first non-empty pattern.
    ///
    /// Matches within a pattern come back in path order, so repeated scans
    /// of an unchanged filesystem pick the same device.
    pub fn locate(&self) -> Result<PathBuf, PortError> {
        for pattern in &self.patterns {
            let paths = glob::glob(pattern).map_err(|source| PortError::Pattern {
                pattern: pattern.clone(),
                source,
            })?;

            // Unreadable entries are skipped
            if let Some(path) = paths.filter_map(Result::ok).next() {
                debug!(%pattern, ?path, "serial device found");
                return Ok(path);
            }

            debug!(%pattern, "no match");
        }

        Err(PortError::NotFound {
            patterns: self.patterns.clone(),
        })
    }
}

impl Default for PortLocator {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect())
    }
}
