//! Process phase machine
//!
//! Searching -> Connecting -> Running -> ShuttingDown -> Terminated, with a
//! direct jump to Terminated when discovery or connection fails.

use std::time::Instant;

use tracing::{info, warn};

/// Phases the bridge process moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Looking for the serial device
    #[default]
    Searching,
    /// Opening the port and waiting out the device reset
    Connecting,
    /// Forwarding button lines to the keyboard
    Running,
    /// Releasing held keys and closing the port
    ShuttingDown,
    /// Done; the process is about to exit
    Terminated,
}

impl Phase {
    /// Whether moving from `self` to `next` is allowed
    pub fn can_advance_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Searching, Phase::Connecting)
                | (Phase::Searching, Phase::Terminated)
                | (Phase::Connecting, Phase::Running)
                | (Phase::Connecting, Phase::Terminated)
                | (Phase::Running, Phase::ShuttingDown)
                | (Phase::ShuttingDown, Phase::Terminated)
        )
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Searching => write!(f, "Searching"),
            Phase::Connecting => write!(f, "Connecting"),
            Phase::Running => write!(f, "Running"),
            Phase::ShuttingDown => write!(f, "ShuttingDown"),
            Phase::Terminated => write!(f, "Terminated"),
        }
    }
}

/// Tracks the current phase and logs each transition
#[derive(Debug)]
pub struct Lifecycle {
    phase: Phase,
    entered_at: Instant,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            phase: Phase::Searching,
            entered_at: Instant::now(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Move to the next phase.
    ///
    /// Returns false and stays put if the transition is not allowed.
    pub fn advance(&mut self, next: Phase) -> bool {
        if !self.phase.can_advance_to(next) {
            warn!(from = %self.phase, to = %next, "invalid phase transition");
            return false;
        }

        let duration_ms = self.entered_at.elapsed().as_millis() as u64;
        info!(
            from = %self.phase,
            to = %next,
            duration_ms = duration_ms,
            "phase transition"
        );

        self.phase = next;
        self.entered_at = Instant::now();
        true
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
