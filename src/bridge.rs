//! Bridge: serial lines in, key transitions out
//!
//! Runs the `Running` phase loop on a blocking thread. Each read is bounded
//! by the port timeout so a shutdown request is noticed within one timeout.

use std::io::{self, Read};

use tracing::{debug, info, warn};

use crate::events::KeyTransition;
use crate::keys::KeySink;
use crate::lifecycle::ShutdownFlag;
use crate::port::LineReader;
use crate::protocol::parse_line;
use crate::state::KeyStateTracker;

/// Why the bridge loop stopped
#[derive(Debug)]
pub enum StopReason {
    /// Shutdown was requested by a signal
    Interrupted,
    /// The connection failed or reached end of stream
    ConnectionLost(io::Error),
}

/// Forwards button lines from a reader into a key state tracker
pub struct Bridge<R, S: KeySink> {
    reader: LineReader<R>,
    tracker: KeyStateTracker<S>,
}

impl<R: Read, S: KeySink> Bridge<R, S> {
    pub fn new(reader: R, tracker: KeyStateTracker<S>) -> Self {
        Self {
            reader: LineReader::new(reader),
            tracker,
        }
    }

    /// Parse one line and hand any event to the tracker
    pub fn process_line(&mut self, line: &str) -> Option<KeyTransition> {
        match parse_line(line, self.tracker.mapping()) {
            Some(event) => self.tracker.handle(&event),
            None => {
                if !line.trim().is_empty() {
                    debug!(line, "ignored line");
                }
                None
            }
        }
    }

    /// Run until shutdown is requested or the connection fails.
    ///
    /// Held keys are released before this returns, and the reader (the
    /// serial port) is closed when the bridge is dropped on return.
    pub fn run(mut self, shutdown: &ShutdownFlag) -> StopReason {
        info!("bridge running");

        let reason = loop {
            if shutdown.is_requested() {
                break StopReason::Interrupted;
            }

            match self.reader.next_line() {
                Ok(Some(line)) => {
                    self.process_line(&line);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(?e, "serial read failed");
                    break StopReason::ConnectionLost(e);
                }
            }
        };

        info!(?reason, held = self.tracker.held().held_count(), "bridge stopping");
        let released = self.tracker.release_all();
        info!(released, "held keys released");
        reason
    }
}
