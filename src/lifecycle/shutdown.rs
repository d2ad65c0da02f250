//! Signal handling for graceful shutdown

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::signal::unix::{signal, SignalKind};
use tracing::{debug, warn};

/// Shared flag the bridge loop polls between reads
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the bridge loop to stop
    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Handles shutdown signals (SIGTERM, SIGINT)
pub struct ShutdownSignal {
    flag: ShutdownFlag,
}

impl ShutdownSignal {
    /// Create a new shutdown signal handler
    pub fn new() -> Self {
        Self {
            flag: ShutdownFlag::new(),
        }
    }

    /// Flag raised when a signal arrives
    pub fn flag(&self) -> ShutdownFlag {
        self.flag.clone()
    }

    /// Wait for a shutdown signal, then raise the flag
    ///
    /// If the handlers cannot be registered this never resolves; the bridge
    /// then only stops on a connection error.
    pub async fn wait(&self) {
        let (mut sigterm, mut sigint) = match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
            (Err(e), _) | (_, Err(e)) => {
                warn!(?e, "failed to register signal handlers");
                return std::future::pending().await;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => {
                debug!("received SIGTERM");
            }
            _ = sigint.recv() => {
                debug!("received SIGINT");
            }
        }

        self.flag.request();
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
