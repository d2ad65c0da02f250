//! serial-keybridge: microcontroller buttons over serial -> host keyboard
//!
//! Reads `B1:1` / `B1:0` style lines from a board on a USB serial port and
//! synthesizes the mapped key presses so any local application receives
//! the input:
//! - Port discovery via macOS `/dev/cu.*` naming conventions
//! - Edge-triggered key state (one press per press, one release per release)
//! - Every held key is released on shutdown, whatever ends the run
//!
//! Button mapping: B1 -> W, B2 -> A, B3 -> S, B4 -> D

mod bridge;
mod config;
mod events;
mod keys;
mod lifecycle;
mod port;
mod protocol;
mod state;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::bridge::{Bridge, StopReason};
use crate::config::Config;
use crate::keys::KeyMapping;
use crate::lifecycle::{Lifecycle, Phase, ShutdownSignal};
use crate::port::PortLocator;
use crate::state::KeyStateTracker;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "serial-keybridge starting"
    );

    let mut lifecycle = Lifecycle::new();
    let result = run(&mut lifecycle).await;

    if lifecycle.phase() != Phase::Terminated {
        lifecycle.advance(Phase::Terminated);
    }

    match result {
        Ok(()) => {
            info!("serial-keybridge stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

/// Walk the lifecycle from discovery to shutdown
async fn run(lifecycle: &mut Lifecycle) -> Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    info!(?config, "configuration loaded");

    // Searching
    let path = find_port(&config)?;
    lifecycle.advance(Phase::Connecting);

    // Connecting
    info!(?path, baud_rate = config.baud_rate, "connecting");
    let serial = port::open(&path, config.baud_rate, config.read_timeout)?;
    // Opening the port resets most boards; ignore data until it is back up
    tokio::time::sleep(config.reset_delay).await;
    info!(?path, "connected, press Ctrl+C to quit");
    lifecycle.advance(Phase::Running);

    // Running
    let shutdown = ShutdownSignal::new();
    let flag = shutdown.flag();
    let dry_run = config.dry_run;

    let mut worker = tokio::task::spawn_blocking(move || -> Result<StopReason> {
        // Built on this thread: the CoreGraphics event source is not Send
        let sink = keys::open_sink(dry_run).context("failed to open keyboard output")?;
        let tracker = KeyStateTracker::new(KeyMapping::default(), sink);
        Ok(Bridge::new(serial, tracker).run(&flag))
    });

    let joined = tokio::select! {
        joined = &mut worker => {
            lifecycle.advance(Phase::ShuttingDown);
            joined
        }
        _ = shutdown.wait() => {
            info!("interrupt received, quitting");
            lifecycle.advance(Phase::ShuttingDown);
            worker.await
        }
    };

    // The bridge has released held keys and closed the port by now
    let outcome = joined.context("bridge task failed")?;
    lifecycle.advance(Phase::Terminated);

    match outcome? {
        StopReason::Interrupted => Ok(()),
        StopReason::ConnectionLost(e) => Err(e).context("serial connection lost"),
    }
}

/// Use the configured port, or scan for one
fn find_port(config: &Config) -> Result<PathBuf> {
    if let Some(path) = &config.port {
        info!(?path, "using configured port");
        return Ok(path.clone());
    }

    let locator = PortLocator::new(config.port_patterns.clone());
    Ok(locator.locate()?)
}
