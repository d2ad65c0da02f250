//! Process lifecycle: phase tracking and signal-driven shutdown

mod phase;
mod shutdown;

pub use phase::{Lifecycle, Phase};
pub use shutdown::{ShutdownFlag, ShutdownSignal};
