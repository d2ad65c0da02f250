//! Key state tracking
//!
//! Edge-triggered tracker mapping button events to host key actions:
//! - a key goes down only on a released -> pressed transition
//! - a key goes up only on a pressed -> released transition
//! - every key still held is released when the tracker shuts down

mod machine;

pub use machine::{HeldState, KeyStateTracker};
