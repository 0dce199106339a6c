//! Simulation driver.
//!
//! Provides the pieces that turn a set of harts and a memory into a running
//! simulation: image loading, the multi-core scheduler, and the debug console.

/// Interactive debug console and its command table.
pub mod console;

/// Image loading into physical memory.
pub mod loader;

/// Multi-core interleaved scheduler.
pub mod simulator;

pub use console::{Command, Console, SessionEnd};
pub use simulator::Scheduler;
