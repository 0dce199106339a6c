//! Multi-core RISC-V functional simulator driver.
//!
//! This crate owns the simulated machine's physical memory, advances its harts in a
//! controlled interleaving, and exposes an interactive debug console:
//! 1. **Memory:** A single flat address space shared by every hart, a bounds-enforcing
//!    loader view, and the debugger's alignment-sized reader.
//! 2. **Harts:** The step/inspect contract for simulated cores and a fetch-only hart.
//! 3. **Scheduling:** Cooperative round-robin stepping in headless batches or from the console.
//! 4. **Console:** A line-oriented command loop with a per-command trap boundary.
//! 5. **Loading and configuration:** ELF/raw image loading and JSON configuration.

/// Common types and constants (traps, errors, access widths).
pub mod common;
/// Simulator configuration (defaults and hierarchical config structures).
pub mod config;
/// Hart interface and the fetch-only hart.
pub mod core;
/// Image loader, scheduler, and debug console.
pub mod sim;
/// Physical memory (address space, loader adapter, inspection).
pub mod soc;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Hart trait and bundled fetch-only hart.
pub use crate::core::{FetchHart, Hart};
/// Scheduler and console.
pub use crate::sim::{Console, Scheduler};
/// Shared physical memory.
pub use crate::soc::AddressSpace;
