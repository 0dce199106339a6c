//! System-on-Chip (SoC) Components.
//!
//! This module organizes the components that make up the simulated machine's
//! memory system: the shared physical address space, the loader view over it,
//! and the debugger's sized reader.

/// Physical memory, loader adapter, and debugger inspection.
pub mod memory;

pub use memory::{AddressSpace, LoaderAdapter};
