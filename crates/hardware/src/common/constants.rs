//! Global System Constants.
//!
//! This module defines system-wide constants used across the simulator. It includes:
//! 1. **Architectural Constants:** Register counts and instruction sizes.
//! 2. **Scheduling Constants:** The headless batch size.
//! 3. **Memory Constants:** Default physical memory size.

/// Number of general-purpose integer registers per hart.
pub const NGPR: usize = 32;

/// Size of a standard (32-bit) RISC-V instruction in bytes.
pub const INSTRUCTION_SIZE_32: u64 = 4;

/// Steps per core in each headless batch.
///
/// Bounds the latency between opportunities for external intervention while
/// keeping all cores at comparable logical time.
pub const HEADLESS_BATCH_STEPS: u64 = 100;

/// Default physical memory size (64 MiB).
pub const DEFAULT_MEMORY_SIZE: usize = 64 * 1024 * 1024;
