//! RISC-V General-Purpose Register File.
//!
//! This module implements the General-Purpose Register (GPR) file for the RISC-V architecture.
//! It maintains the 32 integer registers (`x0`-`x31`) and keeps `x0` hardwired to zero.

use crate::common::NGPR;

/// General-Purpose Register file.
///
/// Contains 32 general-purpose registers used for integer operations. Register `x0`
/// is hardwired to zero and cannot be modified.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Gpr {
    regs: [u64; NGPR],
}

impl Gpr {
    /// Creates a new general-purpose register file with all registers initialized to zero.
    pub const fn new() -> Self {
        Self { regs: [0; NGPR] }
    }

    /// Reads a general-purpose register value.
    ///
    /// Register `x0` always returns 0.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= NGPR`.
    pub const fn read(&self, idx: usize) -> u64 {
        if idx == 0 { 0 } else { self.regs[idx] }
    }

    /// Writes a value to a general-purpose register. Writes to `x0` are ignored.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= NGPR`.
    pub const fn write(&mut self, idx: usize, val: u64) {
        if idx != 0 {
            self.regs[idx] = val;
        }
    }
}
