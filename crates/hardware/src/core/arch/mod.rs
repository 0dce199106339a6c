//! RISC-V architectural state.
//!
//! Only the integer register file is modelled here; control and status registers
//! belong to the execution engine plugged in behind [`Hart`](crate::core::Hart).

/// General-Purpose Register file implementation.
pub mod gpr;
