//! Hart interface.
//!
//! A hart is one simulated execution unit with its own program counter and
//! register file. Harts share the single physical [`AddressSpace`](crate::soc::AddressSpace)
//! and are advanced only by the scheduler, one at a time.

use crate::common::Trap;

/// One simulated processor core as seen by the scheduler and the debug console.
///
/// Implementations own their architectural state and hold a non-owning handle to
/// the shared address space. The scheduler never inspects registers; the console
/// reads them through [`Hart::pc`] and [`Hart::reg`].
pub trait Hart {
    /// Returns this hart's index in the scheduler (`0..core_count`).
    fn id(&self) -> usize;

    /// Returns the current program counter.
    fn pc(&self) -> u64;

    /// Sets the program counter (used after image loading).
    fn set_pc(&mut self, pc: u64);

    /// Returns general register `idx`.
    ///
    /// Callers guarantee `idx < NGPR`.
    fn reg(&self, idx: usize) -> u64;

    /// Executes `n` instructions, emitting a per-step trace when `trace` is set.
    ///
    /// Tracing never alters control flow.
    ///
    /// # Errors
    ///
    /// Returns the first [`Trap`] raised by the instruction stream; steps after the
    /// faulting one are not executed.
    fn step(&mut self, n: u64, trace: bool) -> Result<(), Trap>;
}
