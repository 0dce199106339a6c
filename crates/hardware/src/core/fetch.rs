//! Fetch-only hart.
//!
//! `FetchHart` walks its instruction stream one 32-bit word at a time without
//! decoding it. It exercises the scheduler, the shared address space, and the
//! console's trace and inspection paths when no execution engine is plugged in.

use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

use tracing::trace;

use crate::common::Trap;
use crate::common::constants::INSTRUCTION_SIZE_32;
use crate::core::Hart;
use crate::core::arch::gpr::Gpr;
use crate::soc::AddressSpace;

/// `a0`, which holds the hart id at reset.
const REG_A0: usize = 10;

/// A hart that fetches sequentially and retires every non-zero word as a no-op.
pub struct FetchHart {
    id: usize,
    pc: u64,
    regs: Gpr,
    mem: Rc<AddressSpace>,
    retired: u64,
    trace_out: Box<dyn Write>,
}

impl FetchHart {
    /// Creates hart `id` bound to the shared address space, with `pc = 0` and
    /// `a0` holding the hart id. Trace lines go to stderr.
    pub fn new(id: usize, mem: Rc<AddressSpace>) -> Self {
        let mut regs = Gpr::new();
        regs.write(REG_A0, id as u64);
        Self {
            id,
            pc: 0,
            regs,
            mem,
            retired: 0,
            trace_out: Box::new(io::stderr()),
        }
    }

    /// Redirects per-step trace lines to `out`.
    #[must_use]
    pub fn with_trace_writer(mut self, out: impl Write + 'static) -> Self {
        self.trace_out = Box::new(out);
        self
    }

    /// Returns the number of instructions retired so far.
    pub const fn retired(&self) -> u64 {
        self.retired
    }

    fn fetch(&self) -> Result<u32, Trap> {
        if self.pc % INSTRUCTION_SIZE_32 != 0 {
            return Err(Trap::InstructionAddressMisaligned(self.pc));
        }
        if !self.mem.contains(self.pc, INSTRUCTION_SIZE_32 as usize) {
            return Err(Trap::InstructionAccessFault(self.pc));
        }
        Ok(u32::from_le_bytes(self.mem.read_array(self.pc as usize)))
    }
}

impl Hart for FetchHart {
    fn id(&self) -> usize {
        self.id
    }

    fn pc(&self) -> u64 {
        self.pc
    }

    fn set_pc(&mut self, pc: u64) {
        self.pc = pc;
    }

    fn reg(&self, idx: usize) -> u64 {
        self.regs.read(idx)
    }

    fn step(&mut self, n: u64, trace: bool) -> Result<(), Trap> {
        for _ in 0..n {
            let insn = self.fetch()?;
            if trace {
                // A lost trace line never stops the hart.
                let _ = writeln!(
                    self.trace_out,
                    "core {:3}: {:#018x} ({:#010x})",
                    self.id, self.pc, insn
                );
            }
            // All-zero is the architecturally defined illegal encoding.
            if insn == 0 {
                trace!(hart = self.id, pc = self.pc, "illegal instruction");
                return Err(Trap::IllegalInstruction(insn));
            }
            self.pc = self.pc.wrapping_add(INSTRUCTION_SIZE_32);
            self.retired += 1;
        }
        Ok(())
    }
}

impl fmt::Debug for FetchHart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchHart")
            .field("id", &self.id)
            .field("pc", &self.pc)
            .field("regs", &self.regs)
            .field("retired", &self.retired)
            .finish_non_exhaustive()
    }
}
