//! Multi-core scheduler.
//!
//! The scheduler owns the physical address space and a fixed array of harts. It
//! advances them with cooperative round-robin interleaving: no hart runs more than
//! `interleave` consecutive steps before every other hart has had a turn. There is
//! no parallelism. The address space is shared by all harts without locking, which
//! is sound only because exactly one hart is stepped at a time; stepping harts on
//! several threads would require partitioning or synchronising the address space.

use std::convert::Infallible;
use std::io;
use std::path::Path;
use std::rc::Rc;

use tracing::{debug, info};

use crate::common::{NGPR, SimError, Trap};
use crate::config::Config;
use crate::core::Hart;
use crate::sim::console::{Console, SessionEnd};
use crate::sim::loader;
use crate::soc::memory::inspect;
use crate::soc::{AddressSpace, LoaderAdapter};

/// Top-level simulator state: the shared address space plus every hart.
///
/// The hart array is created once and never resized, so hart indices stay valid
/// for the lifetime of the scheduler.
#[derive(Debug)]
pub struct Scheduler<H> {
    harts: Box<[H]>,
    mem: Rc<AddressSpace>,
    batch_steps: u64,
}

impl<H: Hart> Scheduler<H> {
    /// Allocates `memory_size` bytes of physical memory and builds `core_count` harts.
    ///
    /// `make_hart` is called with ids `0..core_count` in order, each time with a
    /// handle to the shared address space.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] for a zero core count or memory size,
    /// and [`SimError::Allocation`] if the memory cannot be allocated.
    pub fn new<F>(core_count: usize, memory_size: usize, mut make_hart: F) -> Result<Self, SimError>
    where
        F: FnMut(usize, Rc<AddressSpace>) -> H,
    {
        if core_count == 0 {
            return Err(SimError::InvalidConfig(
                "core count must be non-zero".to_string(),
            ));
        }
        let mem = Rc::new(AddressSpace::new(memory_size)?);
        let harts = (0..core_count)
            .map(|id| make_hart(id, Rc::clone(&mem)))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        info!(core_count, memory_size, "scheduler constructed");
        Ok(Self {
            harts,
            mem,
            batch_steps: crate::common::HEADLESS_BATCH_STEPS,
        })
    }

    /// Builds a scheduler from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] if the configuration fails validation,
    /// and [`SimError::Allocation`] if the memory cannot be allocated.
    pub fn from_config<F>(config: &Config, make_hart: F) -> Result<Self, SimError>
    where
        F: FnMut(usize, Rc<AddressSpace>) -> H,
    {
        config.validate()?;
        let mut sched = Self::new(config.system.core_count, config.system.memory_size, make_hart)?;
        sched.batch_steps = config.scheduler.batch_steps;
        Ok(sched)
    }

    /// Returns the number of harts. Fixed at construction.
    pub fn core_count(&self) -> usize {
        self.harts.len()
    }

    /// Returns hart `idx`, if it exists.
    pub fn hart(&self, idx: usize) -> Option<&H> {
        self.harts.get(idx)
    }

    /// Returns hart `idx` mutably, if it exists.
    pub fn hart_mut(&mut self, idx: usize) -> Option<&mut H> {
        self.harts.get_mut(idx)
    }

    /// Returns all harts in id order.
    pub fn harts(&self) -> &[H] {
        &self.harts
    }

    /// Returns the shared physical address space.
    pub fn address_space(&self) -> &AddressSpace {
        &self.mem
    }

    /// Returns the headless batch size (steps per core per batch).
    pub const fn batch_steps(&self) -> u64 {
        self.batch_steps
    }

    /// Loads an executable image into physical memory and points every hart at its entry.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Load`] if the image cannot be read or parsed.
    ///
    /// # Panics
    ///
    /// Panics if the image writes outside physical memory.
    pub fn load_image(&mut self, path: &Path) -> Result<u64, SimError> {
        let mut adapter = LoaderAdapter::new(&self.mem);
        let entry = loader::load_image(path, &mut adapter)?;
        for hart in &mut self.harts {
            hart.set_pc(entry);
        }
        Ok(entry)
    }

    /// Advances every hart by `total_steps` steps, `interleave` steps at a time.
    ///
    /// Each round steps hart 0, then hart 1, and so on, each by at most `interleave`
    /// steps. The final round is shortened so every hart executes exactly
    /// `total_steps`. An `interleave` of 0 is treated as 1.
    ///
    /// # Errors
    ///
    /// Propagates the first [`Trap`] raised by a hart; later harts in that round
    /// are not stepped.
    pub fn step_all(&mut self, total_steps: u64, interleave: u64, trace: bool) -> Result<(), Trap> {
        let interleave = interleave.max(1);
        let mut done = 0;
        while done < total_steps {
            let slice = interleave.min(total_steps - done);
            for hart in &mut self.harts {
                hart.step(slice, trace)?;
            }
            done += slice;
        }
        Ok(())
    }

    /// Runs every hart forever in batches of [`Self::batch_steps`] with tracing off.
    ///
    /// There is no fault boundary here: the first trap ends the run.
    ///
    /// # Errors
    ///
    /// Returns the trap that stopped execution. Never returns `Ok`.
    pub fn run_headless(&mut self) -> Result<Infallible, Trap> {
        let batch = self.batch_steps;
        debug!(batch, "headless run");
        loop {
            self.step_all(batch, batch, false)?;
        }
    }

    /// Runs the simulator.
    ///
    /// Headless runs never return except with the trap that stopped them. Interactive
    /// runs hand stdin/stdout to the debug console and terminate the process with
    /// status 0 when the session ends.
    ///
    /// # Errors
    ///
    /// Headless: the trap that stopped execution. Interactive: a fatal I/O error on the
    /// console streams.
    pub fn run(&mut self, interactive: bool) -> Result<Infallible, SimError> {
        if !interactive {
            let trap = match self.run_headless() {
                Ok(never) => match never {},
                Err(trap) => trap,
            };
            return Err(SimError::Trap(trap));
        }

        let stdin = io::stdin();
        let stdout = io::stdout();
        let end = Console::new(self, stdin.lock(), stdout.lock()).run()?;
        debug!(?end, "console session ended");
        match end {
            SessionEnd::Quit | SessionEnd::EndOfInput => std::process::exit(0),
        }
    }

    /// Returns the program counter of the hart named by `args[0]`.
    ///
    /// # Errors
    ///
    /// Returns [`Trap::IllegalAccess`] unless there is exactly one argument naming an
    /// existing hart.
    pub fn get_pc(&self, args: &[&str]) -> Result<u64, Trap> {
        let [core] = args else {
            return Err(Trap::IllegalAccess("pc takes exactly one argument"));
        };
        Ok(self.hart_arg(core)?.pc())
    }

    /// Returns register `args[1]` of the hart named by `args[0]`.
    ///
    /// # Errors
    ///
    /// Returns [`Trap::IllegalAccess`] unless there are exactly two arguments naming an
    /// existing hart and a register below `NGPR`.
    pub fn get_reg(&self, args: &[&str]) -> Result<u64, Trap> {
        let [core, reg] = args else {
            return Err(Trap::IllegalAccess("reg takes exactly two arguments"));
        };
        let hart = self.hart_arg(core)?;
        let idx = reg
            .parse::<usize>()
            .ok()
            .filter(|&r| r < NGPR)
            .ok_or(Trap::IllegalAccess("register index out of range"))?;
        Ok(hart.reg(idx))
    }

    /// Returns the value at the hex physical address `args[0]`, read at the width
    /// inferred from its alignment.
    ///
    /// # Errors
    ///
    /// Returns [`Trap::IllegalAccess`] unless there is exactly one hex argument, and
    /// [`Trap::LoadAccessFault`] if the read falls outside physical memory.
    pub fn get_mem(&self, args: &[&str]) -> Result<u64, Trap> {
        let [addr] = args else {
            return Err(Trap::IllegalAccess("mem takes exactly one argument"));
        };
        let addr = parse_hex(addr)?;
        inspect::read_sized(&self.mem, addr)
    }

    fn hart_arg(&self, arg: &str) -> Result<&H, Trap> {
        arg.parse::<usize>()
            .ok()
            .and_then(|idx| self.harts.get(idx))
            .ok_or(Trap::IllegalAccess("core index out of range"))
    }
}

/// Parses a hexadecimal value with an optional `0x`/`0X` prefix.
///
/// # Errors
///
/// Returns [`Trap::IllegalAccess`] if the text is not valid hexadecimal.
pub fn parse_hex(text: &str) -> Result<u64, Trap> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u64::from_str_radix(digits, 16).map_err(|_| Trap::IllegalAccess("malformed hex value"))
}
