//! Interactive debug console.
//!
//! A synchronous read-eval-print loop over any line-oriented input. Each line is
//! split on whitespace into a command name and arguments and dispatched through a
//! fixed command table. Every command runs inside a fault boundary: a [`Trap`]
//! raised by an accessor or by a hart aborts that command only, and the loop
//! continues with the next prompt.
//!
//! | command | arguments | effect |
//! |---|---|---|
//! | `r` / `rs` | `[count]` | step all harts `count` times at single-step interleave (forever if omitted); `r` traces |
//! | `rp` / `rps` | `core [count]` | step one hart `count` times (forever if omitted); `rp` traces |
//! | `reg` | `core reg` | print a general register |
//! | `mem` | `hex_addr` | print memory at the alignment-inferred width |
//! | `until` | `subject args.. hex_value` | single-step all harts until `reg`/`pc`/`mem` equals the value |
//! | `q` | | end the session |
//!
//! An empty line behaves as `r 1`. Unknown commands are ignored.

use std::collections::HashMap;
use std::fmt;
use std::io::{self, BufRead, Write};

use tracing::{debug, warn};

use crate::common::Trap;
use crate::core::Hart;
use crate::sim::simulator::{Scheduler, parse_hex};

/// Operation bound to a console command name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// `r` / `rs`: step every hart.
    RunAll {
        /// Emit a per-step trace.
        trace: bool,
    },
    /// `rp` / `rps`: step one hart.
    RunHart {
        /// Emit a per-step trace.
        trace: bool,
    },
    /// `reg`: print a register.
    Reg,
    /// `mem`: print a memory value.
    Mem,
    /// `until`: poll a value while single-stepping.
    Until,
    /// `q`: end the session.
    Quit,
}

/// How a console session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user issued `q`.
    Quit,
    /// The input stream was exhausted.
    EndOfInput,
}

/// Result of a single successfully executed command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    Continue,
    Print(u64),
    Quit,
}

/// Value polled by `until`.
#[derive(Clone, Copy, Debug)]
enum Subject {
    Reg,
    Pc,
    Mem,
}

impl Subject {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "reg" => Some(Self::Reg),
            "pc" => Some(Self::Pc),
            "mem" => Some(Self::Mem),
            _ => None,
        }
    }
}

/// Interactive console driving a [`Scheduler`].
pub struct Console<'a, H, R, W> {
    sched: &'a mut Scheduler<H>,
    input: R,
    output: W,
    commands: HashMap<&'static str, Command>,
}

impl<'a, H: Hart, R: BufRead, W: Write> Console<'a, H, R, W> {
    /// Creates a console reading commands from `input` and printing to `output`.
    pub fn new(sched: &'a mut Scheduler<H>, input: R, output: W) -> Self {
        let commands = HashMap::from([
            ("r", Command::RunAll { trace: true }),
            ("rs", Command::RunAll { trace: false }),
            ("rp", Command::RunHart { trace: true }),
            ("rps", Command::RunHart { trace: false }),
            ("reg", Command::Reg),
            ("mem", Command::Mem),
            ("until", Command::Until),
            ("q", Command::Quit),
        ]);
        Self {
            sched,
            input,
            output,
            commands,
        }
    }

    /// Returns the command bound to `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<Command> {
        self.commands.get(name).copied()
    }

    /// Runs the read-eval-print loop until `q` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the prompt or a result cannot be written, or the
    /// input cannot be read. Traps never escape this loop. Input bytes that are
    /// not UTF-8 are replaced rather than rejected.
    pub fn run(&mut self) -> io::Result<SessionEnd> {
        let mut buf = Vec::new();
        loop {
            write!(self.output, ":")?;
            self.output.flush()?;

            buf.clear();
            if self.input.read_until(b'\n', &mut buf)? == 0 {
                return Ok(SessionEnd::EndOfInput);
            }
            let line = String::from_utf8_lossy(&buf);
            if self.execute_line(&line)? {
                return Ok(SessionEnd::Quit);
            }
        }
    }

    /// Executes one line of console input. Returns `true` if the line was `q`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if a result cannot be written.
    pub fn execute_line(&mut self, line: &str) -> io::Result<bool> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&name, args)) = tokens.split_first() else {
            return self.dispatch("r", Command::RunAll { trace: true }, &["1"]);
        };
        match self.lookup(name) {
            Some(cmd) => self.dispatch(name, cmd, args),
            None => {
                debug!(command = name, "unknown command ignored");
                Ok(false)
            }
        }
    }

    /// Fault boundary: runs `cmd`, prints its result, and discards any trap.
    fn dispatch(&mut self, name: &str, cmd: Command, args: &[&str]) -> io::Result<bool> {
        debug!(command = name, ?args, "dispatch");
        match self.execute(cmd, args) {
            Ok(Outcome::Continue) => Ok(false),
            Ok(Outcome::Print(val)) => {
                writeln!(self.output, "{val:#018x}")?;
                Ok(false)
            }
            Ok(Outcome::Quit) => Ok(true),
            Err(trap) => {
                warn!(command = name, %trap, "command aborted by trap");
                Ok(false)
            }
        }
    }

    fn execute(&mut self, cmd: Command, args: &[&str]) -> Result<Outcome, Trap> {
        match cmd {
            Command::RunAll { trace } => self.run_all(args, trace),
            Command::RunHart { trace } => self.run_hart(args, trace),
            Command::Reg => self.sched.get_reg(args).map(Outcome::Print),
            Command::Mem => self.sched.get_mem(args).map(Outcome::Print),
            Command::Until => self.until(args),
            Command::Quit => Ok(Outcome::Quit),
        }
    }

    fn run_all(&mut self, args: &[&str], trace: bool) -> Result<Outcome, Trap> {
        match args.first() {
            Some(count) => {
                self.sched.step_all(parse_count(count)?, 1, trace)?;
                Ok(Outcome::Continue)
            }
            None => loop {
                self.sched.step_all(1, 1, trace)?;
            },
        }
    }

    fn run_hart(&mut self, args: &[&str], trace: bool) -> Result<Outcome, Trap> {
        let Some(idx) = args.first().and_then(|core| core.parse::<usize>().ok()) else {
            return Ok(Outcome::Continue);
        };
        let Some(hart) = self.sched.hart_mut(idx) else {
            return Ok(Outcome::Continue);
        };
        if let [_, count] = args {
            hart.step(parse_count(count)?, trace)?;
            return Ok(Outcome::Continue);
        }
        loop {
            hart.step(1, trace)?;
        }
    }

    fn until(&mut self, args: &[&str]) -> Result<Outcome, Trap> {
        let [subject, subject_args @ .., target] = args else {
            return Ok(Outcome::Continue);
        };
        if subject_args.is_empty() {
            return Ok(Outcome::Continue);
        }
        let Some(subject) = Subject::parse(subject) else {
            warn!(subject = *subject, "unknown until subject");
            return Ok(Outcome::Continue);
        };
        let target = parse_hex(target)?;

        loop {
            let current = match subject {
                Subject::Reg => self.sched.get_reg(subject_args)?,
                Subject::Pc => self.sched.get_pc(subject_args)?,
                Subject::Mem => self.sched.get_mem(subject_args)?,
            };
            if current == target {
                return Ok(Outcome::Continue);
            }
            self.sched.step_all(1, 1, false)?;
        }
    }
}

impl<H, R, W> fmt::Debug for Console<'_, H, R, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("commands", &self.commands.len())
            .finish_non_exhaustive()
    }
}

fn parse_count(text: &str) -> Result<u64, Trap> {
    text.parse::<u64>()
        .map_err(|_| Trap::IllegalAccess("malformed step count"))
}
