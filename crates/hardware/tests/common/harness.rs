use crate::common::mocks::hart::{CountingHart, StepCall, StepLog};
use mcsim_core::sim::SessionEnd;
use mcsim_core::{Console, Scheduler};
use std::io::Cursor;

/// Memory size used by every test scheduler.
pub const TEST_MEMORY_SIZE: usize = 4096;

pub struct TestContext {
    pub sched: Scheduler<CountingHart>,
    pub log: StepLog,
}

impl TestContext {
    /// Builds a scheduler of `cores` counting harts over `TEST_MEMORY_SIZE` bytes.
    pub fn new(cores: usize) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let log = StepLog::default();
        let hart_log = log.clone();
        let sched = Scheduler::new(cores, TEST_MEMORY_SIZE, |id, mem| {
            CountingHart::new(id, mem, hart_log.clone())
        })
        .unwrap();
        Self { sched, log }
    }

    /// Mutable access to hart `idx`.
    pub fn hart_mut(&mut self, idx: usize) -> &mut CountingHart {
        self.sched.hart_mut(idx).unwrap()
    }

    /// Total steps executed by hart `idx`.
    pub fn steps(&self, idx: usize) -> u64 {
        self.sched.hart(idx).unwrap().steps
    }

    /// Snapshot of every step call so far.
    pub fn calls(&self) -> Vec<StepCall> {
        self.log.borrow().clone()
    }

    /// Executes each line through a console and returns everything it printed.
    ///
    /// Lines are executed individually, so no prompts are included.
    pub fn execute(&mut self, lines: &[&str]) -> String {
        let mut out = Vec::new();
        {
            let mut console = Console::new(&mut self.sched, Cursor::new(Vec::new()), &mut out);
            for line in lines {
                let quit = console.execute_line(line).unwrap();
                assert!(!quit, "unexpected quit on {line:?}");
            }
        }
        String::from_utf8(out).unwrap()
    }

    /// Runs a full console session over `input` and returns how it ended and the output.
    pub fn session(&mut self, input: impl AsRef<[u8]>) -> (SessionEnd, String) {
        let mut out = Vec::new();
        let end = Console::new(&mut self.sched, Cursor::new(input.as_ref().to_vec()), &mut out)
            .run()
            .unwrap();
        (end, String::from_utf8(out).unwrap())
    }
}
