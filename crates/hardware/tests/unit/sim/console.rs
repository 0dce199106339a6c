//! # Console Tests
//!
//! Command dispatch, the per-command trap boundary, output format, and the
//! `until` polling loop.

use crate::common::harness::TestContext;
use crate::common::mocks::hart::StepCall;
use mcsim_core::sim::{Command, Console, SessionEnd};
use pretty_assertions::assert_eq;
use std::io::Cursor;

// ─── Command table ─────────────────────────────────────────────────────────

#[test]
fn command_table_binds_every_name() {
    let mut ctx = TestContext::new(1);
    let console = Console::new(&mut ctx.sched, Cursor::new(Vec::new()), Vec::new());
    assert_eq!(console.lookup("r"), Some(Command::RunAll { trace: true }));
    assert_eq!(console.lookup("rs"), Some(Command::RunAll { trace: false }));
    assert_eq!(console.lookup("rp"), Some(Command::RunHart { trace: true }));
    assert_eq!(console.lookup("rps"), Some(Command::RunHart { trace: false }));
    assert_eq!(console.lookup("reg"), Some(Command::Reg));
    assert_eq!(console.lookup("mem"), Some(Command::Mem));
    assert_eq!(console.lookup("until"), Some(Command::Until));
    assert_eq!(console.lookup("q"), Some(Command::Quit));
    assert_eq!(console.lookup("pc"), None);
    assert_eq!(console.lookup("R"), None);
}

#[test]
fn unknown_command_is_a_noop() {
    let mut ctx = TestContext::new(2);
    let out = ctx.execute(&["frobnicate 1 2", "pc 0"]);
    assert_eq!(out, "");
    assert!(ctx.calls().is_empty());
}

// ─── Run commands ──────────────────────────────────────────────────────────

#[test]
fn empty_line_steps_all_once_with_trace() {
    let mut ctx = TestContext::new(2);
    let _ = ctx.execute(&["", "   \t "]);
    assert_eq!(
        ctx.calls(),
        vec![
            StepCall { hart: 0, n: 1, trace: true },
            StepCall { hart: 1, n: 1, trace: true },
            StepCall { hart: 0, n: 1, trace: true },
            StepCall { hart: 1, n: 1, trace: true },
        ]
    );
}

#[test]
fn r_steps_all_at_single_step_interleave() {
    let mut ctx = TestContext::new(2);
    let _ = ctx.execute(&["r 3"]);
    assert_eq!(ctx.steps(0), 3);
    assert_eq!(ctx.steps(1), 3);
    assert_eq!(ctx.calls().len(), 6);
    assert!(ctx.calls().iter().all(|c| c.n == 1 && c.trace));
}

#[test]
fn rs_steps_all_silently() {
    let mut ctx = TestContext::new(2);
    let _ = ctx.execute(&["rs 2"]);
    assert_eq!(ctx.steps(0), 2);
    assert!(ctx.calls().iter().all(|c| !c.trace));
}

#[test]
fn r_with_bad_count_is_aborted() {
    let mut ctx = TestContext::new(1);
    let _ = ctx.execute(&["r lots"]);
    assert!(ctx.calls().is_empty());
}

#[test]
fn rp_steps_only_the_named_core() {
    let mut ctx = TestContext::new(2);
    let _ = ctx.execute(&["rp 1 5"]);
    assert_eq!(ctx.steps(0), 0);
    assert_eq!(ctx.steps(1), 5);
    assert_eq!(ctx.calls(), vec![StepCall { hart: 1, n: 5, trace: true }]);
}

#[test]
fn rps_steps_the_named_core_silently() {
    let mut ctx = TestContext::new(2);
    let _ = ctx.execute(&["rps 0 4"]);
    assert_eq!(ctx.calls(), vec![StepCall { hart: 0, n: 4, trace: false }]);
}

#[test]
fn rp_out_of_range_or_missing_core_is_a_noop() {
    let mut ctx = TestContext::new(2);
    let _ = ctx.execute(&["rp 9 5", "rp", "rps two 5", "rp -1 5"]);
    assert!(ctx.calls().is_empty());
}

#[test]
fn run_trap_is_caught_and_loop_continues() {
    let mut ctx = TestContext::new(2);
    ctx.hart_mut(0).regs[1] = 0x42;
    ctx.hart_mut(1).trap_at = Some(2);
    let out = ctx.execute(&["r 5", "reg 0 1"]);
    assert_eq!(ctx.steps(0), 3);
    assert_eq!(ctx.steps(1), 2);
    assert_eq!(out, "0x0000000000000042\n");
}

// ─── Inspection commands ───────────────────────────────────────────────────

#[test]
fn reg_prints_fixed_width_hex() {
    let mut ctx = TestContext::new(2);
    ctx.hart_mut(1).regs[31] = 0xDEAD_BEEF;
    let out = ctx.execute(&["reg 1 31", "reg 0 0"]);
    assert_eq!(out, "0x00000000deadbeef\n0x0000000000000000\n");
}

#[test]
fn reg_with_wrong_arity_or_range_prints_nothing() {
    let mut ctx = TestContext::new(2);
    let out = ctx.execute(&["reg", "reg 0", "reg 0 1 2", "reg 2 0", "reg 0 32"]);
    assert_eq!(out, "");
}

#[test]
fn mem_prints_alignment_sized_value() {
    let mut ctx = TestContext::new(1);
    ctx.sched
        .address_space()
        .write_slice(0x10, &0x1122_3344_5566_7788u64.to_le_bytes());
    let out = ctx.execute(&["mem 10", "mem 0x14", "mem 12", "mem 11"]);
    assert_eq!(
        out,
        "0x1122334455667788\n0x0000000011223344\n0x0000000000005566\n0x0000000000000077\n"
    );
}

#[test]
fn mem_faults_are_caught() {
    let mut ctx = TestContext::new(1);
    let out = ctx.execute(&["mem", "mem ffffffff", "mem nothex", "mem 0"]);
    assert_eq!(out, "0x0000000000000000\n");
}

// ─── until ─────────────────────────────────────────────────────────────────

#[test]
fn until_reg_stops_when_register_first_matches() {
    let mut ctx = TestContext::new(2);
    ctx.hart_mut(0).counting_reg = Some(3);
    let _ = ctx.execute(&["until reg 0 3 000000ff"]);
    assert_eq!(ctx.sched.get_reg(&["0", "3"]), Ok(0xff));
    assert_eq!(ctx.steps(0), 0xff);
    assert_eq!(ctx.steps(1), 0xff);
    assert!(ctx.calls().iter().all(|c| c.n == 1 && !c.trace));
}

#[test]
fn until_already_satisfied_does_not_step() {
    let mut ctx = TestContext::new(1);
    let _ = ctx.execute(&["until reg 0 3 0"]);
    assert!(ctx.calls().is_empty());
}

#[test]
fn until_pc_polls_program_counter() {
    let mut ctx = TestContext::new(1);
    let _ = ctx.execute(&["until pc 0 0x40"]);
    assert_eq!(ctx.steps(0), 0x10);
}

#[test]
fn until_mem_observes_shared_memory() {
    let mut ctx = TestContext::new(2);
    ctx.hart_mut(1).store_steps_at = Some(0x200);
    let _ = ctx.execute(&["until mem 200 a"]);
    assert_eq!(ctx.steps(1), 10);
    assert_eq!(ctx.sched.get_mem(&["200"]), Ok(10));
}

#[test]
fn until_unknown_subject_or_short_args_is_a_noop() {
    let mut ctx = TestContext::new(1);
    let _ = ctx.execute(&["until csr 0 1 ff", "until reg ff", "until", "until pc 1"]);
    assert!(ctx.calls().is_empty());
}

#[test]
fn until_with_bad_subject_args_is_caught() {
    let mut ctx = TestContext::new(1);
    ctx.hart_mut(0).regs[2] = 7;
    let out = ctx.execute(&["until reg 5 3 ff", "until reg 0 ff", "reg 0 2"]);
    assert!(ctx.calls().is_empty());
    assert_eq!(out, "0x0000000000000007\n");
}

#[test]
fn until_trap_from_hart_is_caught() {
    let mut ctx = TestContext::new(1);
    ctx.hart_mut(0).trap_at = Some(4);
    let _ = ctx.execute(&["until pc 0 100"]);
    assert_eq!(ctx.steps(0), 4);
}

// ─── Session loop ──────────────────────────────────────────────────────────

#[test]
fn session_prints_prompt_before_each_read() {
    let mut ctx = TestContext::new(1);
    ctx.hart_mut(0).regs[4] = 0x10;
    let (end, out) = ctx.session("reg 0 4\nbogus\n");
    assert_eq!(end, SessionEnd::EndOfInput);
    assert_eq!(out, ":0x0000000000000010\n::");
}

#[test]
fn session_survives_faulting_command() {
    let mut ctx = TestContext::new(1);
    ctx.hart_mut(0).regs[1] = 1;
    let (end, out) = ctx.session("reg 0\nmem 0 0\nreg 0 1\n");
    assert_eq!(end, SessionEnd::EndOfInput);
    assert_eq!(out, ":::0x0000000000000001\n:");
}

#[test]
fn session_survives_non_utf8_line() {
    let mut ctx = TestContext::new(1);
    ctx.hart_mut(0).regs[1] = 0x99;
    let (end, out) = ctx.session(b"\xff\xfe\nreg 0 1\n");
    assert_eq!(end, SessionEnd::EndOfInput);
    assert_eq!(out, "::0x0000000000000099\n:");
    assert!(ctx.calls().is_empty());
}

#[test]
fn session_non_utf8_argument_is_caught() {
    let mut ctx = TestContext::new(1);
    let (end, out) = ctx.session(b"mem \xff\nq\n");
    assert_eq!(end, SessionEnd::Quit);
    assert_eq!(out, "::");
}

#[test]
fn session_quit_stops_reading() {
    let mut ctx = TestContext::new(1);
    let (end, out) = ctx.session("reg 0 0\nq\nreg 0 0\n");
    assert_eq!(end, SessionEnd::Quit);
    assert_eq!(out, ":0x0000000000000000\n:");
}

#[test]
fn session_empty_input_ends_immediately() {
    let mut ctx = TestContext::new(1);
    let (end, out) = ctx.session("");
    assert_eq!(end, SessionEnd::EndOfInput);
    assert_eq!(out, ":");
    assert!(ctx.calls().is_empty());
}

#[test]
fn session_blank_line_continues_execution() {
    let mut ctx = TestContext::new(1);
    let (_, _) = ctx.session("\n\n\n");
    assert_eq!(ctx.steps(0), 3);
}
