//! # Error and Trap Tests
//!
//! Display formatting of traps and fatal simulator errors.

use mcsim_core::common::{LoadError, SimError, Trap};

#[test]
fn test_trap_display_includes_hex_address() {
    assert_eq!(
        Trap::InstructionAccessFault(0x8000_0000).to_string(),
        "InstructionAccessFault(0x80000000)"
    );
    assert_eq!(Trap::LoadAccessFault(0x1000).to_string(), "LoadAccessFault(0x1000)");
    assert_eq!(Trap::IllegalInstruction(0).to_string(), "IllegalInstruction(0x0)");
}

#[test]
fn test_trap_illegal_access_display() {
    let trap = Trap::IllegalAccess("core index out of range");
    assert_eq!(trap.to_string(), "IllegalAccess(core index out of range)");
}

#[test]
fn test_trap_is_std_error() {
    let err: Box<dyn std::error::Error> = Box::new(Trap::InstructionAddressMisaligned(0x42));
    assert_eq!(err.to_string(), "InstructionAddressMisaligned(0x42)");
}

#[test]
fn test_sim_error_allocation_message() {
    let err = SimError::Allocation { size: 1 << 40 };
    assert!(err.to_string().contains("couldn't allocate target machine's memory"));
}

#[test]
fn test_sim_error_wraps_trap() {
    let err = SimError::from(Trap::IllegalInstruction(0));
    assert_eq!(err.to_string(), "fatal trap: IllegalInstruction(0x0)");
}

#[test]
fn test_load_error_truncated_segment_message() {
    let err = SimError::from(LoadError::TruncatedSegment { addr: 0x100, len: 64 });
    assert_eq!(
        err.to_string(),
        "segment at 0x100 (64 bytes) is truncated in the image file"
    );
}
