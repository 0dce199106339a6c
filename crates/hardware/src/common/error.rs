//! Trap and simulator error definitions.
//!
//! This module defines the two fault classes of the simulator. It provides:
//! 1. **Trap Representation:** Recoverable processor and debugger faults raised by harts
//!    and by console accessors.
//! 2. **Fatal Errors:** Allocation, configuration, and image-loading failures that end the
//!    process before (or instead of) simulation.
//! 3. **Error Handling:** Integration with standard Rust error traits via `thiserror`.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Processor-level or protocol-level fault.
///
/// Traps are never persisted. Inside the debug console they are caught at the
/// dispatch boundary and discarded; in headless execution they propagate out of
/// the scheduler and terminate the run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Trap {
    /// Instruction address misaligned exception.
    ///
    /// The associated value is the misaligned program counter.
    InstructionAddressMisaligned(u64),

    /// Instruction access fault exception.
    ///
    /// Raised when an instruction fetch falls outside physical memory.
    /// The associated value is the faulting address.
    InstructionAccessFault(u64),

    /// Illegal instruction exception.
    ///
    /// The associated value is the instruction encoding.
    IllegalInstruction(u32),

    /// Load access fault.
    ///
    /// Raised when a load (including a debugger memory inspection) falls outside
    /// physical memory. The associated value is the faulting address.
    LoadAccessFault(u64),

    /// Illegal debugger access: wrong argument count, out-of-range core or
    /// register index, or an argument that does not parse.
    IllegalAccess(&'static str),
}

impl fmt::Display for Trap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InstructionAddressMisaligned(addr) => {
                write!(f, "InstructionAddressMisaligned({addr:#x})")
            }
            Self::InstructionAccessFault(addr) => write!(f, "InstructionAccessFault({addr:#x})"),
            Self::IllegalInstruction(inst) => write!(f, "IllegalInstruction({inst:#x})"),
            Self::LoadAccessFault(addr) => write!(f, "LoadAccessFault({addr:#x})"),
            Self::IllegalAccess(reason) => write!(f, "IllegalAccess({reason})"),
        }
    }
}

impl std::error::Error for Trap {}

/// Errors raised while reading or parsing an executable image.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The image file could not be read.
    #[error("could not read image '{}': {source}", path.display())]
    Read {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file looked like an ELF image but could not be parsed.
    #[error("malformed ELF image: {0}")]
    Parse(#[from] object::Error),

    /// A loadable segment's file range lies outside the image file.
    #[error("segment at {addr:#x} ({len} bytes) is truncated in the image file")]
    TruncatedSegment {
        /// Physical load address of the segment.
        addr: u64,
        /// Number of file bytes the segment claims.
        len: u64,
    },
}

/// Fatal simulator errors.
///
/// None of these are recoverable at runtime; the binary reports them and exits.
#[derive(Debug, Error)]
pub enum SimError {
    /// The host could not back the target machine's physical memory.
    #[error("couldn't allocate target machine's memory ({size} bytes)")]
    Allocation {
        /// Requested size in bytes.
        size: usize,
    },

    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Image loading failed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Configuration file could not be parsed.
    #[error("invalid configuration file: {0}")]
    Config(#[from] serde_json::Error),

    /// A hart trapped outside any console fault boundary.
    #[error("fatal trap: {0}")]
    Trap(#[from] Trap),

    /// Host I/O failure (configuration file, console streams).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
