//! Memory Access Widths.
//!
//! This module defines the access widths used by the debugger's sized memory reader.
//! It provides:
//! 1. **Width Classification:** Byte, half-word, word, and double-word loads.
//! 2. **Alignment Inference:** Mapping a physical address to the width the debugger
//!    reads at that address.

/// Width of a single memory load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessWidth {
    /// 1-byte load.
    Byte,
    /// 2-byte load.
    Half,
    /// 4-byte load.
    Word,
    /// 8-byte load.
    Double,
}

impl AccessWidth {
    /// Infers the load width from the address alignment.
    ///
    /// `addr % 8 == 0` reads 8 bytes, `addr % 8 == 4` reads 4 bytes,
    /// `addr % 8` in `{2, 6}` reads 2 bytes, and every other residue reads 1 byte.
    /// The width is a guess from the residue alone: a value stored at an address
    /// that is not naturally aligned for its true width is read narrower than it was written.
    #[inline]
    pub const fn from_alignment(addr: u64) -> Self {
        match addr % 8 {
            0 => Self::Double,
            4 => Self::Word,
            2 | 6 => Self::Half,
            _ => Self::Byte,
        }
    }

    /// Returns the width in bytes.
    #[inline]
    pub const fn bytes(self) -> usize {
        match self {
            Self::Byte => 1,
            Self::Half => 2,
            Self::Word => 4,
            Self::Double => 8,
        }
    }
}
