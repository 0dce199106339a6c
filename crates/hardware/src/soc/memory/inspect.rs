//! Sized memory reader for the debug console.
//!
//! The debugger never names a width. Instead the width is inferred from the address
//! residue (see [`AccessWidth::from_alignment`]) and the value is loaded little-endian
//! and zero-extended to 64 bits. Reading a narrower width than the stored value
//! returns only the bytes at `addr..addr + width`; e.g. with the double-word
//! `0x1122_3344_5566_7788` stored at `0x10`, reading `0x14` yields `0x1122_3344`,
//! `0x12` yields `0x5566`, and `0x11` yields `0x77`.

use crate::common::{AccessWidth, Trap};

use super::AddressSpace;

/// Reads the value at `addr` using the alignment-inferred width.
///
/// # Errors
///
/// Returns [`Trap::LoadAccessFault`] if the access does not fit in physical memory.
pub fn read_sized(mem: &AddressSpace, addr: u64) -> Result<u64, Trap> {
    let width = AccessWidth::from_alignment(addr);
    if !mem.contains(addr, width.bytes()) {
        return Err(Trap::LoadAccessFault(addr));
    }
    let offset = addr as usize;
    let val = match width {
        AccessWidth::Double => u64::from_le_bytes(mem.read_array(offset)),
        AccessWidth::Word => u64::from(u32::from_le_bytes(mem.read_array(offset))),
        AccessWidth::Half => u64::from(u16::from_le_bytes(mem.read_array(offset))),
        AccessWidth::Byte => u64::from(mem.read_u8(offset)),
    };
    Ok(val)
}
