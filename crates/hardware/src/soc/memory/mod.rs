//! Physical System Memory.
//!
//! This module implements the target machine's physical memory. It provides:
//! 1. **Buffer:** The shared, bounds-checked [`AddressSpace`].
//! 2. **Loader Adapter:** The write-only view used while an image is being loaded.
//! 3. **Inspection:** The debugger's alignment-sized reader.

/// Address space buffer (mmap or boxed slice) for raw byte storage.
pub mod buffer;

/// Alignment-sized loads for the debug console.
pub mod inspect;

pub use self::buffer::AddressSpace;

use crate::sim::loader::ImageSink;

/// Write-only view over the address space used exclusively during image loading.
///
/// This is the only component that performs unconstrained writes before execution
/// starts. Any write that does not fit in physical memory is fatal: an image that
/// does not fit is malformed or oversized and cannot be corrected at runtime.
#[derive(Debug)]
pub struct LoaderAdapter<'a> {
    mem: &'a AddressSpace,
}

impl<'a> LoaderAdapter<'a> {
    /// Creates a loader view over `mem`.
    pub const fn new(mem: &'a AddressSpace) -> Self {
        Self { mem }
    }
}

impl ImageSink for LoaderAdapter<'_> {
    /// Copies `len` bytes from `src` to `addr`, or zero-fills when `src` is `None`.
    ///
    /// # Panics
    ///
    /// Panics if `addr + len` exceeds the address space, or if `src` holds fewer
    /// than `len` bytes.
    fn write(&mut self, addr: u64, len: usize, src: Option<&[u8]>) {
        assert!(
            self.mem.contains(addr, len),
            "out of bounds! image write of {len} bytes at {addr:#x} exceeds {} bytes of physical memory",
            self.mem.len()
        );
        let offset = addr as usize;
        match src {
            Some(bytes) => {
                assert!(
                    bytes.len() >= len,
                    "image write at {addr:#x} supplied {} of {len} bytes",
                    bytes.len()
                );
                self.mem.write_slice(offset, &bytes[..len]);
            }
            None => self.mem.fill(offset, len, 0),
        }
    }
}
