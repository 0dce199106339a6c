//! Physical Address Space Buffer.
//!
//! This module provides a safe wrapper around the raw allocation backing the target
//! machine's physical memory. It supports lazy allocation via `mmap` on Unix systems so
//! large memories cost nothing until touched, and it provides interior mutability so
//! every hart can read and write the one shared buffer through a plain reference.

use std::fmt;

use crate::common::SimError;

/// The flat, fixed-size, byte-addressable physical memory shared by all harts.
///
/// Every access `(addr, len)` must satisfy `addr + len <= len()`. The byte-level
/// accessors assert this: an out-of-bounds access that reaches the buffer is a
/// fatal error, not a recoverable one. Callers that need a recoverable fault
/// (harts raising access-fault traps, the debugger) check with [`Self::contains`] first.
///
/// The buffer is deliberately neither `Send` nor `Sync`: sharing it without locks is
/// only sound while a single thread advances one hart at a time.
pub struct AddressSpace {
    ptr: *mut u8,
    size: usize,
    is_mmap: bool,
}

impl AddressSpace {
    /// Reserves `size` zero-initialised bytes of target physical memory.
    ///
    /// On Unix, uses an anonymous private `mmap`; elsewhere, a boxed slice.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] for a zero size and
    /// [`SimError::Allocation`] when the host cannot satisfy the request.
    pub fn new(size: usize) -> Result<Self, SimError> {
        if size == 0 {
            return Err(SimError::InvalidConfig(
                "memory size must be non-zero".to_string(),
            ));
        }

        #[cfg(unix)]
        {
            use std::ptr;
            // SAFETY: anonymous private mapping with no fixed address; the kernel
            // chooses the placement and we check for MAP_FAILED below.
            let ptr = unsafe {
                libc::mmap(
                    ptr::null_mut(),
                    size,
                    libc::PROT_READ | libc::PROT_WRITE,
                    libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                    -1,
                    0,
                )
            };

            if ptr == libc::MAP_FAILED {
                return Err(SimError::Allocation { size });
            }

            Ok(Self {
                ptr: ptr.cast::<u8>(),
                size,
                is_mmap: true,
            })
        }

        #[cfg(not(unix))]
        {
            let mut vec: Vec<u8> = Vec::new();
            vec.try_reserve_exact(size)
                .map_err(|_| SimError::Allocation { size })?;
            vec.resize(size, 0);
            let ptr = Box::into_raw(vec.into_boxed_slice()).cast::<u8>();
            Ok(Self {
                ptr,
                size,
                is_mmap: false,
            })
        }
    }

    /// Returns the size of the address space in bytes.
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Always `false`; a zero-sized address space cannot be constructed.
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns `true` if `[addr, addr + len)` lies entirely inside the address space.
    #[inline]
    pub fn contains(&self, addr: u64, len: usize) -> bool {
        addr.checked_add(len as u64)
            .is_some_and(|end| end <= self.size as u64)
    }

    /// Reads a single byte.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is out of bounds.
    pub fn read_u8(&self, offset: usize) -> u8 {
        assert!(offset < self.size, "physical memory read out of bounds");
        // SAFETY: offset < size, and the allocation is live for the lifetime of self.
        unsafe { *self.ptr.add(offset) }
    }

    /// Copies `buf.len()` bytes starting at `offset` into `buf`.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    pub fn read_into(&self, offset: usize, buf: &mut [u8]) {
        assert!(
            offset
                .checked_add(buf.len())
                .is_some_and(|end| end <= self.size),
            "physical memory read out of bounds"
        );
        // SAFETY: the source range was bounds-checked above and cannot overlap `buf`,
        // which is a distinct Rust allocation.
        unsafe {
            std::ptr::copy_nonoverlapping(self.ptr.add(offset), buf.as_mut_ptr(), buf.len());
        }
    }

    /// Reads `N` consecutive bytes starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    pub fn read_array<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut out = [0u8; N];
        self.read_into(offset, &mut out);
        out
    }

    /// Writes a single byte.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is out of bounds.
    pub fn write_u8(&self, offset: usize, val: u8) {
        assert!(offset < self.size, "physical memory write out of bounds");
        // SAFETY: offset < size; no reference into the buffer is ever handed out,
        // so this write cannot alias a live borrow.
        unsafe {
            *self.ptr.add(offset) = val;
        }
    }

    /// Copies `data` into the buffer at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    pub fn write_slice(&self, offset: usize, data: &[u8]) {
        assert!(
            offset
                .checked_add(data.len())
                .is_some_and(|end| end <= self.size),
            "physical memory write out of bounds"
        );
        // SAFETY: destination range bounds-checked above; `data` is a separate allocation.
        unsafe {
            std::ptr::copy_nonoverlapping(data.as_ptr(), self.ptr.add(offset), data.len());
        }
    }

    /// Sets `len` bytes starting at `offset` to `val`.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    pub fn fill(&self, offset: usize, len: usize, val: u8) {
        assert!(
            offset.checked_add(len).is_some_and(|end| end <= self.size),
            "physical memory write out of bounds"
        );
        // SAFETY: destination range bounds-checked above.
        unsafe {
            std::ptr::write_bytes(self.ptr.add(offset), val, len);
        }
    }
}

impl fmt::Debug for AddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressSpace")
            .field("size", &self.size)
            .field("is_mmap", &self.is_mmap)
            .finish_non_exhaustive()
    }
}

impl Drop for AddressSpace {
    /// Releases the backing allocation.
    fn drop(&mut self) {
        if self.is_mmap {
            #[cfg(unix)]
            // SAFETY: ptr/size describe exactly the mapping created in `new`.
            unsafe {
                let _ = libc::munmap(self.ptr.cast::<libc::c_void>(), self.size);
            }
        } else {
            #[cfg(not(unix))]
            // SAFETY: ptr/size came from `Box::into_raw` on a boxed slice of this length.
            unsafe {
                drop(Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    self.ptr, self.size,
                )));
            }
        }
    }
}
