//! Executable Image Loader.
//!
//! This module turns an image file on disk into a sequence of writes against an
//! [`ImageSink`]. It performs:
//! 1. **Format detection:** ELF32/ELF64 images are recognised with the `object` crate;
//!    anything else is treated as a raw binary.
//! 2. **Segment loading:** Each `PT_LOAD` segment writes its file bytes at its physical
//!    address and zero-fills the remainder of its memory size.
//! 3. **Entry point:** The ELF entry point (or 0 for raw binaries) is returned so the
//!    caller can position every hart.
//!
//! Bounds are not checked here. The sink owns the physical memory and decides what an
//! out-of-range write means.

use std::fs;
use std::path::Path;

use object::elf::{FileHeader32, FileHeader64, PT_LOAD};
use object::read::elf::{FileHeader, ProgramHeader};
use object::{Endianness, FileKind};
use tracing::{debug, info};

use crate::common::LoadError;

/// Write target for image loading.
pub trait ImageSink {
    /// Writes `len` bytes at physical address `addr`.
    ///
    /// With `Some(src)`, copies the first `len` bytes of `src`; with `None`,
    /// zero-fills the range.
    fn write(&mut self, addr: u64, len: usize, src: Option<&[u8]>);
}

/// Reads a file from disk into a byte vector.
///
/// # Errors
///
/// Returns [`LoadError::Read`] if the file cannot be read.
pub fn load_binary(path: &Path) -> Result<Vec<u8>, LoadError> {
    fs::read(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the image at `path` into `sink` and returns its entry point.
///
/// # Errors
///
/// Returns a [`LoadError`] if the file cannot be read or is a malformed ELF image.
pub fn load_image(path: &Path, sink: &mut dyn ImageSink) -> Result<u64, LoadError> {
    let data = load_binary(path)?;
    let entry = load_bytes(&data, sink)?;
    info!(path = %path.display(), bytes = data.len(), entry = format_args!("{entry:#x}"), "image loaded");
    Ok(entry)
}

/// Loads an in-memory image into `sink` and returns its entry point.
///
/// # Errors
///
/// Returns a [`LoadError`] if `data` is a malformed ELF image.
pub fn load_bytes(data: &[u8], sink: &mut dyn ImageSink) -> Result<u64, LoadError> {
    match FileKind::parse(data) {
        Ok(FileKind::Elf64) => load_elf::<FileHeader64<Endianness>>(data, sink),
        Ok(FileKind::Elf32) => load_elf::<FileHeader32<Endianness>>(data, sink),
        _ => {
            debug!(bytes = data.len(), "raw binary image at 0x0");
            if !data.is_empty() {
                sink.write(0, data.len(), Some(data));
            }
            Ok(0)
        }
    }
}

fn load_elf<Elf>(data: &[u8], sink: &mut dyn ImageSink) -> Result<u64, LoadError>
where
    Elf: FileHeader<Endian = Endianness>,
{
    let header = Elf::parse(data)?;
    let endian = header.endian()?;

    for phdr in header.program_headers(endian, data)? {
        if phdr.p_type(endian) != PT_LOAD {
            continue;
        }
        let addr: u64 = phdr.p_paddr(endian).into();
        let offset: u64 = phdr.p_offset(endian).into();
        let filesz: u64 = phdr.p_filesz(endian).into();
        let memsz: u64 = phdr.p_memsz(endian).into();
        debug!(
            addr = format_args!("{addr:#x}"),
            filesz, memsz, "loading segment"
        );

        if filesz > 0 {
            let bytes = usize::try_from(offset)
                .ok()
                .zip(usize::try_from(filesz).ok())
                .and_then(|(start, len)| data.get(start..start.checked_add(len)?))
                .ok_or(LoadError::TruncatedSegment { addr, len: filesz })?;
            sink.write(addr, bytes.len(), Some(bytes));
        }
        if memsz > filesz {
            sink.write(
                addr.wrapping_add(filesz),
                (memsz - filesz) as usize,
                None,
            );
        }
    }

    Ok(header.e_entry(endian).into())
}
