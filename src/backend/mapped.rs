//! Mapped Backend
//!
//! Maps the whole file into memory. Reads and writes touch the mapping only;
//! `load` pages content in and `flush` writes dirty pages back to the file.
//!
//! ## Mapping Ownership
//! The mapping is an owned [`MappedRegion`]. Dropping (or releasing) it
//! unmaps the native region exactly once. Resize and close take the region
//! out of the backend before touching the file, so nothing can read or write
//! a mapping after it has been unmapped.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use memmap2::{Mmap, MmapMut, MmapOptions};

use super::{file_capacity, not_open, open_file, remove_file, Backend};
use crate::store::Access;

/// Stride used when touching a mapping to page it in. Only the touch
/// granularity; systems with larger pages just see redundant touches.
const PAGE_SIZE: usize = 4096;

/// An owned memory mapping of a file, read-only or read-write
pub enum MappedRegion {
    ReadOnly(Mmap),
    ReadWrite(MmapMut),
}

impl MappedRegion {
    /// Map `len` bytes of `file` with the mode matching `access`.
    ///
    /// Returns `None` for an empty file; there is nothing to map.
    fn map(file: &File, len: usize, access: Access) -> io::Result<Option<Self>> {
        if len == 0 {
            return Ok(None);
        }

        let mut options = MmapOptions::new();
        options.len(len);

        // SAFETY: the file handle is owned by the backend for the lifetime of
        // the mapping, and the mapping is dropped before the file is resized
        // or closed. Other processes may still modify the file; that race is
        // accepted for stores opened without exclusive access.
        let region = if access.can_write() {
            MappedRegion::ReadWrite(unsafe { options.map_mut(file)? })
        } else {
            MappedRegion::ReadOnly(unsafe { options.map(file)? })
        };

        Ok(Some(region))
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        match self {
            MappedRegion::ReadOnly(map) => &map[..],
            MappedRegion::ReadWrite(map) => &map[..],
        }
    }

    /// Writable view; fails for read-only mappings
    pub fn as_mut_slice(&mut self) -> io::Result<&mut [u8]> {
        match self {
            MappedRegion::ReadWrite(map) => Ok(&mut map[..]),
            MappedRegion::ReadOnly(_) => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "mapping is read-only",
            )),
        }
    }

    /// Touch one byte per page so the OS faults the content in
    pub fn load(&self) {
        let bytes = self.as_slice();
        let mut checksum = 0u8;
        for offset in (0..bytes.len()).step_by(PAGE_SIZE) {
            checksum = checksum.wrapping_add(bytes[offset]);
        }
        std::hint::black_box(checksum);
    }

    /// Write dirty pages back to the file
    pub fn flush(&self) -> io::Result<()> {
        match self {
            MappedRegion::ReadWrite(map) => map.flush(),
            MappedRegion::ReadOnly(_) => Ok(()),
        }
    }

    /// Unmap the region now. Consuming `self` makes any later access a
    /// compile error rather than a dangling read.
    pub fn release(self) {
        drop(self);
    }
}

/// Memory-mapped file byte storage
pub struct MappedBackend {
    /// The persisted medium
    path: PathBuf,

    /// Open handle; holds the advisory lock when opened exclusively
    file: Option<File>,

    /// Current mapping, `None` when closed or the file is empty
    region: Option<MappedRegion>,

    /// Access the mapping was created with, reused on remap
    access: Access,
}

impl MappedBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
            region: None,
            access: Access::ReadOnly,
        }
    }

    /// Path of the persisted medium
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current mapping, if the store is open and non-empty
    pub fn region(&self) -> Option<&MappedRegion> {
        self.region.as_ref()
    }

    fn unmap(&mut self) {
        if let Some(region) = self.region.take() {
            region.release();
        }
    }

    fn region_for(&mut self, location: usize, len: usize) -> io::Result<&mut MappedRegion> {
        if self.file.is_none() {
            return Err(not_open());
        }
        // Zero-length I/O against an empty file has no region to touch
        self.region.as_mut().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no mapping for {} bytes at {}", len, location),
            )
        })
    }
}

impl Backend for MappedBackend {
    fn open(&mut self, access: Access) -> io::Result<usize> {
        let file = open_file(&self.path, access)?;
        let capacity = file_capacity(&file)?;

        self.region = MappedRegion::map(&file, capacity, access)?;
        self.file = Some(file);
        self.access = access;

        Ok(capacity)
    }

    fn load(&mut self) -> io::Result<()> {
        if let Some(region) = &self.region {
            region.load();
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        match &self.region {
            Some(region) => region.flush(),
            None => Ok(()),
        }
    }

    /// Flushes, unmaps, then syncs and drops the file handle
    fn close(&mut self) -> io::Result<()> {
        let flushed = self.flush();
        self.unmap();

        let synced = match self.file.take() {
            Some(file) => file.sync_all(),
            None => Ok(()),
        };

        flushed.and(synced)
    }

    fn resize(&mut self, capacity: usize) -> io::Result<usize> {
        self.unmap();

        let file = self.file.as_ref().ok_or_else(not_open)?;
        file.set_len(capacity as u64)?;
        let capacity = file_capacity(file)?;

        self.region = MappedRegion::map(file, capacity, self.access)?;
        self.load()?;

        Ok(capacity)
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn delete(&mut self) -> io::Result<()> {
        remove_file(&self.path)
    }

    fn read_at(&mut self, location: usize, dst: &mut [u8]) -> io::Result<()> {
        if dst.is_empty() {
            return Ok(());
        }
        let region = self.region_for(location, dst.len())?;
        dst.copy_from_slice(&region.as_slice()[location..location + dst.len()]);
        Ok(())
    }

    fn write_at(&mut self, location: usize, src: &[u8]) -> io::Result<()> {
        if src.is_empty() {
            return Ok(());
        }
        let region = self.region_for(location, src.len())?;
        region.as_mut_slice()?[location..location + src.len()].copy_from_slice(src);
        Ok(())
    }
}

impl Drop for MappedBackend {
    fn drop(&mut self) {
        self.unmap();
    }
}
