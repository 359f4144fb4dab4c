//! Backend Module
//!
//! Interchangeable byte-storage engines behind one low-level contract.
//!
//! ## Responsibilities
//! - Open the medium at a requested access and report its capacity
//! - Raw positional reads and writes (no bounds or access checks)
//! - Resize, load, flush, close, delete of the medium
//!
//! Lifecycle, access negotiation and validation live in [`crate::store::Store`];
//! a backend only ever sees calls the store has already validated.
//!
//! ## Variants
//! ```text
//! ┌──────────────┬───────────────────────┬────────────────────────────┐
//! │ Backend      │ Medium                │ load / flush               │
//! ├──────────────┼───────────────────────┼────────────────────────────┤
//! │ Memory       │ heap buffer           │ no-ops                     │
//! │ File         │ file, direct syscalls │ no-ops                     │
//! │ Mapped       │ memory-mapped file    │ page in / write back dirty │
//! └──────────────┴───────────────────────┴────────────────────────────┘
//! ```

mod file;
mod mapped;
mod memory;

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

pub use file::FileBackend;
pub use mapped::{MappedBackend, MappedRegion};
pub use memory::MemoryBackend;

use crate::store::Access;

/// Low-level byte storage contract implemented by every medium.
///
/// Any `Err` returned from `open` means the requested access was not granted;
/// the store then retries at the next weaker level.
pub trait Backend: Send {
    /// Open the medium with the given access, returning its current capacity
    fn open(&mut self, access: Access) -> io::Result<usize>;

    /// Bring persisted content into memory
    fn load(&mut self) -> io::Result<()>;

    /// Write buffered changes back to the medium
    fn flush(&mut self) -> io::Result<()>;

    /// Release the medium; called once per successful open
    fn close(&mut self) -> io::Result<()>;

    /// Resize the open medium, returning the resulting capacity
    fn resize(&mut self, capacity: usize) -> io::Result<usize>;

    /// Whether the persisted medium exists
    fn exists(&self) -> bool;

    /// Destroy the persisted medium; deleting a missing medium succeeds
    fn delete(&mut self) -> io::Result<()>;

    /// Fill `dst` with the bytes starting at `location`
    fn read_at(&mut self, location: usize, dst: &mut [u8]) -> io::Result<()>;

    /// Write all of `src` starting at `location`
    fn write_at(&mut self, location: usize, src: &[u8]) -> io::Result<()>;
}

// =============================================================================
// Shared File Helpers (used by file and mapped backends)
// =============================================================================

/// Error reported when a backend is used before `open`
pub(crate) fn not_open() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "backend is not open")
}

/// Open (creating if absent) a file with permissions and mode matching `access`.
///
/// With `Exclusive` access an advisory lock is taken without blocking; a held
/// lock surfaces as an error so the store falls back to a weaker level. The
/// lock is taken before permissions change, so a refused attempt leaves the
/// file's mode untouched.
pub(crate) fn open_file(path: &Path, access: Access) -> io::Result<File> {
    if !path.exists() {
        OpenOptions::new().create(true).write(true).open(path)?;
    }

    // The mode may not allow writing yet, so the lock is first taken on a
    // read handle. UFCS keeps these calls on fs2 rather than std's inherent
    // File locking methods.
    let guard = if access.can_lock() {
        let guard = File::open(path)?;
        fs2::FileExt::try_lock_exclusive(&guard)?;
        Some(guard)
    } else {
        None
    };

    apply_permissions(path, access)?;

    let file = OpenOptions::new()
        .read(true)
        .write(access.can_write())
        .open(path)?;

    // flock conflicts between handles of one process, so the read handle
    // must let go before the kept handle takes over the lock
    if let Some(guard) = guard {
        fs2::FileExt::unlock(&guard)?;
        drop(guard);
        fs2::FileExt::try_lock_exclusive(&file)?;
    }

    Ok(file)
}

/// Remove a file, treating an already missing file as success
pub(crate) fn remove_file(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Capacity of an open file, clamped to the address space
pub(crate) fn file_capacity(file: &File) -> io::Result<usize> {
    let len = file.metadata()?.len();
    Ok(usize::try_from(len).unwrap_or(usize::MAX))
}

fn apply_permissions(path: &Path, access: Access) -> io::Result<()> {
    let mut permissions = fs::metadata(path)?.permissions();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        permissions.set_mode(permission_bits(permissions.mode(), access));
    }

    #[cfg(not(unix))]
    permissions.set_readonly(!access.can_write());

    fs::set_permissions(path, permissions)
}

/// Owner-only bits when locking, everyone's bits otherwise
#[cfg(unix)]
fn permission_bits(mode: u32, access: Access) -> u32 {
    let (read, write) = if access.can_lock() {
        (0o400, 0o200)
    } else {
        (0o444, 0o222)
    };

    let mode = if access.can_read() { mode | read } else { mode & !0o444 };
    if access.can_write() {
        mode | write
    } else {
        mode & !0o222
    }
}
