//! Store lifecycle core
//!
//! Wraps any backend with the shared open/close/resize state machine,
//! access negotiation, auto behaviors and byte I/O validation.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Range;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use bytes::{Buf, BufMut};
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use super::Access;
use crate::backend::{Backend, FileBackend, MappedBackend, MemoryBackend};
use crate::config::StoreConfig;
use crate::error::{AtlasError, Result};

/// A named byte-addressable region over one backend.
///
/// ## Concurrency:
/// - `state`: one coarse mutex per store. Every operation holds it across the
///   whole "check state → backend call → update state" sequence, so opens,
///   closes, resizes, reads and writes on one store never interleave.
/// - Auto flags: atomics, readable and settable at any time without the lock.
/// - Distinct stores are not coordinated beyond the advisory lock taken with
///   `Access::Exclusive`.
pub struct Store {
    /// Unique name (file path for file-backed stores)
    name: String,

    auto_open: AtomicBool,
    auto_flush: AtomicBool,
    auto_load: AtomicBool,

    /// Lifecycle state plus the backend it guards
    state: Mutex<StoreState>,
}

/// Mutable state guarded by the store mutex
struct StoreState {
    backend: Box<dyn Backend>,

    /// Granted access while open, configured access while closed
    access: Access,

    closed: bool,

    /// Actual capacity reported by the backend
    capacity: usize,
}

impl Store {
    /// Create a closed store over `backend` with the default configuration
    pub fn new(name: impl Into<String>, backend: impl Backend + 'static) -> Self {
        Self::with_config(name, backend, StoreConfig::default())
    }

    /// Create a closed store over `backend`
    pub fn with_config(
        name: impl Into<String>,
        backend: impl Backend + 'static,
        config: StoreConfig,
    ) -> Self {
        Self {
            name: name.into(),
            auto_open: AtomicBool::new(config.auto_open),
            auto_flush: AtomicBool::new(config.auto_flush),
            auto_load: AtomicBool::new(config.auto_load),
            state: Mutex::new(StoreState {
                backend: Box::new(backend),
                access: config.access,
                closed: true,
                capacity: 0,
            }),
        }
    }

    /// A closed in-memory store that allocates `capacity` bytes on open
    pub fn memory(name: impl Into<String>, capacity: usize) -> Self {
        Self::new(name, MemoryBackend::new(capacity))
    }

    /// A closed store backed by a plain file, named by its path
    pub fn file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::new(path.to_string_lossy(), FileBackend::new(path))
    }

    /// A closed store backed by a memory-mapped file, named by its path
    pub fn mapped(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::new(path.to_string_lossy(), MappedBackend::new(path))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Open with `access` (falling back as needed), then resize to `capacity`.
    ///
    /// Existing content of the medium is kept; the resize is skipped when the
    /// medium already has the requested capacity.
    pub fn create(&self, access: Access, capacity: usize) -> Result<Option<Access>> {
        let mut state = self.state.lock();

        if state.open(&self.name, access)?.is_some() && state.capacity != capacity {
            state.resize(&self.name, self.auto_open(), capacity)?;
        }

        Ok(state.granted())
    }

    /// Open with `access`, falling back to weaker levels until one is granted.
    ///
    /// Returns the granted access, or `None` when no level could be granted
    /// and the store remains closed. Reopening with the current access is a
    /// no-op; any other access closes the store first.
    pub fn open(&self, access: Access) -> Result<Option<Access>> {
        self.state.lock().open(&self.name, access)
    }

    /// Bring persisted content into memory (opens first if auto-open is set)
    pub fn load(&self) -> Result<()> {
        self.state.lock().load(&self.name, self.auto_open())
    }

    /// Write buffered changes to the medium; a no-op on a closed store
    pub fn flush(&self) -> Result<()> {
        self.state.lock().flush()
    }

    /// Flush and close. The store is marked closed even if the backend fails.
    pub fn close(&self) -> Result<()> {
        self.state.lock().close(&self.name)
    }

    /// Close, then destroy the persisted medium. Requires write access.
    pub fn delete(&self) -> Result<()> {
        self.state.lock().delete(&self.name)
    }

    /// Whether the store is open or its medium exists
    pub fn exists(&self) -> bool {
        let state = self.state.lock();
        !state.closed || state.backend.exists()
    }

    pub fn is_open(&self) -> bool {
        !self.state.lock().closed
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    // =========================================================================
    // Capacity & Access
    // =========================================================================

    /// Current capacity in bytes
    pub fn capacity(&self) -> usize {
        self.state.lock().capacity
    }

    /// Resize the store, returning the capacity the backend actually adopted.
    ///
    /// Requires an open store (or auto-open) and write access.
    pub fn set_capacity(&self, capacity: usize) -> Result<usize> {
        self.state.lock().resize(&self.name, self.auto_open(), capacity)
    }

    /// Granted access while open, configured access while closed
    pub fn access(&self) -> Access {
        self.state.lock().access
    }

    /// Change access. A closed store only records it; an open store is
    /// closed and reopened with the usual fallback.
    pub fn set_access(&self, access: Access) -> Result<Option<Access>> {
        let mut state = self.state.lock();

        if state.closed {
            state.access = access;
            return Ok(Some(access));
        }

        state.close(&self.name)?;
        state.open(&self.name, access)
    }

    /// Snapshot of the current access and auto flags
    pub fn config(&self) -> StoreConfig {
        StoreConfig {
            access: self.access(),
            auto_open: self.auto_open(),
            auto_flush: self.auto_flush(),
            auto_load: self.auto_load(),
        }
    }

    // =========================================================================
    // Auto Flags
    // =========================================================================

    pub fn auto_open(&self) -> bool {
        self.auto_open.load(Ordering::Acquire)
    }

    pub fn set_auto_open(&self, enabled: bool) {
        self.auto_open.store(enabled, Ordering::Release);
    }

    pub fn auto_flush(&self) -> bool {
        self.auto_flush.load(Ordering::Acquire)
    }

    pub fn set_auto_flush(&self, enabled: bool) {
        self.auto_flush.store(enabled, Ordering::Release);
    }

    pub fn auto_load(&self) -> bool {
        self.auto_load.load(Ordering::Acquire)
    }

    pub fn set_auto_load(&self, enabled: bool) {
        self.auto_load.store(enabled, Ordering::Release);
    }

    // =========================================================================
    // Byte Reads
    // =========================================================================

    /// Fill `dst` with the bytes at `location`
    pub fn get(&self, location: usize, dst: &mut [u8]) -> Result<()> {
        let mut state = self.state.lock();
        state.prepare_read(&self.name, self.auto_open(), self.auto_load())?;
        state.check_bounds(location, dst.len())?;

        trace!(store = %self.name, location, len = dst.len(), "get");
        state.backend.read_at(location, dst)?;
        Ok(())
    }

    /// Read `length` bytes at `location` into `dst[offset..offset + length]`
    pub fn get_range(
        &self,
        location: usize,
        dst: &mut [u8],
        offset: usize,
        length: usize,
    ) -> Result<()> {
        let range = sub_range(dst.len(), offset, length)?;
        self.get(location, &mut dst[range])
    }

    /// Read `len` bytes at `location` into a new vector
    pub fn get_vec(&self, location: usize, len: usize) -> Result<Vec<u8>> {
        let mut data = vec![0u8; len];
        self.get(location, &mut data)?;
        Ok(data)
    }

    /// Read `len` bytes at `location` and append them to `dst`
    pub fn get_buf<B: BufMut>(&self, location: usize, dst: &mut B, len: usize) -> Result<()> {
        if dst.remaining_mut() < len {
            return Err(AtlasError::OutOfBounds {
                location: 0,
                size: len,
                capacity: dst.remaining_mut(),
            });
        }

        let data = self.get_vec(location, len)?;
        dst.put_slice(&data);
        Ok(())
    }

    // =========================================================================
    // Byte Writes
    // =========================================================================

    /// Write all of `src` at `location`
    pub fn put(&self, location: usize, src: &[u8]) -> Result<()> {
        let mut state = self.state.lock();
        state.prepare_write(&self.name, self.auto_open())?;
        state.check_bounds(location, src.len())?;

        trace!(store = %self.name, location, len = src.len(), "put");
        state.backend.write_at(location, src)?;

        if self.auto_flush() {
            state.flush()?;
        }
        Ok(())
    }

    /// Write `src[offset..offset + length]` at `location`
    pub fn put_range(&self, location: usize, src: &[u8], offset: usize, length: usize) -> Result<()> {
        let range = sub_range(src.len(), offset, length)?;
        self.put(location, &src[range])
    }

    /// Write every remaining byte of `src` at `location`, advancing `src`
    pub fn put_buf<B: Buf>(&self, location: usize, src: &mut B) -> Result<()> {
        let mut state = self.state.lock();
        state.prepare_write(&self.name, self.auto_open())?;
        state.check_bounds(location, src.remaining())?;

        trace!(store = %self.name, location, len = src.remaining(), "put_buf");
        let mut cursor = location;
        while src.has_remaining() {
            let chunk = src.chunk();
            let len = chunk.len();
            state.backend.write_at(cursor, chunk)?;
            src.advance(len);
            cursor += len;
        }

        if self.auto_flush() {
            state.flush()?;
        }
        Ok(())
    }
}

// =============================================================================
// Locked State Transitions
// =============================================================================

impl StoreState {
    fn granted(&self) -> Option<Access> {
        (!self.closed).then_some(self.access)
    }

    fn open(&mut self, name: &str, requested: Access) -> Result<Option<Access>> {
        if !self.closed && self.access == requested {
            return Ok(Some(requested));
        }

        if !self.closed {
            self.close(name)?;
        }

        // Negotiate: each refused level falls back to the next weaker one
        let mut candidate = Some(requested);
        while let Some(access) = candidate {
            match self.backend.open(access) {
                Ok(capacity) => {
                    self.access = access;
                    self.capacity = capacity;
                    self.closed = false;
                    debug!(store = %name, ?requested, granted = ?access, capacity, "Store opened");

                    self.backend.load()?;
                    return Ok(Some(access));
                }
                Err(e) => {
                    debug!(store = %name, ?access, error = %e, "Access not granted");
                    candidate = access.next();
                }
            }
        }

        debug!(store = %name, ?requested, "No access granted, store remains closed");
        Ok(None)
    }

    /// Open with the configured access if allowed; fail if still closed
    fn ensure_open(&mut self, name: &str, auto_open: bool) -> Result<()> {
        if self.closed && auto_open {
            let access = self.access;
            self.open(name, access)?;
        }

        if self.closed {
            return Err(AtlasError::Closed {
                store: name.to_string(),
            });
        }
        Ok(())
    }

    fn load(&mut self, name: &str, auto_open: bool) -> Result<()> {
        self.ensure_open(name, auto_open)?;
        self.backend.load()?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if !self.closed && self.access.can_write() {
            self.backend.flush()?;
        }
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        let flushed = self.flush();
        let released = self.backend.close().map_err(AtlasError::from);

        // Closed regardless of how the backend fared
        self.closed = true;

        match flushed.and(released) {
            Ok(()) => {
                debug!(store = %name, "Store closed");
                Ok(())
            }
            Err(e) => {
                warn!(store = %name, error = %e, "Store closed with errors");
                Err(e)
            }
        }
    }

    fn resize(&mut self, name: &str, auto_open: bool, capacity: usize) -> Result<usize> {
        self.ensure_open(name, auto_open)?;
        self.access.require_write(name, "resize")?;

        if capacity != self.capacity {
            let previous = self.capacity;
            self.capacity = self.backend.resize(capacity)?;
            debug!(store = %name, previous, requested = capacity, capacity = self.capacity, "Store resized");
        }

        Ok(self.capacity)
    }

    fn delete(&mut self, name: &str) -> Result<()> {
        self.access.require_write(name, "delete")?;

        self.close(name)?;
        self.backend.delete()?;

        debug!(store = %name, "Store deleted");
        Ok(())
    }

    fn prepare_read(&mut self, name: &str, auto_open: bool, auto_load: bool) -> Result<()> {
        if auto_load {
            self.load(name, auto_open)?;
        } else {
            self.ensure_open(name, auto_open)?;
        }
        self.access.require_read(name)
    }

    fn prepare_write(&mut self, name: &str, auto_open: bool) -> Result<()> {
        self.ensure_open(name, auto_open)?;
        self.access.require_write(name, "write")
    }

    fn check_bounds(&self, location: usize, len: usize) -> Result<()> {
        match location.checked_add(len) {
            Some(end) if end <= self.capacity => Ok(()),
            _ => Err(AtlasError::OutOfBounds {
                location,
                size: len,
                capacity: self.capacity,
            }),
        }
    }
}

/// Validate `offset..offset + length` against a caller slice of `len` bytes
fn sub_range(len: usize, offset: usize, length: usize) -> Result<Range<usize>> {
    match offset.checked_add(length) {
        Some(end) if end <= len => Ok(offset..end),
        _ => Err(AtlasError::OutOfBounds {
            location: offset,
            size: length,
            capacity: len,
        }),
    }
}

// =============================================================================
// Identity & Drop
// =============================================================================

impl PartialEq for Store {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Store {}

impl Hash for Store {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.name)
            .field("auto_open", &self.auto_open())
            .field("auto_flush", &self.auto_flush())
            .field("auto_load", &self.auto_load())
            .finish_non_exhaustive()
    }
}

impl Drop for Store {
    /// Best-effort close so mapped pages are flushed and locks released
    fn drop(&mut self) {
        let name = &self.name;
        let state = self.state.get_mut();
        if let Err(e) = state.close(name) {
            debug!(store = %name, error = %e, "Close on drop failed");
        }
    }
}
