//! Memory Backend
//!
//! Keeps the whole store in a heap buffer. Nothing is persisted, but the
//! buffer survives close/reopen until the store is deleted.

use std::io;

use bytes::BytesMut;

use super::{not_open, Backend};
use crate::store::Access;

/// In-memory byte storage
pub struct MemoryBackend {
    /// Capacity to allocate on the next open; tracks the last resize
    capacity: usize,

    /// Backing buffer, `None` until first open and after delete
    buffer: Option<BytesMut>,
}

impl MemoryBackend {
    /// Create a backend that allocates `capacity` zeroed bytes when opened
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            buffer: None,
        }
    }

    /// Current backing buffer, if allocated
    pub fn buffer(&self) -> Option<&[u8]> {
        self.buffer.as_deref()
    }

    fn buffer_mut(&mut self) -> io::Result<&mut BytesMut> {
        self.buffer.as_mut().ok_or_else(not_open)
    }
}

impl Backend for MemoryBackend {
    fn open(&mut self, _access: Access) -> io::Result<usize> {
        self.resize(self.capacity)
    }

    fn load(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Grows with zeroes or truncates in place; bytes below
    /// `min(old, new)` are preserved.
    fn resize(&mut self, capacity: usize) -> io::Result<usize> {
        let buffer = self.buffer.get_or_insert_with(BytesMut::new);
        buffer.resize(capacity, 0);
        self.capacity = buffer.len();
        Ok(self.capacity)
    }

    fn exists(&self) -> bool {
        self.buffer.is_some()
    }

    fn delete(&mut self) -> io::Result<()> {
        self.buffer = None;
        Ok(())
    }

    fn read_at(&mut self, location: usize, dst: &mut [u8]) -> io::Result<()> {
        let buffer = self.buffer_mut()?;
        dst.copy_from_slice(&buffer[location..location + dst.len()]);
        Ok(())
    }

    fn write_at(&mut self, location: usize, src: &[u8]) -> io::Result<()> {
        let buffer = self.buffer_mut()?;
        buffer[location..location + src.len()].copy_from_slice(src);
        Ok(())
    }
}
