//! Store factories
//!
//! Produce closed stores of one backend kind from a name. File-based
//! factories resolve the name against a base directory.

use std::path::{Path, PathBuf};

use super::Store;
use crate::backend::MemoryBackend;

/// Creates closed stores by name
pub trait StoreFactory: Send + Sync {
    /// Create a closed store; `capacity` is applied by memory factories
    /// on first open and ignored by file-based ones.
    fn create(&self, name: &str, capacity: Option<usize>) -> Store;
}

/// Factory for in-memory stores
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryStoreFactory {
    /// Capacity used when the caller does not give one
    pub default_capacity: usize,
}

impl MemoryStoreFactory {
    pub fn new(default_capacity: usize) -> Self {
        Self { default_capacity }
    }
}

impl StoreFactory for MemoryStoreFactory {
    fn create(&self, name: &str, capacity: Option<usize>) -> Store {
        let capacity = capacity.unwrap_or(self.default_capacity);
        Store::new(name, MemoryBackend::new(capacity))
    }
}

/// Factory for plain file stores under a directory
#[derive(Debug, Clone)]
pub struct FileStoreFactory {
    dir: PathBuf,
}

impl FileStoreFactory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl StoreFactory for FileStoreFactory {
    fn create(&self, name: &str, _capacity: Option<usize>) -> Store {
        Store::file(self.dir.join(name))
    }
}

/// Factory for memory-mapped file stores under a directory
#[derive(Debug, Clone)]
pub struct MappedStoreFactory {
    dir: PathBuf,
}

impl MappedStoreFactory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl StoreFactory for MappedStoreFactory {
    fn create(&self, name: &str, _capacity: Option<usize>) -> Store {
        Store::mapped(self.dir.join(name))
    }
}
