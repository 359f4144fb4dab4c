//! File Backend
//!
//! Every read and write seeks and goes straight to the file; there is no
//! caching layer, so `load` and `flush` are no-ops.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::{file_capacity, not_open, open_file, remove_file, Backend};
use crate::store::Access;

/// Plain file byte storage
pub struct FileBackend {
    /// The persisted medium
    path: PathBuf,

    /// Open handle; holds the advisory lock when opened exclusively
    file: Option<File>,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
        }
    }

    /// Path of the persisted medium
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file(&mut self) -> io::Result<&mut File> {
        self.file.as_mut().ok_or_else(not_open)
    }
}

impl Backend for FileBackend {
    fn open(&mut self, access: Access) -> io::Result<usize> {
        let file = open_file(&self.path, access)?;
        let capacity = file_capacity(&file)?;
        self.file = Some(file);
        Ok(capacity)
    }

    fn load(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Forces data and metadata to disk, then drops the handle (and its lock)
    fn close(&mut self) -> io::Result<()> {
        match self.file.take() {
            Some(file) => file.sync_all(),
            None => Ok(()),
        }
    }

    fn resize(&mut self, capacity: usize) -> io::Result<usize> {
        let file = self.file()?;
        file.set_len(capacity as u64)?;
        file_capacity(file)
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn delete(&mut self) -> io::Result<()> {
        remove_file(&self.path)
    }

    fn read_at(&mut self, location: usize, dst: &mut [u8]) -> io::Result<()> {
        let file = self.file()?;
        file.seek(SeekFrom::Start(location as u64))?;
        file.read_exact(dst)
    }

    fn write_at(&mut self, location: usize, src: &[u8]) -> io::Result<()> {
        let file = self.file()?;
        file.seek(SeekFrom::Start(location as u64))?;
        file.write_all(src)
    }
}
