//! Fixed-length string var
//!
//! The cached value is the raw byte image: UTF-8 text truncated to the var's
//! length and zero-padded. Reading back trims padding and surrounding
//! whitespace/control characters.

use std::any::Any;
use std::sync::Arc;

use super::{Data, Placement, Var};
use crate::error::Result;
use crate::store::Store;

#[derive(Debug, Clone)]
pub struct StringVar {
    placement: Placement,
    bytes: Vec<u8>,
}

impl StringVar {
    /// Unplaced, empty string var of `length` bytes
    pub fn new(length: usize) -> Self {
        Self {
            placement: Placement::new(length),
            bytes: vec![0u8; length],
        }
    }

    /// Unplaced string var of `length` bytes caching `value`
    pub fn with_value(length: usize, value: &str) -> Self {
        let mut var = Self::new(length);
        var.set(value);
        var
    }

    /// Empty string var of `length` bytes at `location` in `store`
    pub fn at(store: Arc<Store>, location: usize, length: usize) -> Self {
        Self {
            placement: Placement::at(length, store, location),
            bytes: vec![0u8; length],
        }
    }

    pub fn get(&self) -> String {
        String::from_utf8_lossy(&self.bytes)
            .trim_matches(|c: char| c == '\0' || c.is_whitespace() || c.is_control())
            .to_string()
    }

    /// Cache `value`, truncated on a character boundary and zero-padded
    pub fn set(&mut self, value: &str) {
        let mut end = value.len().min(self.bytes.len());
        while !value.is_char_boundary(end) {
            end -= 1;
        }

        self.bytes[..end].copy_from_slice(&value.as_bytes()[..end]);
        self.bytes[end..].fill(0);
    }

    pub fn take(&mut self) -> Result<String> {
        self.read()?;
        Ok(self.get())
    }

    pub fn put(&mut self, value: &str) -> Result<()> {
        self.set(value);
        self.write()
    }

    /// Raw cached bytes, including padding
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Data for StringVar {
    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn decode_from(&mut self, location: usize, store: &Store) -> Result<()> {
        store.get(location, &mut self.bytes)
    }

    fn encode_to(&self, location: usize, store: &Store) -> Result<()> {
        store.put(location, &self.bytes)
    }

    fn copy(&self) -> Box<dyn Data> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Var for StringVar {
    type Value = String;

    fn value(&self) -> String {
        self.get()
    }

    fn set_value(&mut self, value: String) {
        self.set(&value);
    }
}

impl PartialEq for StringVar {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}
