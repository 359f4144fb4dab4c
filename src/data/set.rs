//! Composite Set
//!
//! Packs heterogeneous children contiguously inside a fixed-size region.
//! Children are laid out in insertion order starting at offset 0; the set's
//! size is fixed up front and adding past it fails.

use std::any::Any;
use std::sync::Arc;

use super::{Data, Placement};
use crate::error::{AtlasError, Result};
use crate::store::Store;

#[derive(Debug)]
pub struct Set {
    placement: Placement,

    /// Bytes claimed by children so far
    used: usize,

    children: Vec<Box<dyn Data>>,
}

impl Set {
    /// Empty, unplaced set of `size` bytes
    pub fn new(size: usize) -> Self {
        Self {
            placement: Placement::new(size),
            used: 0,
            children: Vec::new(),
        }
    }

    /// Set sized exactly to hold `children`, in order
    pub fn create(children: Vec<Box<dyn Data>>) -> Self {
        let size = children.iter().map(|child| child.size()).sum();
        let mut set = Self::new(size);
        for child in children {
            set.attach(child);
        }
        set
    }

    /// Append `child` after the existing children.
    ///
    /// Fails without modifying the set if the child does not fit.
    pub fn add(&mut self, child: Box<dyn Data>) -> Result<()> {
        self.ensure_room(child.size())?;
        self.attach(child);
        Ok(())
    }

    /// Append every child in order, or none of them if they do not all fit
    pub fn add_all(&mut self, children: Vec<Box<dyn Data>>) -> Result<()> {
        let total = children.iter().map(|child| child.size()).sum();
        self.ensure_room(total)?;

        for child in children {
            self.attach(child);
        }
        Ok(())
    }

    /// Bytes used by children
    pub fn used_size(&self) -> usize {
        self.used
    }

    /// Number of children
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Child at `index`, if present
    pub fn child(&self, index: usize) -> Option<&dyn Data> {
        self.children.get(index).map(|child| child.as_ref())
    }

    /// Child at `index` downcast to `T`; `None` if absent or another type
    pub fn get<T: Data>(&self, index: usize) -> Option<&T> {
        self.children.get(index)?.as_any().downcast_ref::<T>()
    }

    /// Mutable child at `index` downcast to `T`
    pub fn get_mut<T: Data>(&mut self, index: usize) -> Option<&mut T> {
        self.children.get_mut(index)?.as_any_mut().downcast_mut::<T>()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Data> {
        self.children.iter().map(|child| child.as_ref())
    }

    fn ensure_room(&self, requested: usize) -> Result<()> {
        let size = self.size();
        match self.used.checked_add(requested) {
            Some(end) if end <= size => Ok(()),
            _ => Err(AtlasError::SetCapacityExceeded {
                size,
                used: self.used,
                requested,
            }),
        }
    }

    /// Place `child` at the next free offset and take ownership of it
    fn attach(&mut self, mut child: Box<dyn Data>) {
        child.set_location(self.used);
        child.set_parent_base(self.actual_location());
        child.set_store(self.placement.store().cloned());

        self.used += child.size();
        self.children.push(child);
    }
}

impl Data for Set {
    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn decode_from(&mut self, location: usize, store: &Store) -> Result<()> {
        for child in &mut self.children {
            child.read_at_from(location, store)?;
        }
        Ok(())
    }

    fn encode_to(&self, location: usize, store: &Store) -> Result<()> {
        for child in &self.children {
            child.write_at_to(location, store)?;
        }
        Ok(())
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

    fn placement_changed(&mut self) {
        let base = self.actual_location();
        let store: Option<Arc<Store>> = self.placement.store().cloned();

        for child in &mut self.children {
            child.set_parent_base(base);
            child.set_store(store.clone());
        }
    }
}

impl Clone for Set {
    /// Deep copy: every child is copied with its placement
    fn clone(&self) -> Self {
        Self {
            placement: self.placement.clone(),
            used: self.used,
            children: self.children.iter().map(|child| child.copy()).collect(),
        }
    }
}
