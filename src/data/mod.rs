//! Data Module
//!
//! Typed, fixed-size layouts over a [`Store`]. Every entity occupies `size`
//! bytes at a location relative to its parent and knows how to encode and
//! decode itself.
//!
//! ## Responsibilities
//! - `Placement`: size, location, parent base offset and store of one entity
//! - `Data`: checked read/write entry points shared by every entity kind
//! - Vars (`Scalar<T>`, `StringVar`), composite `Set` and homogeneous `Array`
//!
//! ## Offset Composition
//! ```text
//!  store bytes: ┌────────────────────┬──────────────────────────────────┐
//!               │ ...                │ Set @ 24                         │
//!               │                    ├──────────┬───────────────────────┤
//!               │                    │ Float @0 │ Long @4               │
//!               └────────────────────┴──────────┴───────────────────────┘
//!  actual_location(Long) = parent_base (24) + location (4) = 28
//! ```
//!
//! Children never point back at their parent. Containers push their resolved
//! base offset (and store) down whenever their own placement changes.

mod array;
mod set;
mod string;
mod var;

pub use array::{Array, ElementFactory};
pub use set::Set;
pub use string::StringVar;
pub use var::{
    BoolVar, ByteVar, CharVar, DoubleVar, FloatVar, IntVar, LongVar, Numeric, Scalar, ShortVar,
    UByteVar, UIntVar, ULongVar, UShortVar, Var,
};

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{AtlasError, Result};
use crate::store::Store;

// =============================================================================
// Placement
// =============================================================================

/// Where an entity lives: its fixed size, offset within its parent, the
/// parent's resolved base offset, and the store it reads from and writes to.
#[derive(Debug, Clone)]
pub struct Placement {
    size: usize,
    location: usize,
    parent_base: usize,
    store: Option<Arc<Store>>,
}

impl Placement {
    /// Unplaced entity of `size` bytes at location 0 with no store
    pub fn new(size: usize) -> Self {
        Self {
            size,
            location: 0,
            parent_base: 0,
            store: None,
        }
    }

    /// Entity of `size` bytes at `location` in `store`
    pub fn at(size: usize, store: Arc<Store>, location: usize) -> Self {
        Self {
            size,
            location,
            parent_base: 0,
            store: Some(store),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn location(&self) -> usize {
        self.location
    }

    pub fn parent_base(&self) -> usize {
        self.parent_base
    }

    pub fn store(&self) -> Option<&Arc<Store>> {
        self.store.as_ref()
    }

    /// Location resolved through every enclosing container, saturating at
    /// `usize::MAX` so a saturated placement always fails the bounds check
    pub fn actual_location(&self) -> usize {
        self.parent_base.saturating_add(self.location)
    }

    /// Location resolved through every enclosing container, `None` on overflow
    pub fn checked_actual_location(&self) -> Option<usize> {
        self.parent_base.checked_add(self.location)
    }
}

/// Validate an I/O target before any byte is touched.
///
/// `location` is `None` when composing the effective location overflowed.
fn check(size: usize, location: Option<usize>, store: Option<&Store>) -> Result<&Store> {
    let store = store.ok_or(AtlasError::NoStore)?;

    if store.is_closed() {
        return Err(AtlasError::Closed {
            store: store.name().to_string(),
        });
    }

    let capacity = store.capacity();
    match location.and_then(|location| location.checked_add(size)) {
        Some(end) if end <= capacity => Ok(store),
        _ => Err(AtlasError::OutOfBounds {
            location: location.unwrap_or(usize::MAX),
            size,
            capacity,
        }),
    }
}

fn read_checked<D: Data + ?Sized>(
    data: &mut D,
    location: Option<usize>,
    store: Option<&Store>,
) -> Result<()> {
    let store = check(data.size(), location, store)?;
    data.decode_from(location.unwrap_or_default(), store)
}

fn write_checked<D: Data + ?Sized>(
    data: &D,
    location: Option<usize>,
    store: Option<&Store>,
) -> Result<()> {
    let store = check(data.size(), location, store)?;
    data.encode_to(location.unwrap_or_default(), store)
}

// =============================================================================
// Data Trait
// =============================================================================

/// A fixed-size entity addressable at a byte location in a store.
///
/// Implementors provide the raw encode/decode hooks; the provided `read*` and
/// `write*` methods check the store (present, open, large enough) first.
///
/// | Method                  | Location used         | Store used     |
/// |-------------------------|-----------------------|----------------|
/// | `read` / `write`        | `actual_location()`   | own            |
/// | `read_at(offset)`       | `location() + offset` | own            |
/// | `read_from(store)`      | `actual_location()`   | given          |
/// | `read_at_from(o, s)`    | `location() + o`      | given          |
///
/// Explicit arguments never change the entity's own placement.
pub trait Data: Any + Send + fmt::Debug {
    fn placement(&self) -> &Placement;

    fn placement_mut(&mut self) -> &mut Placement;

    /// Decode this entity from `store` at absolute `location` (already checked)
    fn decode_from(&mut self, location: usize, store: &Store) -> Result<()>;

    /// Encode this entity into `store` at absolute `location` (already checked)
    fn encode_to(&self, location: usize, store: &Store) -> Result<()>;

    /// Independent copy with the same placement and cached content
    fn copy(&self) -> Box<dyn Data>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Called after location, parent base or store change; containers
    /// re-place their children here.
    fn placement_changed(&mut self) {}

    // -------------------------------------------------------------------------
    // Placement Accessors
    // -------------------------------------------------------------------------

    fn size(&self) -> usize {
        self.placement().size
    }

    fn location(&self) -> usize {
        self.placement().location
    }

    fn set_location(&mut self, location: usize) {
        self.placement_mut().location = location;
        self.placement_changed();
    }

    fn parent_base(&self) -> usize {
        self.placement().parent_base
    }

    fn set_parent_base(&mut self, base: usize) {
        self.placement_mut().parent_base = base;
        self.placement_changed();
    }

    fn actual_location(&self) -> usize {
        self.placement().actual_location()
    }

    fn store(&self) -> Option<&Arc<Store>> {
        self.placement().store.as_ref()
    }

    fn set_store(&mut self, store: Option<Arc<Store>>) {
        self.placement_mut().store = store;
        self.placement_changed();
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    fn read(&mut self) -> Result<()> {
        let store = self.store().cloned();
        let location = self.placement().checked_actual_location();
        read_checked(self, location, store.as_deref())
    }

    fn read_at(&mut self, offset: usize) -> Result<()> {
        let store = self.store().cloned();
        let location = self.location().checked_add(offset);
        read_checked(self, location, store.as_deref())
    }

    fn read_from(&mut self, store: &Store) -> Result<()> {
        let location = self.placement().checked_actual_location();
        read_checked(self, location, Some(store))
    }

    fn read_at_from(&mut self, offset: usize, store: &Store) -> Result<()> {
        let location = self.location().checked_add(offset);
        read_checked(self, location, Some(store))
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    fn write(&self) -> Result<()> {
        let location = self.placement().checked_actual_location();
        write_checked(self, location, self.store().map(|store| &**store))
    }

    fn write_at(&self, offset: usize) -> Result<()> {
        let location = self.location().checked_add(offset);
        write_checked(self, location, self.store().map(|store| &**store))
    }

    fn write_to(&self, store: &Store) -> Result<()> {
        write_checked(self, self.placement().checked_actual_location(), Some(store))
    }

    fn write_at_to(&self, offset: usize, store: &Store) -> Result<()> {
        write_checked(self, self.location().checked_add(offset), Some(store))
    }
}
