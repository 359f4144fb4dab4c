//! Homogeneous Array
//!
//! `count` elements of one fixed size laid out back to back. Elements are
//! produced by a caller-supplied factory.
//!
//! ## Modes
//! - **Lazy**: no element cache. `get` reads a fresh element from the store,
//!   `set` writes straight through; whole-array read/write do nothing.
//! - **Cached**: one slot per element. `get`/`set` touch only the slots;
//!   whole-array read fills every slot, whole-array write stores the
//!   populated ones.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{Data, Placement};
use crate::error::{AtlasError, Result};
use crate::store::Store;

/// Produces fresh, unplaced elements
pub type ElementFactory<T> = Arc<dyn Fn() -> T + Send + Sync>;

pub struct Array<T: Data + Clone> {
    placement: Placement,
    count: usize,
    lazy: bool,
    element_size: usize,
    factory: ElementFactory<T>,

    /// Cached slots; empty for lazy arrays
    elements: Vec<Option<T>>,
}

impl<T: Data + Clone> Array<T> {
    /// Array of `count` elements built by `factory`.
    ///
    /// The element size is taken from one factory-built element and must be
    /// non-zero.
    pub fn new(
        count: usize,
        lazy: bool,
        factory: impl Fn() -> T + Send + Sync + 'static,
    ) -> Result<Self> {
        let element_size = factory().size();
        if element_size == 0 {
            return Err(AtlasError::Config(
                "array elements must have a non-zero size".to_string(),
            ));
        }

        let size = count.checked_mul(element_size).ok_or_else(|| {
            AtlasError::Config(format!(
                "array of {} elements of {} bytes overflows",
                count, element_size
            ))
        })?;

        let elements = if lazy {
            Vec::new()
        } else {
            (0..count).map(|_| None).collect()
        };

        Ok(Self {
            placement: Placement::new(size),
            count,
            lazy,
            element_size,
            factory: Arc::new(factory),
            elements,
        })
    }

    /// Array whose elements are copies of `root`
    pub fn of(root: T, count: usize, lazy: bool) -> Result<Self> {
        let root = Mutex::new(root);
        Self::new(count, lazy, move || root.lock().clone())
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_lazy(&self) -> bool {
        self.lazy
    }

    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Element at `index`.
    ///
    /// Lazy arrays read a fresh element from the store. Cached arrays return
    /// the slot without touching the store, `None` if it was never populated.
    pub fn get(&self, index: usize) -> Result<Option<Cow<'_, T>>> {
        self.check_index(index)?;

        if self.lazy {
            let mut element = self.place((self.factory)(), index);
            element.read()?;
            return Ok(Some(Cow::Owned(element)));
        }

        Ok(self.elements[index].as_ref().map(Cow::Borrowed))
    }

    /// Mutable cached slot at `index`; always `None` for lazy arrays
    pub fn get_mut(&mut self, index: usize) -> Result<Option<&mut T>> {
        self.check_index(index)?;

        if self.lazy {
            return Ok(None);
        }
        Ok(self.elements[index].as_mut())
    }

    /// Place `element` at `index`.
    ///
    /// Lazy arrays write it through immediately (`None` does nothing); cached
    /// arrays replace the slot (`None` clears it).
    pub fn set(&mut self, index: usize, element: Option<T>) -> Result<()> {
        self.check_index(index)?;

        let element = match element {
            Some(element) => {
                if element.size() != self.element_size {
                    return Err(AtlasError::SizeMismatch {
                        expected: self.element_size,
                        actual: element.size(),
                    });
                }
                Some(self.place(element, index))
            }
            None => None,
        };

        if self.lazy {
            if let Some(element) = element {
                element.write()?;
            }
        } else {
            self.elements[index] = element;
        }
        Ok(())
    }

    /// Re-read the element at `index` from the store and return it.
    ///
    /// Cached arrays populate the slot first if it is empty.
    pub fn update(&mut self, index: usize) -> Result<Cow<'_, T>> {
        self.check_index(index)?;

        if self.lazy {
            let mut element = self.place((self.factory)(), index);
            element.read()?;
            return Ok(Cow::Owned(element));
        }

        let element = self.slot(index);
        element.read()?;
        Ok(Cow::Borrowed(&*element))
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.count {
            return Err(AtlasError::IndexOutOfRange {
                index,
                len: self.count,
            });
        }
        Ok(())
    }

    /// Position `element` at `index` under this array
    fn place(&self, element: T, index: usize) -> T {
        place(
            element,
            index * self.element_size,
            self.actual_location(),
            self.placement.store().cloned(),
        )
    }

    /// Cached slot at `index`, populated from the factory if empty
    fn slot(&mut self, index: usize) -> &mut T {
        let location = index * self.element_size;
        let base = self.actual_location();
        let store = self.placement.store().cloned();
        let factory = &self.factory;

        self.elements[index].get_or_insert_with(|| place(factory(), location, base, store))
    }
}

fn place<T: Data>(mut element: T, location: usize, base: usize, store: Option<Arc<Store>>) -> T {
    element.set_location(location);
    element.set_parent_base(base);
    element.set_store(store);
    element
}

impl<T: Data + Clone> Data for Array<T> {
    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn decode_from(&mut self, location: usize, store: &Store) -> Result<()> {
        if self.lazy {
            return Ok(());
        }

        for index in 0..self.count {
            self.slot(index).read_at_from(location, store)?;
        }
        Ok(())
    }

    fn encode_to(&self, location: usize, store: &Store) -> Result<()> {
        if self.lazy {
            return Ok(());
        }

        for element in self.elements.iter().flatten() {
            element.write_at_to(location, store)?;
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
        let store = self.placement.store().cloned();

        for element in self.elements.iter_mut().flatten() {
            element.set_parent_base(base);
            element.set_store(store.clone());
        }
    }
}

impl<T: Data + Clone> Clone for Array<T> {
    /// Copies populated slots; the factory is shared
    fn clone(&self) -> Self {
        Self {
            placement: self.placement.clone(),
            count: self.count,
            lazy: self.lazy,
            element_size: self.element_size,
            factory: Arc::clone(&self.factory),
            elements: self.elements.clone(),
        }
    }
}

impl<T: Data + Clone> fmt::Debug for Array<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Array")
            .field("placement", &self.placement)
            .field("count", &self.count)
            .field("lazy", &self.lazy)
            .field("element_size", &self.element_size)
            .field("elements", &self.elements)
            .finish()
    }
}
