//! Vars
//!
//! A var caches one typed value in memory, separately from its persisted
//! bytes. `set`/`get` touch only the cache; `read`/`write` move it between
//! the cache and the store.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::{Data, Placement};
use crate::codec::{Char16, FixedWidth};
use crate::error::Result;
use crate::store::Store;

/// A data entity holding one cached value
pub trait Var: Data {
    type Value;

    /// Cached value
    fn value(&self) -> Self::Value;

    /// Replace the cached value without touching the store
    fn set_value(&mut self, value: Self::Value);

    /// Read from the store, then return the cached value
    fn take_value(&mut self) -> Result<Self::Value> {
        self.read()?;
        Ok(self.value())
    }

    /// Set the cached value, then write it to the store
    fn put_value(&mut self, value: Self::Value) -> Result<()> {
        self.set_value(value);
        self.write()
    }
}

// =============================================================================
// Numeric Operations
// =============================================================================

/// Cache arithmetic for numeric scalars. Integer operations wrap.
pub trait Numeric: FixedWidth + PartialOrd {
    fn add(self, rhs: Self) -> Self;
    fn mul(self, rhs: Self) -> Self;
    fn max(self, rhs: Self) -> Self;
    fn min(self, rhs: Self) -> Self;
}

macro_rules! impl_numeric_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Numeric for $ty {
                fn add(self, rhs: Self) -> Self {
                    self.wrapping_add(rhs)
                }

                fn mul(self, rhs: Self) -> Self {
                    self.wrapping_mul(rhs)
                }

                fn max(self, rhs: Self) -> Self {
                    Ord::max(self, rhs)
                }

                fn min(self, rhs: Self) -> Self {
                    Ord::min(self, rhs)
                }
            }
        )*
    };
}

impl_numeric_int!(i8, u8, i16, u16, i32, u32, i64, u64);

macro_rules! impl_numeric_float {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Numeric for $ty {
                fn add(self, rhs: Self) -> Self {
                    self + rhs
                }

                fn mul(self, rhs: Self) -> Self {
                    self * rhs
                }

                fn max(self, rhs: Self) -> Self {
                    <$ty>::max(self, rhs)
                }

                fn min(self, rhs: Self) -> Self {
                    <$ty>::min(self, rhs)
                }
            }
        )*
    };
}

impl_numeric_float!(f32, f64);

// =============================================================================
// Scalar
// =============================================================================

/// A var over any fixed-width value, stored big-endian in `T::SIZE` bytes
#[derive(Debug, Clone)]
pub struct Scalar<T: FixedWidth> {
    placement: Placement,
    value: T,
}

pub type BoolVar = Scalar<bool>;
pub type ByteVar = Scalar<i8>;
pub type UByteVar = Scalar<u8>;
pub type ShortVar = Scalar<i16>;
pub type UShortVar = Scalar<u16>;
pub type CharVar = Scalar<Char16>;
pub type IntVar = Scalar<i32>;
pub type UIntVar = Scalar<u32>;
pub type LongVar = Scalar<i64>;
pub type ULongVar = Scalar<u64>;
pub type FloatVar = Scalar<f32>;
pub type DoubleVar = Scalar<f64>;

impl<T: FixedWidth> Scalar<T> {
    /// Unplaced var caching `value`
    pub fn new(value: T) -> Self {
        Self {
            placement: Placement::new(T::SIZE),
            value,
        }
    }

    /// Var at `location` in `store`, caching the default value
    pub fn at(store: Arc<Store>, location: usize) -> Self {
        Self::placed(store, location, T::default())
    }

    /// Var at `location` in `store`, caching `value`
    pub fn placed(store: Arc<Store>, location: usize, value: T) -> Self {
        Self {
            placement: Placement::at(T::SIZE, store, location),
            value,
        }
    }

    pub fn get(&self) -> T {
        self.value
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
    }

    /// Read from the store and return the fresh value
    pub fn take(&mut self) -> Result<T> {
        self.read()?;
        Ok(self.value)
    }

    /// Cache `value` and write it to the store
    pub fn put(&mut self, value: T) -> Result<()> {
        self.value = value;
        self.write()
    }
}

impl<T: Numeric> Scalar<T> {
    /// Add to the cached value, returning the result
    pub fn add(&mut self, rhs: T) -> T {
        self.value = self.value.add(rhs);
        self.value
    }

    /// Multiply the cached value, returning the result
    pub fn mul(&mut self, rhs: T) -> T {
        self.value = self.value.mul(rhs);
        self.value
    }

    /// Keep the larger of the cached value and `rhs`
    pub fn max(&mut self, rhs: T) -> T {
        self.value = self.value.max(rhs);
        self.value
    }

    /// Keep the smaller of the cached value and `rhs`
    pub fn min(&mut self, rhs: T) -> T {
        self.value = self.value.min(rhs);
        self.value
    }
}

impl<T: FixedWidth> Data for Scalar<T> {
    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn decode_from(&mut self, location: usize, store: &Store) -> Result<()> {
        let bytes = store.get_vec(location, T::SIZE)?;
        self.value = T::decode(&bytes);
        Ok(())
    }

    fn encode_to(&self, location: usize, store: &Store) -> Result<()> {
        store.put(location, &self.value.to_bytes())
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

impl<T: FixedWidth> Var for Scalar<T> {
    type Value = T;

    fn value(&self) -> T {
        self.value
    }

    fn set_value(&mut self, value: T) {
        self.value = value;
    }
}

impl<T: FixedWidth> Default for Scalar<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Vars compare by cached value only
impl<T: FixedWidth + PartialEq> PartialEq for Scalar<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: FixedWidth + fmt::Display> fmt::Display for Scalar<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}
