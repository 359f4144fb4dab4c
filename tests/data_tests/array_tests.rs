//! Tests for arrays
//!
//! These tests verify:
//! - Lazy arrays read and write through on every get/set
//! - Cached arrays touch the store only on read/write/update
//! - Index and element-size validation
//! - Copies duplicate populated slots only
//! - Arrays nest inside sets

use std::sync::Arc;

use atlasstore::{Access, Array, AtlasError, Data, FloatVar, IntVar, Set, Store, StringVar};

// =============================================================================
// Helper Functions
// =============================================================================

/// Nine floats over a fresh, zero-filled 36 byte store
fn float_array(name: &str, lazy: bool) -> (Arc<Store>, Array<FloatVar>) {
    let store = Arc::new(Store::memory(name, 36));
    store.open(Access::ReadWrite).unwrap();

    let mut array = Array::new(9, lazy, FloatVar::default).unwrap();
    array.set_store(Some(Arc::clone(&store)));
    (store, array)
}

fn value_at(array: &Array<FloatVar>, index: usize) -> f32 {
    array.get(index).unwrap().unwrap().get()
}

// =============================================================================
// Lazy Array Tests
// =============================================================================

#[test]
fn test_lazy_get_reads_store() {
    let (_store, array) = float_array("lazy-get", true);

    assert!(array.is_lazy());
    assert_eq!(array.size(), 36);
    assert_eq!(value_at(&array, 0), 0.0);
}

#[test]
fn test_lazy_set_writes_through() {
    let (store, mut array) = float_array("lazy-set", true);

    array.set(0, Some(FloatVar::new(5.6))).unwrap();
    array.set(8, Some(FloatVar::new(-34.5))).unwrap();

    assert_eq!(value_at(&array, 0), 5.6);
    assert_eq!(value_at(&array, 8), -34.5);
    assert_eq!(FloatVar::at(Arc::clone(&store), 32).take().unwrap(), -34.5);
}

#[test]
fn test_lazy_set_none_is_noop() {
    let (store, mut array) = float_array("lazy-none", true);
    store.put(0, &[0x40, 0x00, 0x00, 0x00]).unwrap();

    array.set(0, None).unwrap();
    assert_eq!(value_at(&array, 0), 2.0);
}

#[test]
fn test_lazy_bulk_io_is_noop() {
    let (store, mut array) = float_array("lazy-bulk", true);
    array.read().unwrap();
    array.write().unwrap();
    assert_eq!(store.get_vec(0, 36).unwrap(), vec![0; 36]);
}

// =============================================================================
// Cached Array Tests
// =============================================================================

#[test]
fn test_cached_get_before_read_is_empty() {
    let (_store, array) = float_array("cached-empty", false);

    assert!(!array.is_lazy());
    for i in 0..9 {
        assert!(array.get(i).unwrap().is_none());
    }
}

#[test]
fn test_cached_read_populates_every_slot() {
    let (_store, mut array) = float_array("cached-read", false);
    array.read().unwrap();

    for i in 0..9 {
        assert_eq!(value_at(&array, i), 0.0);
    }
}

#[test]
fn test_cached_set_does_not_write_until_write() {
    let (store, mut array) = float_array("cached-set", false);

    array.set(1, Some(FloatVar::new(5.6))).unwrap();
    assert_eq!(value_at(&array, 1), 5.6);
    assert_eq!(store.get_vec(4, 4).unwrap(), vec![0; 4]);

    array.write().unwrap();
    assert_eq!(FloatVar::at(Arc::clone(&store), 4).take().unwrap(), 5.6);
}

#[test]
fn test_cached_write_skips_empty_slots() {
    let (store, mut array) = float_array("cached-skip", false);
    store.put(0, &[0xFF; 36]).unwrap();

    array.set(2, Some(FloatVar::new(1.0))).unwrap();
    array.write().unwrap();

    assert_eq!(store.get_vec(0, 4).unwrap(), vec![0xFF; 4]);
    assert_eq!(store.get_vec(8, 4).unwrap(), vec![0x3F, 0x80, 0, 0]);
}

#[test]
fn test_get_mut_then_write_visible_to_second_array() {
    let (store, mut array) = float_array("cached-mut", false);
    array.read().unwrap();

    array.get_mut(3).unwrap().unwrap().set(6.7);
    array.write().unwrap();

    let mut other = Array::new(9, false, FloatVar::default).unwrap();
    other.set_store(Some(Arc::clone(&store)));
    other.read().unwrap();
    assert_eq!(value_at(&other, 3), 6.7);
}

#[test]
fn test_update_refreshes_single_slot() {
    let (store, mut array) = float_array("update", false);

    FloatVar::placed(Arc::clone(&store), 20, 9.5).write().unwrap();
    assert!(array.get(5).unwrap().is_none());

    assert_eq!(array.update(5).unwrap().get(), 9.5);
    assert_eq!(value_at(&array, 5), 9.5);
    assert!(array.get(4).unwrap().is_none());
}

#[test]
fn test_update_on_lazy_array_reads_fresh() {
    let (store, mut array) = float_array("update-lazy", true);
    FloatVar::placed(Arc::clone(&store), 0, 1.25).write().unwrap();

    assert_eq!(array.update(0).unwrap().get(), 1.25);
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_index_out_of_range() {
    let (_store, mut array) = float_array("index", true);

    assert!(matches!(
        array.get(9),
        Err(AtlasError::IndexOutOfRange { index: 9, len: 9 })
    ));
    assert!(matches!(
        array.set(9, Some(FloatVar::new(1.0))),
        Err(AtlasError::IndexOutOfRange { .. })
    ));
    assert!(array.update(100).is_err());
}

#[test]
fn test_element_size_mismatch() {
    let store = Arc::new(Store::memory("mismatch", 16));
    let mut array = Array::of(StringVar::new(4), 4, true).unwrap();
    array.set_store(Some(store));

    let result = array.set(0, Some(StringVar::with_value(8, "too long")));
    assert!(matches!(result, Err(AtlasError::SizeMismatch { expected: 4, actual: 8 })));
}

#[test]
fn test_lazy_get_on_closed_store() {
    let store = Arc::new(Store::memory("closed", 36));
    let mut array = Array::new(9, true, FloatVar::default).unwrap();
    array.set_store(Some(store));

    assert!(matches!(array.get(0), Err(AtlasError::Closed { .. })));
}

// =============================================================================
// Copy & Nesting Tests
// =============================================================================

#[test]
fn test_copy_duplicates_populated_slots() {
    let (_store, mut array) = float_array("copy", false);
    array.set(0, Some(FloatVar::new(1.0))).unwrap();

    let mut copy = array.clone();
    copy.get_mut(0).unwrap().unwrap().set(2.0);

    assert_eq!(value_at(&array, 0), 1.0);
    assert_eq!(value_at(&copy, 0), 2.0);
    assert!(copy.get(1).unwrap().is_none());
    assert_eq!(copy.store().unwrap().name(), "copy");
}

#[test]
fn test_array_inside_set() {
    let store = Arc::new(Store::memory("array-in-set", 24));
    store.open(Access::ReadWrite).unwrap();

    let mut set = Set::new(16);
    set.set_store(Some(Arc::clone(&store)));
    set.set_location(8);
    set.add(Box::new(IntVar::new(1))).unwrap();
    set.add(Box::new(Array::new(3, true, IntVar::default).unwrap())).unwrap();

    let array = set.get_mut::<Array<IntVar>>(1).unwrap();
    array.set(2, Some(IntVar::new(42))).unwrap();

    // set @8, int @8..12, array @12, element 2 @20
    assert_eq!(IntVar::at(Arc::clone(&store), 20).take().unwrap(), 42);
}
