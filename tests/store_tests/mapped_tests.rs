//! Tests for stores over the memory-mapped backend
//!
//! These tests verify:
//! - Mapping follows the file length, including empty files
//! - Flush and close write mapped changes back to the file
//! - Resize remaps and keeps the common prefix
//! - Read-only mappings refuse writes at the store layer
//! - Write-then-read property over random ranges (proptest)

use std::fs;
use std::path::PathBuf;

use atlasstore::backend::{Backend, MappedBackend};
use atlasstore::{Access, AtlasError, Store};
use proptest::prelude::*;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_file(name: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(name);
    (temp_dir, path)
}

// =============================================================================
// Mapping Tests
// =============================================================================

#[test]
fn test_empty_file_opens_without_mapping() {
    let (_temp, path) = setup_temp_file("empty.mapped");

    let store = Store::mapped(&path);
    assert_eq!(store.open(Access::ReadWrite).unwrap(), Some(Access::ReadWrite));
    assert_eq!(store.capacity(), 0);
    assert!(store.get_vec(0, 0).unwrap().is_empty());
}

#[test]
fn test_existing_content_is_mapped() {
    let (_temp, path) = setup_temp_file("existing.mapped");
    fs::write(&path, b"mapped bytes").unwrap();

    let store = Store::mapped(&path);
    store.open(Access::ReadOnly).unwrap();

    assert_eq!(store.capacity(), 12);
    assert_eq!(store.get_vec(0, 6).unwrap(), b"mapped");
}

#[test]
fn test_backend_region_tracks_lifecycle() {
    let (_temp, path) = setup_temp_file("region.mapped");
    fs::write(&path, [1u8; 8]).unwrap();

    let mut backend = MappedBackend::new(&path);
    assert!(backend.region().is_none());

    assert_eq!(backend.open(Access::ReadWrite).unwrap(), 8);
    assert_eq!(backend.region().map(|r| r.len()), Some(8));

    backend.close().unwrap();
    assert!(backend.region().is_none());
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_flush_writes_back_to_file() {
    let (_temp, path) = setup_temp_file("flush.mapped");

    let store = Store::mapped(&path);
    store.create(Access::ReadWrite, 8).unwrap();
    store.put(2, &[5, 6, 7]).unwrap();
    store.flush().unwrap();

    assert_eq!(fs::read(&path).unwrap(), vec![0, 0, 5, 6, 7, 0, 0, 0]);
}

#[test]
fn test_writes_persist_across_instances() {
    let (_temp, path) = setup_temp_file("persist.mapped");

    {
        let store = Store::mapped(&path);
        store.create(Access::Exclusive, 16).unwrap();
        store.put(0, b"persisted").unwrap();
        store.close().unwrap();
    }

    let store = Store::mapped(&path);
    store.open(Access::ReadOnly).unwrap();
    assert_eq!(store.get_vec(0, 9).unwrap(), b"persisted");
}

#[test]
fn test_auto_flush_after_put() {
    let (_temp, path) = setup_temp_file("auto-flush.mapped");

    let store = Store::mapped(&path);
    store.set_auto_flush(true);
    store.create(Access::ReadWrite, 4).unwrap();
    store.put(0, &[1, 2, 3, 4]).unwrap();

    assert_eq!(fs::read(&path).unwrap(), vec![1, 2, 3, 4]);
}

#[test]
fn test_auto_load_sees_other_writer() {
    let (_temp, path) = setup_temp_file("shared.mapped");

    let writer = Store::mapped(&path);
    writer.create(Access::ReadWrite, 4).unwrap();

    let reader = Store::mapped(&path);
    reader.set_auto_load(true);
    reader.open(Access::ReadOnly).unwrap();

    writer.put(0, &[4, 3, 2, 1]).unwrap();
    writer.flush().unwrap();

    assert_eq!(reader.get_vec(0, 4).unwrap(), vec![4, 3, 2, 1]);
}

// =============================================================================
// Resize Tests
// =============================================================================

#[test]
fn test_resize_remaps() {
    let (_temp, path) = setup_temp_file("resize.mapped");

    let store = Store::mapped(&path);
    store.create(Access::ReadWrite, 4).unwrap();
    store.put(0, &[1, 2, 3, 4]).unwrap();

    assert_eq!(store.set_capacity(8).unwrap(), 8);
    assert_eq!(store.get_vec(0, 8).unwrap(), vec![1, 2, 3, 4, 0, 0, 0, 0]);

    store.put(6, &[9, 9]).unwrap();
    assert_eq!(store.set_capacity(2).unwrap(), 2);
    assert_eq!(store.get_vec(0, 2).unwrap(), vec![1, 2]);
    assert_eq!(fs::metadata(&path).unwrap().len(), 2);
}

#[test]
fn test_resize_to_zero_and_back() {
    let (_temp, path) = setup_temp_file("zero.mapped");

    let store = Store::mapped(&path);
    store.create(Access::ReadWrite, 4).unwrap();
    store.set_capacity(0).unwrap();
    assert_eq!(store.capacity(), 0);

    store.set_capacity(4).unwrap();
    store.put(0, &[1, 1, 1, 1]).unwrap();
    assert_eq!(store.get_vec(0, 4).unwrap(), vec![1; 4]);
}

#[test]
fn test_read_only_mapping_refuses_put() {
    let (_temp, path) = setup_temp_file("ro.mapped");
    fs::write(&path, [0u8; 4]).unwrap();

    let store = Store::mapped(&path);
    store.open(Access::ReadOnly).unwrap();

    let err = store.put(0, &[1]).unwrap_err();
    assert!(matches!(err, AtlasError::AccessDenied { .. }));
}

#[test]
fn test_delete_removes_mapped_file() {
    let (_temp, path) = setup_temp_file("delete.mapped");

    let store = Store::mapped(&path);
    store.create(Access::ReadWrite, 8).unwrap();
    store.delete().unwrap();

    assert!(!path.exists());
    assert!(store.is_closed());
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_write_then_read(
        capacity in 1usize..8192,
        offset_seed in any::<usize>(),
        data in proptest::collection::vec(any::<u8>(), 0..1024),
    ) {
        let (_temp, path) = setup_temp_file("prop.mapped");
        let store = Store::mapped(&path);
        store.create(Access::ReadWrite, capacity).unwrap();

        let offset = offset_seed % capacity;
        let len = data.len().min(capacity - offset);

        store.put(offset, &data[..len]).unwrap();
        prop_assert_eq!(store.get_vec(offset, len).unwrap(), data[..len].to_vec());
    }
}
