//! Error types for AtlasStore
//!
//! Provides a unified error type for all store and data operations.

use thiserror::Error;

use crate::store::Access;

/// Result type alias using AtlasError
pub type Result<T> = std::result::Result<T, AtlasError>;

/// Unified error type for AtlasStore operations
#[derive(Debug, Error)]
pub enum AtlasError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    /// The underlying medium failed; carries the original cause.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("Store '{store}' is closed")]
    Closed { store: String },

    #[error("Store '{store}' with {access:?} access cannot {operation}")]
    AccessDenied {
        store: String,
        access: Access,
        operation: &'static str,
    },

    // -------------------------------------------------------------------------
    // Bounds Errors
    // -------------------------------------------------------------------------
    #[error("Out of bounds: {size} bytes at location {location} (capacity {capacity})")]
    OutOfBounds {
        location: usize,
        size: usize,
        capacity: usize,
    },

    #[error("Index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Set capacity exceeded: {requested} bytes requested, {used} of {size} used")]
    SetCapacityExceeded {
        size: usize,
        used: usize,
        requested: usize,
    },

    #[error("Size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("No store configured")]
    NoStore,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AtlasError {
    /// Whether this error came from the underlying medium rather than a
    /// lifecycle, access or bounds check.
    pub fn is_io(&self) -> bool {
        matches!(self, AtlasError::Io(_))
    }
}
