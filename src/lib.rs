//! # AtlasStore
//!
//! An embedded byte store with typed layouts on top:
//! - Named stores over memory, plain-file or memory-mapped backends
//! - Access negotiation with fallback (`Exclusive → ReadWrite → ReadOnly`)
//! - Auto-open, auto-load and auto-flush lifecycle behaviors
//! - Fixed-size vars, composite sets and arrays encoded big-endian
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Data Layer (caller-owned)                   │
//! │       Scalar<T> / StringVar / Set / Array<T>                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ read / write (checked)
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Store                                  │
//! │     lifecycle · access fallback · bounds · one mutex         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Backend trait
//!          ┌────────────┼────────────┐
//!          ▼            ▼            ▼
//!   ┌───────────┐ ┌───────────┐ ┌───────────┐
//!   │  Memory   │ │   File    │ │  Mapped   │
//!   │ (BytesMut)│ │ (seek+io) │ │ (memmap2) │
//!   └───────────┘ └───────────┘ └───────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod backend;
pub mod store;
pub mod data;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{AtlasError, Result};
pub use config::{StoreConfig, StoreConfigBuilder};
pub use codec::{Char16, FixedWidth};
pub use backend::Backend;
pub use store::{
    Access, FileStoreFactory, MappedStoreFactory, MemoryStoreFactory, Store, StoreFactory,
    StoreRegistry,
};
pub use data::{
    Array, BoolVar, ByteVar, CharVar, Data, DoubleVar, FloatVar, IntVar, LongVar, Scalar, Set,
    ShortVar, StringVar, UByteVar, UIntVar, ULongVar, UShortVar, Var,
};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of AtlasStore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
