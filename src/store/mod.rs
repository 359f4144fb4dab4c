//! Store Module
//!
//! Named, byte-addressable regions with an open/closed lifecycle and access
//! control, layered over any [`crate::backend::Backend`].
//!
//! ## Responsibilities
//! - Open/close/resize/delete state machine shared by every backend
//! - Access negotiation with fallback (`Exclusive → ReadWrite → ReadOnly`)
//! - Auto-open, auto-load and auto-flush around byte I/O
//! - Capability and bounds checks before any backend call
//!
//! ## State Machine
//! ```text
//!            open(access) ok                 capacity(n) / get / put
//!  ┌────────┐ ─────────────────────▶ ┌──────────────────────┐ ◀──┐
//!  │ Closed │                        │ Open(access, capacity)│    │
//!  └────────┘ ◀───────────────────── └──────────────────────┘ ───┘
//!      ▲        close() (flush first,           │
//!      │        closed even on error)           │ open(other access)
//!      └────────────────────────────────────────┘ (close, then reopen)
//! ```

mod access;
mod factory;
mod lifecycle;
mod registry;

pub use access::Access;
pub use factory::{FileStoreFactory, MappedStoreFactory, MemoryStoreFactory, StoreFactory};
pub use lifecycle::Store;
pub use registry::StoreRegistry;
