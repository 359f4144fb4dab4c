//! Access levels
//!
//! Ordered capability sets with a fallback chain:
//! `Exclusive → ReadWrite → ReadOnly → (none)`.

use serde::{Deserialize, Serialize};

use crate::error::{AtlasError, Result};

/// Access granted (or requested) on a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Access {
    /// Read only; never locks
    ReadOnly,

    /// Read and write; never locks
    ReadWrite,

    /// Read and write plus an advisory exclusive lock on the medium
    Exclusive,
}

impl Access {
    pub fn can_read(self) -> bool {
        true
    }

    pub fn can_write(self) -> bool {
        !matches!(self, Access::ReadOnly)
    }

    pub fn can_lock(self) -> bool {
        matches!(self, Access::Exclusive)
    }

    /// The next weaker level to try when this one cannot be granted
    pub fn next(self) -> Option<Access> {
        match self {
            Access::Exclusive => Some(Access::ReadWrite),
            Access::ReadWrite => Some(Access::ReadOnly),
            Access::ReadOnly => None,
        }
    }

    /// Fail with `AccessDenied` unless this level can read
    pub(crate) fn require_read(self, store: &str) -> Result<()> {
        self.require(self.can_read(), store, "read")
    }

    /// Fail with `AccessDenied` unless this level can write
    pub(crate) fn require_write(self, store: &str, operation: &'static str) -> Result<()> {
        self.require(self.can_write(), store, operation)
    }

    fn require(self, granted: bool, store: &str, operation: &'static str) -> Result<()> {
        if granted {
            Ok(())
        } else {
            Err(AtlasError::AccessDenied {
                store: store.to_string(),
                access: self,
                operation,
            })
        }
    }
}
