//! Configuration for AtlasStore
//!
//! Per-store lifecycle configuration with sensible defaults.

use serde::{Deserialize, Serialize};

use crate::store::Access;

/// Lifecycle configuration for a single store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    // -------------------------------------------------------------------------
    // Access Configuration
    // -------------------------------------------------------------------------
    /// Access requested when the store is opened implicitly
    pub access: Access,

    // -------------------------------------------------------------------------
    // Auto Behaviors
    // -------------------------------------------------------------------------
    /// Open the store on first use instead of failing with `Closed`
    pub auto_open: bool,

    /// Flush to the persisted medium after every put
    pub auto_flush: bool,

    /// Load from the persisted medium before every get
    pub auto_load: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            access: Access::ReadWrite,
            auto_open: true,
            auto_flush: false,
            auto_load: false,
        }
    }
}

impl StoreConfig {
    /// Create a new config builder
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }
}

/// Builder for StoreConfig
#[derive(Default)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    /// Set the access used for implicit opens
    pub fn access(mut self, access: Access) -> Self {
        self.config.access = access;
        self
    }

    /// Enable or disable opening on first use
    pub fn auto_open(mut self, enabled: bool) -> Self {
        self.config.auto_open = enabled;
        self
    }

    /// Enable or disable flushing after every put
    pub fn auto_flush(mut self, enabled: bool) -> Self {
        self.config.auto_flush = enabled;
        self
    }

    /// Enable or disable loading before every get
    pub fn auto_load(mut self, enabled: bool) -> Self {
        self.config.auto_load = enabled;
        self
    }

    pub fn build(self) -> StoreConfig {
        self.config
    }
}
