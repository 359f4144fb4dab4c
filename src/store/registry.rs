//! Store registry
//!
//! Name → store lookup. A store can be registered under its own name and
//! under any number of aliases; all entries share the same `Arc<Store>`.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::Store;

/// Thread-safe map of names to shared stores
#[derive(Default)]
pub struct StoreRegistry {
    stores: RwLock<HashMap<String, Arc<Store>>>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a store by name or alias
    pub fn get(&self, name: &str) -> Option<Arc<Store>> {
        self.stores.read().get(name).cloned()
    }

    /// Register `store` under its own name, returning any store it replaced
    pub fn put(&self, store: Arc<Store>) -> Option<Arc<Store>> {
        let name = store.name().to_string();
        self.put_alias(name, store)
    }

    /// Register `store` under `alias`, returning any store it replaced
    pub fn put_alias(&self, alias: impl Into<String>, store: Arc<Store>) -> Option<Arc<Store>> {
        let alias = alias.into();
        debug!(alias = %alias, store = %store, "Store registered");
        self.stores.write().insert(alias, store)
    }

    /// Unregister one name or alias
    pub fn remove(&self, name: &str) -> Option<Arc<Store>> {
        let removed = self.stores.write().remove(name);
        if removed.is_some() {
            debug!(alias = %name, "Store unregistered");
        }
        removed
    }

    /// Unregister every entry that refers to a store named like `store`.
    ///
    /// Returns how many entries were removed.
    pub fn remove_store(&self, store: &Store) -> usize {
        let mut stores = self.stores.write();
        let before = stores.len();
        stores.retain(|_, registered| registered.as_ref() != store);
        let removed = before - stores.len();

        debug!(store = %store, removed, "Store unregistered from all aliases");
        removed
    }

    /// Registered names and aliases, in no particular order
    pub fn names(&self) -> Vec<String> {
        self.stores.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.stores.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.read().is_empty()
    }
}
