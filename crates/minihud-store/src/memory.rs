use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::traits::EntryStore;

/// In-memory, HashMap-based entry store.
///
/// Intended for tests and embedding. Entries live behind a `RwLock` and are
/// lost when the store is dropped.
pub struct InMemoryEntryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryEntryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().map(|map| map.len()).unwrap_or(0)
    }

    /// Returns `true` if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every entry, for assertions on persisted state.
    pub fn snapshot(&self) -> StoreResult<HashMap<String, String>> {
        let map = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.clone())
    }

    /// Remove every entry.
    pub fn clear(&self) -> StoreResult<()> {
        self.entries
            .write()
            .map_err(|_| StoreError::LockPoisoned)?
            .clear();
        Ok(())
    }
}

impl Default for InMemoryEntryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryStore for InMemoryEntryStore {
    fn get_entry(&self, key: &str) -> StoreResult<String> {
        let map = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.get(key).cloned().unwrap_or_default())
    }

    fn set_entry(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut map = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_entry(&self, key: &str) -> StoreResult<bool> {
        let mut map = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.remove(key).is_some())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let map = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut keys: Vec<String> = map.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

impl std::fmt::Debug for InMemoryEntryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryEntryStore")
            .field("entry_count", &self.len())
            .finish()
    }
}
