use crate::error::StoreResult;

/// Flat string key/value persistence scoped to one game object.
///
/// This is the host's saved-data service: every key holds one string, and
/// an empty string means "absent". Implementations must persist entries
/// across restarts (file backends) or for the life of the process
/// (in-memory backends). No atomicity across keys is assumed: callers that
/// write several keys must tolerate a partially applied set.
pub trait EntryStore: Send + Sync {
    /// Read the value at `key`. Returns an empty string if it is absent.
    fn get_entry(&self, key: &str) -> StoreResult<String>;

    /// Write (create or replace) the value at `key`.
    fn set_entry(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove `key`. Returns `true` if it existed.
    fn remove_entry(&self, key: &str) -> StoreResult<bool>;

    /// All keys currently present, sorted.
    fn keys(&self) -> StoreResult<Vec<String>>;

    /// Write several entries in order.
    ///
    /// Backends that persist eagerly override this to write once per batch.
    fn set_entries(&self, entries: &[(String, String)]) -> StoreResult<()> {
        for (key, value) in entries {
            self.set_entry(key, value)?;
        }
        Ok(())
    }

    /// Remove several keys. Returns how many existed.
    fn remove_entries(&self, keys: &[String]) -> StoreResult<usize> {
        let mut removed = 0;
        for key in keys {
            if self.remove_entry(key)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Returns `true` if `key` holds a non-empty value.
    fn has_entry(&self, key: &str) -> StoreResult<bool> {
        Ok(!self.get_entry(key)?.is_empty())
    }

    /// All keys starting with `prefix`, sorted.
    fn keys_with_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .keys()?
            .into_iter()
            .filter(|key| key.starts_with(prefix))
            .collect())
    }
}
