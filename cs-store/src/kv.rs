//! The key-value store abstraction shared by the SQLite and in-memory stores.

use serde::de::DeserializeOwned;
use serde::Serialize;

use cs_core::error::CsResult;

/// String-keyed persistent storage with per-key atomic operations.
///
/// No operation spans more than one key atomically; callers that write
/// several related keys accept last-write-wins semantics.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. Missing keys are `Ok(None)`.
    fn get(&self, key: &str) -> CsResult<Option<String>>;

    /// Insert or overwrite a value.
    fn set(&self, key: &str, value: &str) -> CsResult<()>;

    /// Delete a key. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> CsResult<()>;

    /// All stored keys, sorted.
    fn keys(&self) -> CsResult<Vec<String>>;

    /// Delete every key.
    fn clear(&self) -> CsResult<()>;

    /// Delete several keys, one at a time.
    fn remove_many(&self, keys: &[&str]) -> CsResult<()> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}

/// JSON helpers for blob values such as earning progress.
pub trait KeyValueStoreExt {
    /// Read and deserialize a JSON value.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> CsResult<Option<T>>;

    /// Serialize and write a JSON value.
    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> CsResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> CsResult<Option<T>> {
        match self.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> CsResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use std::sync::Arc;

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Progress {
        answered: u32,
        earned: u32,
    }

    #[test]
    fn test_json_helpers_through_trait_object() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let progress = Progress { answered: 3, earned: 30 };
        store.set_json("creditsProgress", &progress).unwrap();
        let loaded: Option<Progress> = store.get_json("creditsProgress").unwrap();
        assert_eq!(loaded, Some(progress));
    }

    #[test]
    fn test_get_json_rejects_garbage() {
        let store = MemoryStore::new();
        store.set("creditsProgress", "not json").unwrap();
        assert!(store.get_json::<Progress>("creditsProgress").is_err());
    }

    #[test]
    fn test_remove_many() {
        let store = MemoryStore::new();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.set("c", "3").unwrap();
        store.remove_many(&["a", "c", "missing"]).unwrap();
        assert_eq!(store.keys().unwrap(), vec!["b".to_string()]);
    }
}
