//! Typed store with automatic JSON serialization.

use crate::{StorageBackend, StoreError};
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

/// Type-safe store over a byte backend.
///
/// Values are serialized to JSON on write and deserialized on read for any
/// type implementing `Serialize` and `DeserializeOwned`.
pub struct Store {
    backend: Box<dyn StorageBackend>,
}

impl Store {
    /// Create a store over the given backend.
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Get a value, `None` if the key is absent.
    ///
    /// A value that fails to deserialize is an error here; use
    /// [`get_or_default`](Self::get_or_default) for the forgiving read.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.backend.get(key)? {
            Some(bytes) => {
                let value: T = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Get a value, degrading to the type's default on any failure.
    ///
    /// Missing keys, backend read errors, and corrupted payloads all return
    /// `T::default()`; corruption and backend failures are logged.
    pub fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.backend.get(key) {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(value) => value,
                Err(e) => {
                    warn!(key, error = %e, "discarding corrupted stored value");
                    T::default()
                }
            },
            Ok(None) => T::default(),
            Err(e) => {
                warn!(key, error = %e, "store read failed, using default");
                T::default()
            }
        }
    }

    /// Set a value, replacing any previous one.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value)?;
        self.backend.set(key, &bytes)
    }

    /// Delete a key. Absent keys are not an error.
    pub fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.backend.delete(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryBackend;

    fn store() -> Store {
        Store::new(Box::new(MemoryBackend::new()))
    }

    #[test]
    fn test_typed_roundtrip() {
        let store = store();
        store.set("nums", &vec![1, 2, 3]).unwrap();
        let nums: Option<Vec<i64>> = store.get("nums").unwrap();
        assert_eq!(nums, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_missing_key_defaults() {
        let store = store();
        let nums: Vec<i64> = store.get_or_default("missing");
        assert!(nums.is_empty());
    }

    #[test]
    fn test_corrupted_value_defaults() {
        let backend = MemoryBackend::new();
        backend.put_raw("nums", b"{not json");
        let store = Store::new(Box::new(backend));

        let nums: Vec<i64> = store.get_or_default("nums");
        assert!(nums.is_empty());
    }

    #[test]
    fn test_corrupted_value_errors_on_strict_get() {
        let backend = MemoryBackend::new();
        backend.put_raw("nums", b"[1, 2,");
        let store = Store::new(Box::new(backend));

        let result: Result<Option<Vec<i64>>, _> = store.get("nums");
        assert!(result.is_err());
    }
}
