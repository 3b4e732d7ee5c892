//! Byte-level storage backends.

use crate::StoreError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Raw byte storage under string keys.
///
/// Implementations back the typed [`Store`](crate::Store). A browser-backed
/// implementation would wrap local storage; servers can wrap a KV service.
pub trait StorageBackend: Send + Sync {
    /// Read the bytes stored under a key, `None` if absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write bytes under a key, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Delete a key. Deleting an absent key is not an error.
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

impl<B: StorageBackend + ?Sized> StorageBackend for Arc<B> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key)
    }
}

/// In-memory backend for demos and tests.
///
/// Writes can be made to fail on demand so callers can exercise their
/// degraded-persistence paths.
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    fail_writes: AtomicBool,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with a backend error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Store raw bytes directly, bypassing failure injection.
    ///
    /// Useful for seeding corrupted payloads in tests.
    pub fn put_raw(&self, key: &str, value: &[u8]) {
        self.entries
            .lock()
            .expect("backend lock poisoned")
            .insert(key.to_string(), value.to_vec());
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("backend lock poisoned").len()
    }

    /// Check if the backend holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .entries
            .lock()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("write failure injected".to_string()));
        }
        self.entries
            .lock()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let backend = MemoryBackend::new();
        backend.set("k", b"value").unwrap();
        assert_eq!(backend.get("k").unwrap(), Some(b"value".to_vec()));
    }

    #[test]
    fn test_delete_absent_key_is_ok() {
        let backend = MemoryBackend::new();
        assert!(backend.delete("missing").is_ok());
    }

    #[test]
    fn test_write_failure_injection() {
        let backend = MemoryBackend::new();
        backend.fail_writes(true);
        assert!(backend.set("k", b"v").is_err());

        backend.fail_writes(false);
        assert!(backend.set("k", b"v").is_ok());
    }
}
