//! In-memory storage backend (default, thread-safe, async).
//!
//! Uses DashMap for concurrent access with per-key sharding. Values live as
//! long as the backend (and its clones) do, which is the process-local
//! equivalent of the browser's local storage.

use super::StorageBackend;
use crate::error::Result;
use dashmap::DashMap;
use std::sync::Arc;

/// Thread-safe async in-memory storage backend.
///
/// Clones share the same map, so a clone handed to a second `Marketplace`
/// behaves like a second tab over the same storage.
///
/// # Example
///
/// ```no_run
/// use ecofinds_store::backend::{InMemoryBackend, StorageBackend};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let backend = InMemoryBackend::new();
///
///     backend.put("users", b"[]".to_vec()).await?;
///
///     let value = backend.get("users").await?;
///     assert_eq!(value.as_deref(), Some(&b"[]"[..]));
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct InMemoryBackend {
    store: Arc<DashMap<String, Vec<u8>>>,
}

impl InMemoryBackend {
    /// Create a new, empty in-memory backend.
    pub fn new() -> Self {
        InMemoryBackend {
            store: Arc::new(DashMap::new()),
        }
    }

    /// Get the current number of keys.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if the backend holds no keys.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Snapshot of the stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.store.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    /// Get storage statistics.
    pub fn stats(&self) -> StorageStats {
        let total_bytes: usize = self.store.iter().map(|entry| entry.value().len()).sum();

        StorageStats {
            total_keys: self.store.len(),
            total_bytes,
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for InMemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.store.get(key) {
            Some(entry) => {
                debug!("✓ InMemory GET {} -> {} bytes", key, entry.len());
                Ok(Some(entry.value().clone()))
            }
            None => {
                debug!("✓ InMemory GET {} -> ABSENT", key);
                Ok(None)
            }
        }
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let size = value.len();
        self.store.insert(key.to_string(), value);
        debug!("✓ InMemory PUT {} ({} bytes)", key, size);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.store.remove(key);
        debug!("✓ InMemory DELETE {}", key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.store.contains_key(key))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn clear_all(&self) -> Result<()> {
        self.store.clear();
        warn!("⚠ InMemory CLEAR_ALL executed - all collections removed!");
        Ok(())
    }
}

/// Storage statistics.
#[derive(Clone, Debug)]
pub struct StorageStats {
    pub total_keys: usize,
    pub total_bytes: usize,
}
