//! Storage port and its implementations.

use crate::error::Result;

pub mod inmemory;
#[cfg(feature = "redis")]
pub mod redis;

pub use inmemory::InMemoryBackend;
#[cfg(feature = "redis")]
pub use redis::{PoolStats, RedisBackend, RedisConfig};

/// Trait for storage backend implementations.
///
/// The marketplace only ever needs whole-value get/put per key: every
/// collection is read, transformed in memory and written back in full.
/// Implementations: InMemory (default), Redis. Anything with durable
/// key-to-bytes semantics (browser storage bridge, SQLite table, files)
/// can implement it.
///
/// **IMPORTANT:** All methods use `&self` instead of `&mut self`.
/// Backend implementations should use interior mutability (DashMap, Mutex,
/// or external storage).
///
/// **ASYNC:** All methods are async and must be awaited.
#[allow(async_fn_in_trait)]
pub trait StorageBackend: Send + Sync + Clone {
    /// Retrieve the raw value stored under `key`.
    ///
    /// # Returns
    /// - `Ok(Some(bytes))` - Value present
    /// - `Ok(None)` - Key absent
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs (connection lost, etc.)
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Overwrite the value stored under `key`.
    ///
    /// No merge semantics: the previous value is replaced in full.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Remove the value stored under `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check if key exists (optional optimization).
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Health check - verify backend is accessible.
    ///
    /// # Errors
    /// Returns `Err` if backend is not accessible
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    /// Optional: remove every key this backend owns (use with caution).
    ///
    /// # Errors
    /// Returns `Err` if operation is not implemented or fails
    async fn clear_all(&self) -> Result<()> {
        Err(crate::error::Error::NotImplemented(
            "clear_all not implemented for this backend".to_string(),
        ))
    }
}
