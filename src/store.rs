//! Collection store: whole-list reads and writes over a `StorageBackend`.
//!
//! Every key holds one JSON document. Reads decode the full list (or yield
//! an empty one when the key has never been written); writes replace the
//! stored value in full. There is no merge and no locking: when two callers
//! interleave read-modify-write cycles, the last write wins.

use std::time::Instant;

use crate::backend::StorageBackend;
use crate::error::Result;
use crate::key::CollectionKey;
use crate::observability::{NoOpMetrics, StoreMetrics};
use crate::record::Record;
use crate::serialization::{decode_collection, decode_value, encode_collection, encode_value};

/// Typed access to the collections stored under [`CollectionKey`]s.
///
/// # Example
///
/// ```
/// use ecofinds_store::backend::InMemoryBackend;
/// use ecofinds_store::key::CollectionKey;
/// use ecofinds_store::model::User;
/// use ecofinds_store::store::CollectionStore;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> ecofinds_store::Result<()> {
/// let store = CollectionStore::new(InMemoryBackend::new());
///
/// let users: Vec<User> = store.read_collection(CollectionKey::Users).await?;
/// assert!(users.is_empty());
/// # Ok(())
/// # }
/// ```
pub struct CollectionStore<B: StorageBackend> {
    backend: B,
    metrics: Box<dyn StoreMetrics>,
}

impl<B: StorageBackend> CollectionStore<B> {
    pub fn new(backend: B) -> Self {
        CollectionStore {
            backend,
            metrics: Box::new(NoOpMetrics),
        }
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn StoreMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Get a reference to the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Read and decode the list stored under `key`.
    ///
    /// An absent key yields an empty list.
    ///
    /// # Errors
    ///
    /// - `Error::DeserializationError`: stored bytes are not a list of `T`
    /// - `Error::BackendError`: backend unavailable
    pub async fn read_collection<T: Record>(&self, key: CollectionKey) -> Result<Vec<T>> {
        match self.read_raw(key).await? {
            Some(bytes) => self.observe(key, decode_collection(&bytes)),
            None => Ok(Vec::new()),
        }
    }

    /// Validate and encode `records`, then overwrite whatever `key` held.
    ///
    /// Nothing is written if any record fails [`Record::validate`].
    ///
    /// # Errors
    ///
    /// - `Error::ValidationError`: a record is invalid
    /// - `Error::SerializationError`: a record cannot be encoded
    /// - `Error::BackendError`: backend unavailable
    pub async fn write_collection<T: Record>(
        &self,
        key: CollectionKey,
        records: &[T],
    ) -> Result<()> {
        if let Err(e) = records.iter().try_for_each(T::validate) {
            warn!("Refusing to write invalid {} to {}: {}", T::entity_name(), key, e);
            return Err(e);
        }
        let bytes = self.observe(key, encode_collection(records))?;
        debug!("» Writing {} {} record(s) to {}", records.len(), T::entity_name(), key);
        self.write_raw(key, bytes).await
    }

    /// Read a single record (the session marker).
    pub async fn read_value<T: Record>(&self, key: CollectionKey) -> Result<Option<T>> {
        match self.read_raw(key).await? {
            Some(bytes) => self.observe(key, decode_value(&bytes)).map(Some),
            None => Ok(None),
        }
    }

    /// Overwrite `key` with a single record.
    pub async fn write_value<T: Record>(&self, key: CollectionKey, value: &T) -> Result<()> {
        let bytes = self.observe(key, encode_value(value))?;
        self.write_raw(key, bytes).await
    }

    /// Remove whatever `key` holds. Removing an absent key is a no-op.
    pub async fn remove(&self, key: CollectionKey) -> Result<()> {
        let storage_key = key.storage_key();
        let timer = Instant::now();
        let result = self.backend.delete(&storage_key).await;
        match &result {
            Ok(()) => self.metrics.record_delete(&storage_key, timer.elapsed()),
            Err(e) => self.metrics.record_error(&storage_key, &e.to_string()),
        }
        result
    }

    /// True if `key` has ever been written (an empty list counts).
    pub async fn exists(&self, key: CollectionKey) -> Result<bool> {
        let storage_key = key.storage_key();
        self.observe(key, self.backend.exists(&storage_key).await)
    }

    async fn read_raw(&self, key: CollectionKey) -> Result<Option<Vec<u8>>> {
        let storage_key = key.storage_key();
        let timer = Instant::now();
        match self.backend.get(&storage_key).await {
            Ok(bytes) => {
                self.metrics
                    .record_read(&storage_key, bytes.is_some(), timer.elapsed());
                Ok(bytes)
            }
            Err(e) => {
                self.metrics.record_error(&storage_key, &e.to_string());
                Err(e)
            }
        }
    }

    async fn write_raw(&self, key: CollectionKey, bytes: Vec<u8>) -> Result<()> {
        let storage_key = key.storage_key();
        let size = bytes.len();
        let timer = Instant::now();
        match self.backend.put(&storage_key, bytes).await {
            Ok(()) => {
                self.metrics.record_write(&storage_key, size, timer.elapsed());
                Ok(())
            }
            Err(e) => {
                self.metrics.record_error(&storage_key, &e.to_string());
                Err(e)
            }
        }
    }

    fn observe<T>(&self, key: CollectionKey, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            self.metrics.record_error(&key.storage_key(), &e.to_string());
        }
        result
    }
}
