//! Metrics hooks for storage operations.
//!
//! `CollectionStore` calls a `StoreMetrics` implementation around every
//! backend round-trip. The trait's default methods log through the `log`
//! crate, so an empty impl already gives per-key debug output:
//!
//! ```ignore
//! use ecofinds_store::observability::StoreMetrics;
//! use std::time::Duration;
//!
//! struct PrometheusMetrics;
//!
//! impl StoreMetrics for PrometheusMetrics {
//!     fn record_read(&self, key: &str, found: bool, duration: Duration) {
//!         // histogram!("store_read_latency", "key" => key).record(duration);
//!     }
//! }
//!
//! // let marketplace = Marketplace::new(backend)
//! //     .with_metrics(PrometheusMetrics);
//! ```
//!
//! `NoOpMetrics` (the default) records nothing.

use std::time::Duration;

/// Trait for storage metrics collection.
pub trait StoreMetrics: Send + Sync {
    /// Record a read. `found` is false when the key was absent.
    fn record_read(&self, key: &str, found: bool, duration: Duration) {
        debug!("Store READ: {} (found={}) took {:?}", key, found, duration);
    }

    /// Record a full overwrite of a key.
    fn record_write(&self, key: &str, bytes: usize, duration: Duration) {
        debug!("Store WRITE: {} ({} bytes) took {:?}", key, bytes, duration);
    }

    /// Record a delete.
    fn record_delete(&self, key: &str, duration: Duration) {
        debug!("Store DELETE: {} took {:?}", key, duration);
    }

    /// Record a failed operation.
    fn record_error(&self, key: &str, error: &str) {
        warn!("Store ERROR for {}: {}", key, error);
    }
}

/// Default metrics implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl StoreMetrics for NoOpMetrics {
    fn record_read(&self, _key: &str, _found: bool, _duration: Duration) {}
    fn record_write(&self, _key: &str, _bytes: usize, _duration: Duration) {}
    fn record_delete(&self, _key: &str, _duration: Duration) {}
    fn record_error(&self, _key: &str, _error: &str) {}
}

/// Logs every operation through the trait defaults.
#[derive(Clone, Default)]
pub struct LogMetrics;

impl StoreMetrics for LogMetrics {}
