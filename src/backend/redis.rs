//! Redis storage backend implementation.

use super::StorageBackend;
use crate::error::{Error, Result};
use deadpool_redis::{redis::AsyncCommands, Config as PoolConfig, Pool, Runtime};
use std::time::Duration;

/// Pool statistics information.
#[derive(Debug, Clone)]
pub struct PoolStats {
    pub connections: u32,
    pub idle_connections: u32,
}

/// Default Redis connection pool size.
/// Override with REDIS_POOL_SIZE environment variable
const DEFAULT_POOL_SIZE: u32 = 16;

/// Default key namespace; keeps marketplace collections apart from other data.
pub const DEFAULT_NAMESPACE: &str = "ecofinds:";

/// Configuration for Redis backend.
#[derive(Clone, Debug)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub database: u32,
    pub pool_size: u32,
    pub connection_timeout: Duration,
    /// Prefix prepended to every collection key.
    pub namespace: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        RedisConfig {
            host: "localhost".to_string(),
            port: 6379,
            username: None,
            password: None,
            database: 0,
            pool_size: DEFAULT_POOL_SIZE,
            connection_timeout: Duration::from_secs(5),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl RedisConfig {
    /// Build Redis connection string.
    pub fn connection_string(&self) -> String {
        if let Some(password) = &self.password {
            if let Some(username) = &self.username {
                format!(
                    "redis://{}:{}@{}:{}/{}",
                    username, password, self.host, self.port, self.database
                )
            } else {
                format!(
                    "redis://default:{}@{}:{}/{}",
                    password, self.host, self.port, self.database
                )
            }
        } else {
            format!("redis://{}:{}/{}", self.host, self.port, self.database)
        }
    }
}

/// Redis backend with connection pooling and async operations.
///
/// Each collection is one Redis string holding the JSON list. Keys are
/// namespaced, so `products` is stored as `ecofinds:products` by default.
///
/// # Example
///
/// ```no_run
/// # use ecofinds_store::backend::{RedisBackend, RedisConfig, StorageBackend};
/// # use ecofinds_store::error::Result;
/// # async fn example() -> Result<()> {
/// let backend = RedisBackend::new(RedisConfig::default()).await?;
///
/// backend.put("users", b"[]".to_vec()).await?;
/// let value = backend.get("users").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RedisBackend {
    pool: Pool,
    namespace: String,
}

impl RedisBackend {
    /// Create new Redis backend from configuration.
    ///
    /// # Errors
    /// Returns `Err` if pool creation fails.
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let conn_str = config.connection_string();
        let mut cfg = PoolConfig::from_url(conn_str);
        let mut pool_cfg = deadpool_redis::PoolConfig::new(config.pool_size as usize);
        pool_cfg.timeouts.wait = Some(config.connection_timeout);
        pool_cfg.timeouts.create = Some(config.connection_timeout);
        cfg.pool = Some(pool_cfg);

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| Error::ConfigError(format!("Failed to create Redis pool: {}", e)))?;

        info!(
            "✓ Redis backend initialized: {}:{} (namespace {:?})",
            config.host, config.port, config.namespace
        );

        Ok(RedisBackend {
            pool,
            namespace: config.namespace,
        })
    }

    /// Create from connection string directly, using the default namespace.
    ///
    /// Pool size is determined by:
    /// 1. `REDIS_POOL_SIZE` environment variable (if set)
    /// 2. `DEFAULT_POOL_SIZE` constant (16)
    ///
    /// # Errors
    /// Returns `Err` if pool creation fails.
    pub async fn from_connection_string(conn_str: &str) -> Result<Self> {
        let pool_size = std::env::var("REDIS_POOL_SIZE")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_POOL_SIZE);

        let mut cfg = PoolConfig::from_url(conn_str);
        cfg.pool = Some(deadpool_redis::PoolConfig::new(pool_size as usize));

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| Error::ConfigError(format!("Failed to create Redis pool: {}", e)))?;

        info!(
            "✓ Redis backend initialized from connection string (pool size: {})",
            pool_size
        );

        Ok(RedisBackend {
            pool,
            namespace: DEFAULT_NAMESPACE.to_string(),
        })
    }

    /// Replace the key namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Get current pool statistics.
    pub fn pool_stats(&self) -> PoolStats {
        let status = self.pool.status();
        PoolStats {
            connections: status.size as u32,
            idle_connections: status.available as u32,
        }
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.namespace, key)
    }

    async fn connection(&self) -> Result<deadpool_redis::Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| Error::BackendError(format!("Failed to get Redis connection: {}", e)))
    }
}

impl StorageBackend for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.connection().await?;
        let full_key = self.namespaced(key);

        let value: Option<Vec<u8>> = conn.get(&full_key).await.map_err(|e| {
            Error::BackendError(format!("Redis GET failed for key {}: {}", full_key, e))
        })?;

        match &value {
            Some(bytes) => debug!("✓ Redis GET {} -> {} bytes", full_key, bytes.len()),
            None => debug!("✓ Redis GET {} -> ABSENT", full_key),
        }

        Ok(value)
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut conn = self.connection().await?;
        let full_key = self.namespaced(key);
        let size = value.len();

        conn.set::<_, _, ()>(&full_key, value).await.map_err(|e| {
            Error::BackendError(format!("Redis SET failed for key {}: {}", full_key, e))
        })?;

        debug!("✓ Redis PUT {} ({} bytes)", full_key, size);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        let full_key = self.namespaced(key);

        conn.del::<_, ()>(&full_key).await.map_err(|e| {
            Error::BackendError(format!("Redis DEL failed for key {}: {}", full_key, e))
        })?;

        debug!("✓ Redis DELETE {}", full_key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection().await?;
        let full_key = self.namespaced(key);

        let exists: bool = conn.exists(&full_key).await.map_err(|e| {
            Error::BackendError(format!("Redis EXISTS failed for key {}: {}", full_key, e))
        })?;

        Ok(exists)
    }

    async fn health_check(&self) -> Result<bool> {
        let mut conn = self.connection().await?;

        let pong: String = deadpool_redis::redis::cmd("PING")
            .query_async(&mut *conn)
            .await
            .map_err(|e| Error::BackendError(format!("Redis PING failed: {}", e)))?;

        Ok(pong.contains("PONG"))
    }

    /// Removes only the keys under this backend's namespace.
    async fn clear_all(&self) -> Result<()> {
        let mut conn = self.connection().await?;
        let pattern = format!("{}*", self.namespace);

        let keys: Vec<String> = conn
            .keys(&pattern)
            .await
            .map_err(|e| Error::BackendError(format!("Redis KEYS failed: {}", e)))?;

        if !keys.is_empty() {
            conn.del::<_, ()>(&keys)
                .await
                .map_err(|e| Error::BackendError(format!("Redis DEL (bulk) failed: {}", e)))?;
        }

        warn!(
            "⚠ Redis CLEAR_ALL executed - {} keys under {:?} removed!",
            keys.len(),
            self.namespace
        );
        Ok(())
    }
}
