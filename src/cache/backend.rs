//! Cache Backend Module
//!
//! The cache capability handed to every resource controller, plus the
//! in-process implementation used by the server.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{CacheResult, CacheStats, CacheStore};

// == Cache Backend Trait ==
/// Key-value store with expiry.
///
/// Implementations perform no retries; any error is final for the request.
#[async_trait]
pub trait CacheBackend: Send + Sync + 'static {
    /// Returns the value for `key`, or `None` when absent or expired.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `value` under `key` for `ttl` seconds, replacing any previous value.
    async fn set(&self, key: &str, value: String, ttl: u64) -> CacheResult<()>;

    /// Removes `key`. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> CacheResult<()>;
}

// == Memory Cache ==
/// Process-local cache backed by a shared [`CacheStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    store: Arc<RwLock<CacheStore>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the underlying store, used by the cleanup task.
    pub fn store(&self) -> Arc<RwLock<CacheStore>> {
        self.store.clone()
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    /// Checks for a live entry without recording a hit or miss.
    pub async fn contains(&self, key: &str) -> bool {
        self.store.read().await.contains(key)
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        // Write lock: an expired entry is dropped on read
        Ok(self.store.write().await.get(key))
    }

    async fn set(&self, key: &str, value: String, ttl: u64) -> CacheResult<()> {
        self.store.write().await.set(key.to_string(), value, ttl)
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.store.write().await.delete(key);
        Ok(())
    }
}
