//! Cache store backends
//!
//! The pipeline's only durable-ish state is the employee read cache. The
//! backing store is swappable by config: `MemoryStore` for dev/test,
//! `RedisStore` in production. Beyond plain get/put/delete with TTL, the
//! store exposes set primitives used for the country and tag secondary
//! indexes (the stores have no native tagging, so tags are modeled as
//! explicit key sets).

pub mod memory;
pub mod redis;

pub use memory::MemoryStore;
pub use redis::RedisStore;

use async_trait::async_trait;
use std::time::Duration;

/// Errors raised by cache stores and the cache service
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache store error: {0}")]
    Store(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Key/value store with TTL support plus set primitives for indexes
///
/// Values are JSON strings; callers own (de)serialization. Implementations
/// must be safe to share across tasks.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch a value; `None` when the key is absent or its TTL has expired
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store a value, optionally with a TTL (`None` = no expiry)
    async fn put(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<(), CacheError>;

    /// Delete a key; deleting an absent key is a no-op
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Add a member to the set stored at `key` (created on first add)
    async fn set_add(&self, key: &str, member: &str) -> Result<(), CacheError>;

    /// Remove a member from the set stored at `key`
    async fn set_remove(&self, key: &str, member: &str) -> Result<(), CacheError>;

    /// All members of the set stored at `key` (empty when absent)
    async fn set_members(&self, key: &str) -> Result<Vec<String>, CacheError>;
}
