//! Redis-backed implementation of the CacheStore trait

use super::{CacheError, CacheStore};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;

/// CacheStore implementation over Redis
///
/// This is the production backend. Plain entries are stored as JSON strings
/// via SET/SET EX; the country and tag indexes map onto native Redis sets
/// (SADD/SREM/SMEMBERS). All errors surface as [`CacheError::Store`] so the
/// pipeline's retry machinery treats an unreachable Redis as a transient
/// handler failure.
#[derive(Clone)]
pub struct RedisStore {
    client: redis::Client,
}

impl RedisStore {
    /// Create a store from a Redis connection URL
    /// (e.g., "redis://localhost:6379")
    pub fn new(redis_url: &str) -> Result<Self, CacheError> {
        let client =
            redis::Client::open(redis_url).map_err(|e| CacheError::Store(e.to_string()))?;
        Ok(Self { client })
    }

    async fn conn(&self) -> Result<MultiplexedConnection, CacheError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::Store(e.to_string()))
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn().await?;
        conn.get(key)
            .await
            .map_err(|e| CacheError::Store(e.to_string()))
    }

    async fn put(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<(), CacheError> {
        let mut conn = self.conn().await?;
        match ttl {
            Some(ttl) => conn
                .set_ex(key, value, ttl.as_secs())
                .await
                .map_err(|e| CacheError::Store(e.to_string())),
            None => conn
                .set(key, value)
                .await
                .map_err(|e| CacheError::Store(e.to_string())),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn().await?;
        let _: u64 = conn
            .del(key)
            .await
            .map_err(|e| CacheError::Store(e.to_string()))?;
        Ok(())
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<(), CacheError> {
        let mut conn = self.conn().await?;
        let _: u64 = conn
            .sadd(key, member)
            .await
            .map_err(|e| CacheError::Store(e.to_string()))?;
        Ok(())
    }

    async fn set_remove(&self, key: &str, member: &str) -> Result<(), CacheError> {
        let mut conn = self.conn().await?;
        let _: u64 = conn
            .srem(key, member)
            .await
            .map_err(|e| CacheError::Store(e.to_string()))?;
        Ok(())
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>, CacheError> {
        let mut conn = self.conn().await?;
        conn.smembers(key)
            .await
            .map_err(|e| CacheError::Store(e.to_string()))
    }
}
