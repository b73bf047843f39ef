//! Cache-aside primitives over the cache store
//!
//! Owns the key schema and the two secondary indexes:
//!
//! - `employee:{id}`: employee record snapshot (TTL 300s)
//! - `country:{country}:employee_ids`: per-country set of cached employee
//!   ids, no TTL, pruned on read when entries have expired underneath it
//! - `tag:{tag}:keys`: set of cache keys registered under a tag, the
//!   bulk-eviction primitive behind country-scoped invalidation
//!
//! Invariant: a write that changes or removes `employee:{id}` must, in the
//! same handler operation, keep the country index current and invalidate
//! the country's tagged entries. The handlers own that sequencing; this
//! service owns each step.

use crate::cache::{CacheError, CacheStore};
use crate::contracts::EmployeeRecord;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// TTL for individual employee entries
pub const EMPLOYEE_TTL: Duration = Duration::from_secs(300);

/// Tag grouping every country-scoped cache entry
pub fn country_tag(country: &str) -> String {
    format!("country:{country}")
}

fn employee_key(id: i64) -> String {
    format!("employee:{id}")
}

fn country_index_key(country: &str) -> String {
    format!("country:{country}:employee_ids")
}

fn tag_index_key(tag: &str) -> String {
    format!("tag:{tag}:keys")
}

/// Cache-aside service over a swappable [`CacheStore`]
pub struct CacheService {
    store: Arc<dyn CacheStore>,
}

impl CacheService {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Cache-aside read: return the cached value if present, otherwise run
    /// `compute`, store the result with `ttl`, and return it.
    ///
    /// Read-path degradation: a store failure on either side of `compute`
    /// is logged and the computed value is returned uncached. Only a
    /// failure of `compute` itself propagates.
    pub async fn remember<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        compute: F,
    ) -> Result<T, CacheError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CacheError>>,
    {
        if let Some(value) = self.read_entry(key).await {
            return Ok(value);
        }

        let value = compute().await?;
        let json = serde_json::to_string(&value)?;
        if let Err(err) = self.store.put(key, json, Some(ttl)).await {
            tracing::warn!(key = %key, error = %err, "Failed to store computed cache entry");
        }
        Ok(value)
    }

    /// Same as [`remember`](Self::remember), but registers the entry under
    /// `tag` so [`invalidate_tag`](Self::invalidate_tag) can evict it.
    pub async fn remember_tagged<T, F, Fut>(
        &self,
        key: &str,
        tag: &str,
        ttl: Duration,
        compute: F,
    ) -> Result<T, CacheError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CacheError>>,
    {
        if let Some(value) = self.read_entry(key).await {
            return Ok(value);
        }

        let value = compute().await?;
        let json = serde_json::to_string(&value)?;

        // The tag index is written first: an entry the tag cannot reach
        // would survive invalidation, which is a correctness bug. If the
        // index write fails the entry is not cached at all.
        match self.store.set_add(&tag_index_key(tag), key).await {
            Ok(()) => {
                if let Err(err) = self.store.put(key, json, Some(ttl)).await {
                    tracing::warn!(key = %key, error = %err, "Failed to store computed cache entry");
                }
            }
            Err(err) => {
                tracing::warn!(
                    key = %key,
                    tag = %tag,
                    error = %err,
                    "Failed to register cache tag, skipping cache write"
                );
            }
        }
        Ok(value)
    }

    /// Evict every entry registered under `tag`, regardless of TTL
    pub async fn invalidate_tag(&self, tag: &str) -> Result<(), CacheError> {
        let index = tag_index_key(tag);
        let keys = self.store.set_members(&index).await?;
        for key in &keys {
            self.store.delete(key).await?;
        }
        self.store.delete(&index).await?;

        tracing::debug!(tag = %tag, evicted = keys.len(), "Invalidated tagged cache entries");
        Ok(())
    }

    /// Store `employee:{id}` and add the id to its country index
    pub async fn put_employee(
        &self,
        id: i64,
        record: &EmployeeRecord,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let json = serde_json::to_string(record)?;
        self.store.put(&employee_key(id), json, Some(ttl)).await?;
        self.store
            .set_add(&country_index_key(&record.country), &id.to_string())
            .await?;
        Ok(())
    }

    /// Delete `employee:{id}` and drop the id from the country index the
    /// record was last known to belong to.
    ///
    /// The country comes from the cached record itself, so the id is
    /// removed from the right index even if the employee has since moved
    /// countries. An absent entry is a no-op (idempotent under redelivery).
    pub async fn remove_employee(&self, id: i64) -> Result<(), CacheError> {
        let key = employee_key(id);
        let Some(json) = self.store.get(&key).await? else {
            return Ok(());
        };

        match serde_json::from_str::<EmployeeRecord>(&json) {
            Ok(record) => {
                self.store
                    .set_remove(&country_index_key(&record.country), &id.to_string())
                    .await?;
            }
            Err(err) => {
                tracing::warn!(
                    key = %key,
                    error = %err,
                    "Cached employee entry is not deserializable, deleting without index cleanup"
                );
            }
        }

        self.store.delete(&key).await?;
        Ok(())
    }

    /// Resolve the country index to employee records, sorted by id
    ///
    /// Ids whose `employee:{id}` entry has expired are skipped and pruned
    /// from the index: the index is eventually consistent with the entries
    /// underneath it, not strictly.
    pub async fn employees_by_country(
        &self,
        country: &str,
    ) -> Result<Vec<EmployeeRecord>, CacheError> {
        let index = country_index_key(country);
        let ids = self.store.set_members(&index).await?;

        let mut employees = Vec::with_capacity(ids.len());
        for id in ids {
            match self.store.get(&format!("employee:{id}")).await? {
                Some(json) => match serde_json::from_str::<EmployeeRecord>(&json) {
                    Ok(record) => employees.push(record),
                    Err(err) => {
                        tracing::warn!(
                            employee_id = %id,
                            error = %err,
                            "Skipping undeserializable employee cache entry"
                        );
                    }
                },
                None => {
                    // Entry expired out from under the index; prune
                    self.store.set_remove(&index, &id).await?;
                }
            }
        }

        employees.sort_by_key(|record| record.id);
        Ok(employees)
    }

    /// Read and deserialize a cached entry, degrading to a miss on store
    /// or deserialization failure
    async fn read_entry<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.store.get(key).await {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(value) => Some(value),
                Err(err) => {
                    tracing::warn!(key = %key, error = %err, "Discarding undeserializable cache entry");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Cache read failed, computing directly");
                None
            }
        }
    }
}
