//! Shared helpers for hub integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use hub_rs::cache::{CacheError, CacheStore, MemoryStore};
use hub_rs::contracts::EmployeeRecord;
use hub_rs::services::{BroadcastService, CacheService};
use hub_rs::EmployeeEventConsumer;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub fn usa_employee(id: i64) -> EmployeeRecord {
    EmployeeRecord {
        id,
        name: "John".to_string(),
        last_name: "Doe".to_string(),
        salary: Some(75000.0),
        country: "USA".to_string(),
        ssn: Some("123-45-6789".to_string()),
        address: Some("123 Main St".to_string()),
        tax_id: None,
        goal: None,
    }
}

pub fn germany_employee(id: i64) -> EmployeeRecord {
    EmployeeRecord {
        id,
        name: "Hans".to_string(),
        last_name: "Mueller".to_string(),
        salary: Some(65000.0),
        country: "Germany".to_string(),
        ssn: None,
        address: None,
        tax_id: Some("DE123456789".to_string()),
        goal: Some("Increase productivity".to_string()),
    }
}

/// Serialized employee event envelope with a random event id
pub fn employee_event(event_type: &str, employee: &EmployeeRecord) -> Vec<u8> {
    employee_event_with_id(Uuid::new_v4(), event_type, employee, &[])
}

/// Serialized employee event envelope with an explicit event id
pub fn employee_event_with_id(
    event_id: Uuid,
    event_type: &str,
    employee: &EmployeeRecord,
    changed_fields: &[&str],
) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "event_id": event_id,
        "event_type": event_type,
        "timestamp": chrono::Utc::now(),
        "country": employee.country,
        "data": {
            "employee_id": employee.id,
            "changed_fields": changed_fields,
            "employee": employee
        }
    }))
    .expect("event envelope serializes")
}

/// Build a consumer plus the cache service it writes through
///
/// The broadcast side publishes into an isolated in-memory bus so handler
/// effects stay observable without a running consumer loop.
pub fn test_consumer(store: Arc<dyn CacheStore>) -> (EmployeeEventConsumer, Arc<CacheService>) {
    let cache = Arc::new(CacheService::new(store));
    let bus = Arc::new(event_bus::InMemoryBus::new());
    let broadcast = Arc::new(BroadcastService::new(bus));
    (EmployeeEventConsumer::new(cache.clone(), broadcast), cache)
}

/// CacheStore wrapper that fails `put` calls on demand
///
/// Used to simulate a cache store outage: handler writes fail while reads
/// keep working, which is exactly the transient-failure shape the retry
/// machine is built for.
pub struct FlakyStore {
    inner: MemoryStore,
    failures_remaining: AtomicU32,
}

impl FlakyStore {
    /// Fail the next `times` put calls, then behave normally
    pub fn failing(times: u32) -> Self {
        Self {
            inner: MemoryStore::new(),
            failures_remaining: AtomicU32::new(times),
        }
    }

    /// Fail every put call
    pub fn always_failing() -> Self {
        Self::failing(u32::MAX)
    }

    /// Re-arm the failure countdown
    pub fn set_failures(&self, times: u32) {
        self.failures_remaining.store(times, Ordering::SeqCst);
    }

    fn take_failure(&self) -> bool {
        let remaining = self.failures_remaining.load(Ordering::SeqCst);
        if remaining == 0 {
            return false;
        }
        if remaining != u32::MAX {
            self.failures_remaining.fetch_sub(1, Ordering::SeqCst);
        }
        true
    }
}

#[async_trait]
impl CacheStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<(), CacheError> {
        if self.take_failure() {
            return Err(CacheError::Store("injected cache store outage".to_string()));
        }
        self.inner.put(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.inner.delete(key).await
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<(), CacheError> {
        self.inner.set_add(key, member).await
    }

    async fn set_remove(&self, key: &str, member: &str) -> Result<(), CacheError> {
        self.inner.set_remove(key, member).await
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>, CacheError> {
        self.inner.set_members(key).await
    }
}
