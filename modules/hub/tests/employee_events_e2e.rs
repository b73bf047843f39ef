//! End-to-end pipeline tests: InMemoryBus → consumer loop → cache
//!
//! Runs the real consumer task against the in-memory bus and store, the
//! same wiring `main` builds with BUS_TYPE=inmemory / CACHE_BACKEND=memory.

mod common;

use common::{employee_event_with_id, usa_employee, FlakyStore};
use event_bus::{EventBus, InMemoryBus};
use futures::StreamExt;
use hub_rs::cache::{CacheStore, MemoryStore};
use hub_rs::services::{country_tag, BroadcastService, CacheService};
use hub_rs::start_employee_event_consumer;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use uuid::Uuid;

const QUEUE: &str = "hub.employee.events";

async fn start_pipeline(store: Arc<dyn CacheStore>) -> (Arc<InMemoryBus>, Arc<CacheService>) {
    let bus = Arc::new(InMemoryBus::new());
    let cache = Arc::new(CacheService::new(store));
    let broadcast = Arc::new(BroadcastService::new(bus.clone() as Arc<dyn EventBus>));

    start_employee_event_consumer(
        bus.clone() as Arc<dyn EventBus>,
        cache.clone(),
        broadcast,
        QUEUE.to_string(),
    )
    .await;

    // Give the consumer time to subscribe
    sleep(Duration::from_millis(200)).await;

    (bus, cache)
}

#[tokio::test]
async fn test_updated_event_end_to_end() {
    let store = Arc::new(MemoryStore::new());
    let (bus, cache) = start_pipeline(store.clone()).await;

    // Pre-populate tagged caches the event must invalidate
    let computes = Arc::new(AtomicU32::new(0));
    let page_key = "employees:USA:page:1:per_page:10";
    let checklist_key = "checklist:USA";
    let tag = country_tag("USA");
    let ttl = Duration::from_secs(300);

    for key in [page_key, checklist_key] {
        let computes = computes.clone();
        let _: u32 = cache
            .remember_tagged(key, &tag, ttl, || async move {
                computes.fetch_add(1, Ordering::SeqCst);
                Ok(1)
            })
            .await
            .unwrap();
    }
    assert_eq!(computes.load(Ordering::SeqCst), 2);

    // Listen on the broadcast channel before publishing
    let mut broadcasts = bus.subscribe("employees.USA").await.unwrap();

    // Publish EmployeeUpdated for employee 10 with the new salary
    let mut employee = usa_employee(10);
    employee.salary = Some(95000.0);
    let payload =
        employee_event_with_id(Uuid::new_v4(), "EmployeeUpdated", &employee, &["salary"]);
    bus.publish("employee.updated.USA", payload).await.unwrap();

    sleep(Duration::from_millis(500)).await;

    // The cache now holds the new record
    let employees = cache.employees_by_country("USA").await.unwrap();
    assert_eq!(employees.len(), 1);
    assert_eq!(employees[0].id, 10);
    assert_eq!(employees[0].salary, Some(95000.0));

    // Both tagged entries were invalidated: re-reading recomputes
    for key in [page_key, checklist_key] {
        let computes = computes.clone();
        let _: u32 = cache
            .remember_tagged(key, &tag, ttl, || async move {
                computes.fetch_add(1, Ordering::SeqCst);
                Ok(2)
            })
            .await
            .unwrap();
    }
    assert_eq!(computes.load(Ordering::SeqCst), 4);

    // Subscribers got the masked payload
    let msg = tokio::time::timeout(Duration::from_secs(1), broadcasts.next())
        .await
        .expect("timeout waiting for broadcast")
        .expect("broadcast stream ended");
    let broadcast: serde_json::Value = serde_json::from_slice(&msg.payload).unwrap();
    assert_eq!(broadcast["event_type"], "EmployeeUpdated");
    assert_eq!(broadcast["employee"]["ssn"], "***-**-6789");
    assert_eq!(broadcast["employee"]["salary"], 95000.0);
}

#[tokio::test]
async fn test_transient_failures_recover_through_redelivery() {
    // The first two cache writes fail, forcing two requeue cycles
    let store = Arc::new(FlakyStore::failing(2));
    let (bus, cache) = start_pipeline(store).await;

    let employee = usa_employee(1);
    let payload = employee_event_with_id(Uuid::new_v4(), "EmployeeCreated", &employee, &[]);
    bus.publish("employee.created.USA", payload).await.unwrap();

    sleep(Duration::from_millis(500)).await;

    // Third delivery succeeded and populated the cache
    let employees = cache.employees_by_country("USA").await.unwrap();
    assert_eq!(employees, vec![employee]);
}

#[tokio::test]
async fn test_exhausted_retries_route_to_dead_letter_queue() {
    let store = Arc::new(FlakyStore::always_failing());
    let (bus, cache) = start_pipeline(store).await;

    let mut dlq = bus.subscribe(&format!("{QUEUE}.dlq")).await.unwrap();

    let employee = usa_employee(2);
    let payload = employee_event_with_id(Uuid::new_v4(), "EmployeeCreated", &employee, &[]);
    bus.publish("employee.created.USA", payload.clone())
        .await
        .unwrap();

    // After three failed attempts the raw payload lands on the DLQ subject
    let msg = tokio::time::timeout(Duration::from_secs(2), dlq.next())
        .await
        .expect("timeout waiting for dead-letter message")
        .expect("dlq stream ended");
    assert_eq!(msg.payload, payload);

    assert!(cache.employees_by_country("USA").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_message_dead_lettered_immediately() {
    let store = Arc::new(MemoryStore::new());
    let (bus, _cache) = start_pipeline(store).await;

    let mut dlq = bus.subscribe(&format!("{QUEUE}.dlq")).await.unwrap();

    let garbage = b"{not valid json at all!!!".to_vec();
    bus.publish("employee.created.USA", garbage.clone())
        .await
        .unwrap();

    let msg = tokio::time::timeout(Duration::from_secs(1), dlq.next())
        .await
        .expect("timeout waiting for dead-letter message")
        .expect("dlq stream ended");
    assert_eq!(msg.payload, garbage);
}
