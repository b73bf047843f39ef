//! Employee Event Consumer
//!
//! Deserializes broker messages, routes them by event type, and owns the
//! retry/dead-letter state machine. `process_message` is transport-free: it
//! only mutates the retry table and delegates to a handler, returning the
//! disposition the loop maps onto the bus.

use crate::consumer::retry::{FailureOutcome, RetryTracker};
use crate::contracts::{EmployeeEventV1, EventType};
use crate::handlers;
use crate::services::{BroadcastService, CacheService};
use event_bus::EventBus;
use futures::StreamExt;
use std::sync::Arc;

/// Subject pattern binding all employee events
/// (`employee.{action}.{country}`)
pub const EMPLOYEE_EVENTS_PATTERN: &str = "employee.>";

const MAX_ATTEMPTS: u32 = 3;

/// What the loop should do with the message after processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Message handled (or intentionally skipped); remove from the queue
    Ack,
    /// Transient failure; redeliver the message
    Requeue,
    /// Unprocessable or retries exhausted; route to the dead-letter queue
    Reject,
}

/// Validates, routes, and retries employee event messages
pub struct EmployeeEventConsumer {
    cache: Arc<CacheService>,
    broadcast: Arc<BroadcastService>,
    retries: RetryTracker,
}

impl EmployeeEventConsumer {
    pub fn new(cache: Arc<CacheService>, broadcast: Arc<BroadcastService>) -> Self {
        Self {
            cache,
            broadcast,
            retries: RetryTracker::new(MAX_ATTEMPTS),
        }
    }

    /// Process one raw broker message into a disposition
    ///
    /// - Unparseable or schema-invalid payloads are rejected immediately:
    ///   malformed input will never self-correct, so it is never retried.
    /// - Unknown event types are acknowledged with a warning so future
    ///   producers cannot jam the queue.
    /// - Handler failures are retried up to 3 attempts per `event_id`
    ///   (counting across redeliveries), then rejected with every captured
    ///   error in the log record.
    pub async fn process_message(&mut self, raw: &[u8]) -> Disposition {
        let event: EmployeeEventV1 = match serde_json::from_slice(raw) {
            Ok(event) => event,
            Err(err) => {
                tracing::error!(
                    error = %err,
                    raw_payload = %String::from_utf8_lossy(raw),
                    "Rejecting malformed employee event message"
                );
                return Disposition::Reject;
            }
        };

        let outcome = match &event.event_type {
            EventType::EmployeeCreated => {
                handlers::created::handle(&self.cache, &self.broadcast, &event).await
            }
            EventType::EmployeeUpdated => {
                handlers::updated::handle(&self.cache, &self.broadcast, &event).await
            }
            EventType::EmployeeDeleted => {
                handlers::deleted::handle(&self.cache, &self.broadcast, &event).await
            }
            EventType::Unknown(unknown) => {
                tracing::warn!(
                    event_id = %event.event_id,
                    event_type = %unknown,
                    "Unknown event_type, acknowledging without a handler"
                );
                return Disposition::Ack;
            }
        };

        match outcome {
            Ok(()) => {
                self.retries.clear(event.event_id);
                Disposition::Ack
            }
            Err(err) => match self.retries.record_failure(event.event_id, err.to_string()) {
                FailureOutcome::Retry { attempt } => {
                    tracing::warn!(
                        event_id = %event.event_id,
                        event_type = %event.event_type,
                        attempt,
                        error = %err,
                        "Handler failed, requeueing for redelivery"
                    );
                    Disposition::Requeue
                }
                FailureOutcome::Exhausted { attempts, errors } => {
                    tracing::error!(
                        event_id = %event.event_id,
                        event_type = %event.event_type,
                        attempts,
                        exception_messages = ?errors,
                        "Message sent to dead-letter after failed attempts"
                    );
                    Disposition::Reject
                }
            },
        }
    }
}

/// Start the employee event consumer task
///
/// Subscribes to `employee.>` and processes messages strictly one at a
/// time: the next message is only read once the current one has been
/// dispositioned. Requeue republishes to the original subject (broker
/// redelivery); Reject routes the raw payload to `{queue}.dlq`.
pub async fn start_employee_event_consumer(
    bus: Arc<dyn EventBus>,
    cache: Arc<CacheService>,
    broadcast: Arc<BroadcastService>,
    queue: String,
) {
    tokio::spawn(async move {
        tracing::info!("Starting employee event consumer");

        let mut stream = match bus.subscribe(EMPLOYEE_EVENTS_PATTERN).await {
            Ok(stream) => stream,
            Err(err) => {
                tracing::error!(
                    "Failed to subscribe to {}: {}",
                    EMPLOYEE_EVENTS_PATTERN,
                    err
                );
                return;
            }
        };

        let dlq_subject = format!("{queue}.dlq");
        tracing::info!(
            "Subscribed to {}. Waiting for messages on [{}]...",
            EMPLOYEE_EVENTS_PATTERN,
            queue
        );

        let mut consumer = EmployeeEventConsumer::new(cache, broadcast);

        while let Some(msg) = stream.next().await {
            match consumer.process_message(&msg.payload).await {
                Disposition::Ack => {}
                Disposition::Requeue => {
                    if let Err(err) = bus.publish(&msg.subject, msg.payload.clone()).await {
                        tracing::error!(
                            subject = %msg.subject,
                            error = %err,
                            "Failed to requeue message"
                        );
                    }
                }
                Disposition::Reject => {
                    if let Err(err) = bus.publish(&dlq_subject, msg.payload.clone()).await {
                        tracing::error!(
                            subject = %msg.subject,
                            dlq_subject = %dlq_subject,
                            error = %err,
                            "Failed to route message to dead-letter queue"
                        );
                    }
                }
            }
        }

        tracing::warn!("Employee event consumer stopped");
    });
}
