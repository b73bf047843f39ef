//! Best-effort WebSocket broadcast
//!
//! Pushes employee events to per-country subscriber channels through the
//! event bus. Broadcast is explicitly non-critical: every failure is caught
//! and logged here and never reaches the handler's Ack/Requeue/Reject
//! decision.

use crate::contracts::{EmployeeEventV1, EmployeeRecord, EventType};
use event_bus::{BusError, EventBus};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Payload pushed to subscribers; the SSN is masked before transmission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastPayload {
    pub event_type: EventType,
    pub employee: EmployeeRecord,
}

/// Fire-and-log notifier over the event bus
pub struct BroadcastService {
    bus: Arc<dyn EventBus>,
}

impl BroadcastService {
    pub fn new(bus: Arc<dyn EventBus>) -> Self {
        Self { bus }
    }

    /// Broadcast an employee event to its country channel
    ///
    /// Failures are logged at error level and swallowed.
    pub async fn broadcast_employee_event(&self, event: &EmployeeEventV1) {
        if let Err(err) = self.try_broadcast(event).await {
            tracing::error!(
                event_type = %event.event_type,
                error = %err,
                "WebSocket broadcast failed"
            );
        }
    }

    async fn try_broadcast(&self, event: &EmployeeEventV1) -> Result<(), BusError> {
        let channel = channel_name(&event.country);
        let payload = build_payload(&event.event_type, &event.data.employee);
        let bytes =
            serde_json::to_vec(&payload).map_err(|e| BusError::SerializationError(e.to_string()))?;
        let payload_size_bytes = bytes.len();

        self.bus.publish(&channel, bytes).await?;

        tracing::debug!(
            channel = %channel,
            event_name = %event.event_type,
            payload_size_bytes,
            "WebSocket broadcast sent"
        );
        Ok(())
    }
}

/// Broadcast channel name for a country
pub fn channel_name(country: &str) -> String {
    format!("employees.{country}")
}

/// Build the broadcast payload with SSN masking
pub fn build_payload(event_type: &EventType, employee: &EmployeeRecord) -> BroadcastPayload {
    let mut masked = employee.clone();
    masked.ssn = masked.ssn.map(|ssn| mask_ssn(&ssn));

    BroadcastPayload {
        event_type: event_type.clone(),
        employee: masked,
    }
}

/// Mask an SSN to `***-**-XXXX`, keeping only the last 4 characters
pub fn mask_ssn(ssn: &str) -> String {
    if ssn.is_empty() {
        return String::new();
    }

    let chars: Vec<char> = ssn.chars().collect();
    let last4: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("***-**-{last4}")
}
