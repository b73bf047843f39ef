//! Employee Event V1 Contract Types
//!
//! These types match the JSON payload published by the HR service on the
//! `employee.{action}.{country}` subjects.
//!
//! IMPORTANT: Field names must match the producer's wire format EXACTLY
//! (case-sensitive). Deserialization is the schema check: an envelope
//! missing any required field fails to parse and is rejected by the
//! consumer without retries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Event envelope for employee lifecycle events
///
/// `event_id` is the idempotency/retry-tracking key; `country` is the
/// partition key. `country` is deliberately an open string here: the
/// transport layer must not hard-fail on values outside the supported set,
/// only the checklist engine enforces the closed country list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeEventV1 {
    /// Unique event identifier (retry-tracking and dedup key)
    pub event_id: Uuid,

    /// Event type discriminator; unknown wire values map to
    /// [`EventType::Unknown`] instead of failing the parse
    pub event_type: EventType,

    /// ISO 8601 production time of the event
    pub timestamp: DateTime<Utc>,

    /// Partition key ("USA", "Germany", ...)
    pub country: String,

    /// Event payload
    pub data: EmployeeEventData,
}

/// Payload of an employee event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeEventData {
    /// Identifier of the affected employee
    pub employee_id: i64,

    /// Field names that changed (empty for Created/Deleted)
    #[serde(default)]
    pub changed_fields: Vec<String>,

    /// Full current record (last-known record for Deleted), unmasked
    pub employee: EmployeeRecord,
}

/// Employee record snapshot as published by the HR service
///
/// Union of the USA and Germany field sets; the producer only serializes
/// the fields relevant to the employee's country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id: i64,
    pub name: String,
    pub last_name: String,
    pub salary: Option<f64>,
    pub country: String,

    // USA-specific
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    // Germany-specific
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
}

/// Employee event types carried on the wire
///
/// Closed set plus a fallback variant: consumers must tolerate event types
/// introduced by newer producers, so deserialization never fails on the
/// discriminator alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    EmployeeCreated,
    EmployeeUpdated,
    EmployeeDeleted,
    Unknown(String),
}

impl EventType {
    /// Wire spelling of the event type
    pub fn as_str(&self) -> &str {
        match self {
            EventType::EmployeeCreated => "EmployeeCreated",
            EventType::EmployeeUpdated => "EmployeeUpdated",
            EventType::EmployeeDeleted => "EmployeeDeleted",
            EventType::Unknown(other) => other,
        }
    }
}

impl From<String> for EventType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "EmployeeCreated" => EventType::EmployeeCreated,
            "EmployeeUpdated" => EventType::EmployeeUpdated,
            "EmployeeDeleted" => EventType::EmployeeDeleted,
            _ => EventType::Unknown(value),
        }
    }
}

impl From<EventType> for String {
    fn from(value: EventType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
