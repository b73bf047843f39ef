//! Event consumer: validation, routing, retry/dead-letter state machine

pub mod employee_event_consumer;
pub mod retry;

pub use employee_event_consumer::{
    start_employee_event_consumer, Disposition, EmployeeEventConsumer, EMPLOYEE_EVENTS_PATTERN,
};
