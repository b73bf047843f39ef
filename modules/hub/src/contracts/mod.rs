//! Wire contracts consumed and produced by the hub

pub mod employee_event_v1;

pub use employee_event_v1::{EmployeeEventData, EmployeeEventV1, EmployeeRecord, EventType};
