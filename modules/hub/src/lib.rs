pub mod cache;
pub mod config;
pub mod consumer;
pub mod contracts;
pub mod handlers;
pub mod health;
pub mod services;

pub use consumer::{start_employee_event_consumer, Disposition, EmployeeEventConsumer};
