//! Pipeline services: cache projection, checklist evaluation, broadcast

pub mod broadcast_service;
pub mod cache_service;
pub mod checklist_rules;
pub mod checklist_service;

pub use broadcast_service::BroadcastService;
pub use cache_service::{country_tag, CacheService, EMPLOYEE_TTL};
pub use checklist_service::{ChecklistError, ChecklistService};
