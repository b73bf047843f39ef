use super::HandlerError;
use crate::contracts::EmployeeEventV1;
use crate::services::{country_tag, BroadcastService, CacheService, EMPLOYEE_TTL};

/// Handle an EmployeeCreated event
///
/// Writes the employee snapshot, updates the country index, invalidates
/// the country's tagged caches (paginated lists, checklist), then
/// broadcasts best-effort.
pub async fn handle(
    cache: &CacheService,
    broadcast: &BroadcastService,
    event: &EmployeeEventV1,
) -> Result<(), HandlerError> {
    cache
        .put_employee(event.data.employee_id, &event.data.employee, EMPLOYEE_TTL)
        .await?;
    cache.invalidate_tag(&country_tag(&event.country)).await?;

    broadcast.broadcast_employee_event(event).await;

    tracing::info!(
        employee_id = event.data.employee_id,
        country = %event.country,
        "Employee created event applied to cache"
    );
    Ok(())
}
