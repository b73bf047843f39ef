use super::HandlerError;
use crate::contracts::EmployeeEventV1;
use crate::services::{country_tag, BroadcastService, CacheService, EMPLOYEE_TTL};

/// Handle an EmployeeUpdated event
///
/// The cached record is replaced wholesale, never patched: the producer
/// always sends the full current record, and `changed_fields` is carried
/// for audit logging only.
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
        changed_fields = ?event.data.changed_fields,
        "Employee updated event applied to cache"
    );
    Ok(())
}
