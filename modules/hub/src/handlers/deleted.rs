use super::HandlerError;
use crate::contracts::EmployeeEventV1;
use crate::services::{country_tag, BroadcastService, CacheService};

/// Handle an EmployeeDeleted event
///
/// Removes the snapshot and its country-index membership. Deleting an id
/// that is not cached is a no-op, so the handler is idempotent under
/// broker redelivery.
pub async fn handle(
    cache: &CacheService,
    broadcast: &BroadcastService,
    event: &EmployeeEventV1,
) -> Result<(), HandlerError> {
    cache.remove_employee(event.data.employee_id).await?;
    cache.invalidate_tag(&country_tag(&event.country)).await?;

    broadcast.broadcast_employee_event(event).await;

    tracing::info!(
        employee_id = event.data.employee_id,
        country = %event.country,
        "Employee deleted event applied to cache"
    );
    Ok(())
}
