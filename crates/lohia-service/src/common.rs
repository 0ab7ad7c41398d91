//! Helpers shared across the service modules.

use tracing::warn;
use uuid::Uuid;

use lohia_core::{AppError, AppResult};
use lohia_entity::{EmployeeDirectory, Machine, MachineSnapshot, MonitorStore};

/// Resolve the active machine registered for a device network id.
pub(crate) async fn machine_for_device(
    store: &dyn MonitorStore,
    device_id: &str,
) -> AppResult<Machine> {
    store.machine_by_device(device_id).await?.ok_or_else(|| {
        AppError::unknown_device(format!(
            "no active machine registered for device '{device_id}'"
        ))
    })
}

/// Re-fetch a machine by primary key, treating absence as an internal
/// inconsistency (the caller already resolved it once).
pub(crate) async fn machine_for_id(store: &dyn MonitorStore, id: Uuid) -> AppResult<Machine> {
    store
        .machine_by_id(id)
        .await?
        .ok_or_else(|| AppError::internal(format!("machine {id} vanished mid-operation")))
}

/// Build a machine snapshot with the operator name resolved.
///
/// Name resolution is display-only; a directory failure degrades to an
/// unnamed snapshot instead of failing the operation.
pub(crate) async fn snapshot(
    directory: &dyn EmployeeDirectory,
    machine: &Machine,
) -> MachineSnapshot {
    let name = operator_name(directory, machine.current_operator_id).await;
    MachineSnapshot::of(machine).with_operator_name(name)
}

/// Best-effort display-name lookup for an employee id.
pub(crate) async fn operator_name(
    directory: &dyn EmployeeDirectory,
    employee_id: Option<Uuid>,
) -> Option<String> {
    let id = employee_id?;
    match directory.find_by_id(id).await {
        Ok(employee) => employee.map(|e| e.full_name),
        Err(error) => {
            warn!(employee_id = %id, %error, "employee name lookup failed");
            None
        }
    }
}
