//! Badge router: turns RFID scans into shift or maintenance operations.

use std::sync::Arc;

use tracing::{info, warn};

use lohia_core::{AppError, AppResult};
use lohia_entity::{EmployeeDirectory, EmployeeRole, MonitorStore};

use crate::common;
use crate::maintenance::MaintenanceWorkflow;
use crate::outcome::{OperationOutcome, ScanAction};
use crate::shift::ShiftLedger;

/// Resolves a badge against the staff directory and dispatches the scan to
/// the workflow the holder's role selects.
///
/// The badge is resolved exactly once per scan; downstream workflows
/// receive the employee, never the raw UID.
pub struct BadgeRouter {
    store: Arc<dyn MonitorStore>,
    directory: Arc<dyn EmployeeDirectory>,
    shifts: Arc<ShiftLedger>,
    maintenance: Arc<MaintenanceWorkflow>,
}

impl BadgeRouter {
    /// Create a new badge router.
    pub fn new(
        store: Arc<dyn MonitorStore>,
        directory: Arc<dyn EmployeeDirectory>,
        shifts: Arc<ShiftLedger>,
        maintenance: Arc<MaintenanceWorkflow>,
    ) -> Self {
        Self {
            store,
            directory,
            shifts,
            maintenance,
        }
    }

    /// Handle one badge scan reported by a device.
    ///
    /// Unknown and deactivated badges are rejected identically and logged
    /// as failed access attempts. Operators go to the shift ledger,
    /// mechanics to the maintenance workflow; any other role gets an
    /// acknowledgment and no state change.
    pub async fn scan(&self, device_id: &str, badge_uid: &str) -> AppResult<OperationOutcome> {
        let Some(employee) = self.directory.find_active_by_badge(badge_uid).await? else {
            warn!(device_id, badge_uid, "badge scan rejected");
            return Err(AppError::unknown_badge(
                "badge is not recognized or has been deactivated",
            ));
        };

        match employee.role {
            EmployeeRole::Operator => self.shifts.operator_scan(device_id, &employee).await,
            EmployeeRole::Mechanic => self.maintenance.mechanic_scan(device_id, &employee).await,
            EmployeeRole::Other => {
                let machine = common::machine_for_device(self.store.as_ref(), device_id).await?;
                info!(
                    machine_id = %machine.id,
                    employee_id = %employee.id,
                    role = %employee.role,
                    "badge acknowledged without action"
                );
                Ok(OperationOutcome::new(
                    ScanAction::Acknowledged,
                    format!("hello {}, nothing to do here", employee.full_name),
                    common::snapshot(self.directory.as_ref(), &machine).await,
                ))
            }
        }
    }
}
