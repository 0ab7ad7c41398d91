//! Maintenance call lifecycle: report, accept, complete.

use std::sync::Arc;

use tracing::info;

use lohia_core::events::{DomainEvent, MachineEvent};
use lohia_core::traits::ChangeNotifier;
use lohia_core::{AppError, AppResult};
use lohia_entity::{CallStatus, Employee, EmployeeDirectory, Machine, MaintenanceCall, MonitorStore};

use crate::common;
use crate::locks::MachineLocks;
use crate::outcome::{CallSummary, OperationOutcome, ScanAction};

/// Drives maintenance calls through `pending`, `in_progress`, `completed`.
///
/// A machine carries at most one open call. Accepting and completing run
/// under the machine's lock and persist together with the machine status
/// change they cause; reporting only opens the pending call.
pub struct MaintenanceWorkflow {
    store: Arc<dyn MonitorStore>,
    directory: Arc<dyn EmployeeDirectory>,
    locks: Arc<MachineLocks>,
    notifier: Arc<dyn ChangeNotifier>,
}

impl MaintenanceWorkflow {
    /// Create a new maintenance workflow.
    pub fn new(
        store: Arc<dyn MonitorStore>,
        directory: Arc<dyn EmployeeDirectory>,
        locks: Arc<MachineLocks>,
        notifier: Arc<dyn ChangeNotifier>,
    ) -> Self {
        Self {
            store,
            directory,
            locks,
            notifier,
        }
    }

    /// Report a fault, opening a pending call for the machine's operator.
    ///
    /// The call is attributed to whoever currently occupies the machine;
    /// the machine keeps running until a mechanic accepts the call.
    pub async fn report(&self, device_id: &str) -> AppResult<OperationOutcome> {
        let found = common::machine_for_device(self.store.as_ref(), device_id).await?;
        let _guard = self.locks.acquire(found.id).await;
        let machine = common::machine_for_id(self.store.as_ref(), found.id).await?;

        let operator_id = machine.current_operator_id.ok_or_else(|| {
            AppError::conflict("machine has no active operator to report for")
        })?;
        if self.store.open_call(machine.id).await?.is_some() {
            return Err(AppError::conflict(
                "a maintenance call is already open for this machine",
            ));
        }

        let call = MaintenanceCall::report(machine.id, operator_id);
        self.store.insert_call(&call).await?;

        info!(
            machine_id = %machine.id,
            call_id = %call.id,
            operator_id = %operator_id,
            "maintenance call reported"
        );
        self.notifier
            .machine_changed(DomainEvent::new(
                Some(operator_id),
                MachineEvent::MaintenanceRequested {
                    machine_id: machine.id,
                    call_id: call.id,
                    operator_id,
                },
            ))
            .await;

        Ok(OperationOutcome::new(
            ScanAction::MaintenanceRequested,
            "maintenance requested",
            common::snapshot(self.directory.as_ref(), &machine).await,
        )
        .with_call(CallSummary::of(&call)))
    }

    /// Accept the machine's pending call as the given mechanic.
    pub async fn accept(
        &self,
        device_id: &str,
        mechanic: &Employee,
    ) -> AppResult<OperationOutcome> {
        require_mechanic(mechanic)?;
        let found = common::machine_for_device(self.store.as_ref(), device_id).await?;
        let _guard = self.locks.acquire(found.id).await;
        let mut machine = common::machine_for_id(self.store.as_ref(), found.id).await?;

        let mut call = self.store.open_call(machine.id).await?.ok_or_else(|| {
            AppError::not_found("no open maintenance call for this machine")
        })?;
        self.accept_call(&mut machine, &mut call, mechanic).await?;

        Ok(OperationOutcome::new(
            ScanAction::MaintenanceStarted,
            format!("repair started by {}", mechanic.full_name),
            common::snapshot(self.directory.as_ref(), &machine).await,
        )
        .with_call(CallSummary::of(&call)))
    }

    /// Sign off the machine's in-progress repair as the given mechanic.
    pub async fn complete(
        &self,
        device_id: &str,
        mechanic: &Employee,
        description: &str,
    ) -> AppResult<OperationOutcome> {
        require_mechanic(mechanic)?;
        let found = common::machine_for_device(self.store.as_ref(), device_id).await?;
        let _guard = self.locks.acquire(found.id).await;
        let mut machine = common::machine_for_id(self.store.as_ref(), found.id).await?;

        let mut call = self.store.open_call(machine.id).await?.ok_or_else(|| {
            AppError::not_found("no open maintenance call for this machine")
        })?;
        self.complete_call(&mut machine, &mut call, mechanic, description)
            .await?;

        Ok(OperationOutcome::new(
            ScanAction::MaintenanceCompleted,
            format!("repair completed by {}", mechanic.full_name),
            common::snapshot(self.directory.as_ref(), &machine).await,
        )
        .with_call(CallSummary::of(&call)))
    }

    /// Handle a mechanic's badge scan at a machine.
    ///
    /// A pending call is accepted; the mechanic's own in-progress repair is
    /// signed off; anything else is a no-op acknowledgment (no open call,
    /// or another mechanic already on the job).
    pub async fn mechanic_scan(
        &self,
        device_id: &str,
        mechanic: &Employee,
    ) -> AppResult<OperationOutcome> {
        require_mechanic(mechanic)?;
        let found = common::machine_for_device(self.store.as_ref(), device_id).await?;
        let _guard = self.locks.acquire(found.id).await;
        let mut machine = common::machine_for_id(self.store.as_ref(), found.id).await?;

        let Some(mut call) = self.store.open_call(machine.id).await? else {
            return Ok(OperationOutcome::new(
                ScanAction::NothingToDo,
                "no open maintenance call",
                common::snapshot(self.directory.as_ref(), &machine).await,
            ));
        };

        match call.status {
            CallStatus::Pending => {
                self.accept_call(&mut machine, &mut call, mechanic).await?;
                Ok(OperationOutcome::new(
                    ScanAction::MaintenanceStarted,
                    format!("repair started by {}", mechanic.full_name),
                    common::snapshot(self.directory.as_ref(), &machine).await,
                )
                .with_call(CallSummary::of(&call)))
            }
            CallStatus::InProgress if call.mechanic_id == Some(mechanic.id) => {
                self.complete_call(&mut machine, &mut call, mechanic, "")
                    .await?;
                Ok(OperationOutcome::new(
                    ScanAction::MaintenanceCompleted,
                    format!("repair completed by {}", mechanic.full_name),
                    common::snapshot(self.directory.as_ref(), &machine).await,
                )
                .with_call(CallSummary::of(&call)))
            }
            _ => Ok(OperationOutcome::new(
                ScanAction::NothingToDo,
                "repair already in progress by another mechanic",
                common::snapshot(self.directory.as_ref(), &machine).await,
            )
            .with_call(CallSummary::of(&call))),
        }
    }

    async fn accept_call(
        &self,
        machine: &mut Machine,
        call: &mut MaintenanceCall,
        mechanic: &Employee,
    ) -> AppResult<()> {
        call.accept(mechanic.id)?;
        machine.start_maintenance();
        self.store.update_call(machine, call).await?;

        info!(
            machine_id = %machine.id,
            call_id = %call.id,
            mechanic_id = %mechanic.id,
            "maintenance call accepted"
        );
        self.notifier
            .machine_changed(DomainEvent::new(
                Some(mechanic.id),
                MachineEvent::MaintenanceStarted {
                    machine_id: machine.id,
                    call_id: call.id,
                    mechanic_id: mechanic.id,
                },
            ))
            .await;
        Ok(())
    }

    async fn complete_call(
        &self,
        machine: &mut Machine,
        call: &mut MaintenanceCall,
        mechanic: &Employee,
        description: &str,
    ) -> AppResult<()> {
        call.complete(mechanic.id, description)?;
        machine.end_maintenance();
        self.store.update_call(machine, call).await?;

        info!(
            machine_id = %machine.id,
            call_id = %call.id,
            mechanic_id = %mechanic.id,
            "maintenance call completed"
        );
        self.notifier
            .machine_changed(DomainEvent::new(
                Some(mechanic.id),
                MachineEvent::MaintenanceCompleted {
                    machine_id: machine.id,
                    call_id: call.id,
                    mechanic_id: mechanic.id,
                },
            ))
            .await;
        Ok(())
    }
}

fn require_mechanic(employee: &Employee) -> AppResult<()> {
    if !employee.role.is_mechanic() {
        return Err(AppError::validation(format!(
            "{} is not a mechanic",
            employee.full_name
        )));
    }
    Ok(())
}
