//! Shift ledger: opening, closing, and handing over operator shifts.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use lohia_core::events::{DomainEvent, MachineEvent};
use lohia_core::traits::ChangeNotifier;
use lohia_core::{AppError, AppResult};
use lohia_entity::{Employee, EmployeeDirectory, Machine, MonitorStore, Shift};

use crate::common;
use crate::locks::MachineLocks;
use crate::outcome::{OperationOutcome, ScanAction, ShiftSummary};

/// The single writer of shift records.
///
/// Every path that opens or closes a shift goes through this type, under
/// the machine's lock, so the "at most one active shift per machine"
/// invariant holds no matter how scans interleave. Totals are captured
/// from the machine's counters strictly before the accumulator reset.
pub struct ShiftLedger {
    store: Arc<dyn MonitorStore>,
    directory: Arc<dyn EmployeeDirectory>,
    locks: Arc<MachineLocks>,
    notifier: Arc<dyn ChangeNotifier>,
}

impl ShiftLedger {
    /// Create a new shift ledger.
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

    /// Handle an operator's badge scan at a machine.
    ///
    /// Branches on occupancy: an empty machine opens a shift for the
    /// scanner, the occupant's own scan closes their shift, and a scan by
    /// anyone else performs a hand-over (close the occupant's shift, open
    /// one for the scanner, in that order).
    pub async fn operator_scan(
        &self,
        device_id: &str,
        operator: &Employee,
    ) -> AppResult<OperationOutcome> {
        require_operator(operator)?;
        let found = common::machine_for_device(self.store.as_ref(), device_id).await?;
        let _guard = self.locks.acquire(found.id).await;
        let mut machine = common::machine_for_id(self.store.as_ref(), found.id).await?;

        match machine.current_operator_id {
            None => self.open_for(&mut machine, operator).await,
            Some(current) if current == operator.id => {
                let closed = self.close_active(&mut machine, operator.id).await?;
                let summary = self.named_summary(&closed).await;
                Ok(OperationOutcome::new(
                    ScanAction::ShiftEnded,
                    format!("shift closed for {}", operator.full_name),
                    common::snapshot(self.directory.as_ref(), &machine).await,
                )
                .with_shift(summary))
            }
            Some(outgoing) => self.hand_over(&mut machine, outgoing, operator).await,
        }
    }

    /// Explicitly start a shift for an operator (dashboard/API path).
    ///
    /// Rejects with a conflict when a different operator occupies the
    /// machine; a repeat start by the occupant closes the running shift
    /// and opens a fresh one.
    pub async fn start(&self, device_id: &str, operator: &Employee) -> AppResult<OperationOutcome> {
        require_operator(operator)?;
        let found = common::machine_for_device(self.store.as_ref(), device_id).await?;
        let _guard = self.locks.acquire(found.id).await;
        let mut machine = common::machine_for_id(self.store.as_ref(), found.id).await?;

        match machine.current_operator_id {
            Some(current) if current != operator.id => Err(AppError::conflict(
                "machine is already occupied by another operator",
            )),
            Some(_) => {
                self.close_active(&mut machine, operator.id).await?;
                self.open_for(&mut machine, operator).await
            }
            None => self.open_for(&mut machine, operator).await,
        }
    }

    /// Explicitly end the operator's shift (dashboard/API path).
    pub async fn end(&self, device_id: &str, operator: &Employee) -> AppResult<OperationOutcome> {
        require_operator(operator)?;
        let found = common::machine_for_device(self.store.as_ref(), device_id).await?;
        let _guard = self.locks.acquire(found.id).await;
        let mut machine = common::machine_for_id(self.store.as_ref(), found.id).await?;

        if machine.current_operator_id != Some(operator.id) {
            return Err(AppError::conflict(
                "no active shift held by this operator on this machine",
            ));
        }
        let closed = self.close_active(&mut machine, operator.id).await?;
        let summary = self.named_summary(&closed).await;
        Ok(OperationOutcome::new(
            ScanAction::ShiftEnded,
            format!("shift closed for {}", operator.full_name),
            common::snapshot(self.directory.as_ref(), &machine).await,
        )
        .with_shift(summary))
    }

    /// Open a shift for the operator on an unoccupied machine and persist
    /// both records atomically.
    async fn open_for(
        &self,
        machine: &mut Machine,
        operator: &Employee,
    ) -> AppResult<OperationOutcome> {
        machine.start_shift(operator.id)?;
        let shift = Shift::open(machine.id, operator.id);
        self.store.open_shift(machine, &shift).await?;

        info!(
            machine_id = %machine.id,
            shift_id = %shift.id,
            operator_id = %operator.id,
            "shift started"
        );
        self.notifier
            .machine_changed(DomainEvent::new(
                Some(operator.id),
                MachineEvent::ShiftStarted {
                    machine_id: machine.id,
                    shift_id: shift.id,
                    operator_id: operator.id,
                },
            ))
            .await;

        let summary = ShiftSummary::of(&shift).with_operator_name(Some(operator.full_name.clone()));
        Ok(OperationOutcome::new(
            ScanAction::ShiftStarted,
            format!("shift started for {}", operator.full_name),
            common::snapshot(self.directory.as_ref(), machine).await,
        )
        .with_shift(summary))
    }

    /// Close the machine's active shift, freezing its totals from the
    /// machine's counters before the accumulator reset, and persist both
    /// records atomically.
    async fn close_active(&self, machine: &mut Machine, actor_id: Uuid) -> AppResult<Shift> {
        let mut shift = self
            .store
            .active_shift(machine.id)
            .await?
            .ok_or_else(|| {
                AppError::internal(format!(
                    "machine {} has an operator but no active shift",
                    machine.id
                ))
            })?;

        // totals must come off the machine before end_shift resets it
        let total_pulses = machine.current_pulse_count;
        let total_meters = machine.current_distance();
        shift.complete(total_pulses, total_meters)?;
        machine.end_shift();
        self.store.close_shift(machine, &shift).await?;

        info!(
            machine_id = %machine.id,
            shift_id = %shift.id,
            operator_id = %shift.operator_id,
            total_pulses,
            %total_meters,
            "shift closed"
        );
        self.notifier
            .machine_changed(DomainEvent::new(
                Some(actor_id),
                MachineEvent::ShiftClosed {
                    machine_id: machine.id,
                    shift_id: shift.id,
                    operator_id: shift.operator_id,
                    total_pulses,
                    total_meters,
                },
            ))
            .await;
        Ok(shift)
    }

    /// Close the occupant's shift and open one for the incoming operator.
    async fn hand_over(
        &self,
        machine: &mut Machine,
        outgoing_operator_id: Uuid,
        incoming: &Employee,
    ) -> AppResult<OperationOutcome> {
        let closed = self.close_active(machine, incoming.id).await?;

        machine.start_shift(incoming.id)?;
        let shift = Shift::open(machine.id, incoming.id);
        self.store.open_shift(machine, &shift).await?;

        info!(
            machine_id = %machine.id,
            closed_shift_id = %closed.id,
            outgoing_operator_id = %outgoing_operator_id,
            new_shift_id = %shift.id,
            incoming_operator_id = %incoming.id,
            "shift handed over"
        );
        self.notifier
            .machine_changed(DomainEvent::new(
                Some(incoming.id),
                MachineEvent::ShiftHandedOver {
                    machine_id: machine.id,
                    closed_shift_id: closed.id,
                    outgoing_operator_id,
                    new_shift_id: shift.id,
                    incoming_operator_id: incoming.id,
                },
            ))
            .await;

        let summary = ShiftSummary::of(&shift).with_operator_name(Some(incoming.full_name.clone()));
        Ok(OperationOutcome::new(
            ScanAction::ShiftHandedOver,
            format!("shift taken over by {}", incoming.full_name),
            common::snapshot(self.directory.as_ref(), machine).await,
        )
        .with_shift(summary))
    }

    /// Shift summary with the operator name resolved from the directory.
    async fn named_summary(&self, shift: &Shift) -> ShiftSummary {
        let name = common::operator_name(self.directory.as_ref(), Some(shift.operator_id)).await;
        ShiftSummary::of(shift).with_operator_name(name)
    }
}

fn require_operator(employee: &Employee) -> AppResult<()> {
    if !employee.role.is_operator() {
        return Err(AppError::validation(format!(
            "{} is not an operator",
            employee.full_name
        )));
    }
    Ok(())
}
