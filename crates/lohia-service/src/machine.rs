//! Machine registration, provisioning, and read-side queries.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use lohia_core::events::{DomainEvent, MachineEvent};
use lohia_core::traits::ChangeNotifier;
use lohia_core::types::{PageRequest, PageResponse};
use lohia_core::{AppError, AppResult};
use lohia_entity::{
    EmployeeDirectory, Gearing, Machine, MachineSnapshot, MonitorStore, PulseLog,
};

use crate::common;
use crate::locks::MachineLocks;
use crate::outcome::{CallSummary, DashboardStatus, ShiftSummary};

/// Machine lifecycle and read-side queries.
pub struct MachineService {
    store: Arc<dyn MonitorStore>,
    directory: Arc<dyn EmployeeDirectory>,
    locks: Arc<MachineLocks>,
    notifier: Arc<dyn ChangeNotifier>,
}

impl MachineService {
    /// Create a new machine service.
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

    /// Register a new machine under a device network id.
    pub async fn register(
        &self,
        name: &str,
        device_id: &str,
        gearing: &Gearing,
    ) -> AppResult<MachineSnapshot> {
        if self.store.machine_by_device(device_id).await?.is_some() {
            return Err(AppError::conflict(format!(
                "device '{device_id}' is already registered"
            )));
        }
        let machine = Machine::register(name, device_id, gearing)?;
        self.store.insert_machine(&machine).await?;

        info!(
            machine_id = %machine.id,
            device_id,
            meters_per_pulse = %machine.meters_per_pulse,
            "machine registered"
        );
        Ok(MachineSnapshot::of(&machine))
    }

    /// Apply gear parameters reported by a device on boot.
    ///
    /// The derived meters-per-pulse is recomputed only when still at its
    /// zero sentinel; a calibrated value survives reprovisioning.
    pub async fn provision(
        &self,
        device_id: &str,
        gearing: &Gearing,
    ) -> AppResult<MachineSnapshot> {
        let found = common::machine_for_device(self.store.as_ref(), device_id).await?;
        let _guard = self.locks.acquire(found.id).await;
        let mut machine = common::machine_for_id(self.store.as_ref(), found.id).await?;

        let recomputed = machine.apply_gearing(gearing)?;
        self.store.update_machine(&machine).await?;

        if recomputed {
            info!(
                machine_id = %machine.id,
                device_id,
                meters_per_pulse = %machine.meters_per_pulse,
                "meters-per-pulse computed from gear parameters"
            );
        } else {
            debug!(
                machine_id = %machine.id,
                device_id,
                meters_per_pulse = %machine.meters_per_pulse,
                "gear parameters stored, calibrated value preserved"
            );
        }
        self.notifier
            .machine_changed(DomainEvent::new(
                None,
                MachineEvent::Provisioned {
                    machine_id: machine.id,
                    meters_per_pulse: machine.meters_per_pulse,
                    recomputed,
                },
            ))
            .await;

        Ok(common::snapshot(self.directory.as_ref(), &machine).await)
    }

    /// Live picture of one machine: snapshot, active shift, open call.
    pub async fn status(&self, device_id: &str) -> AppResult<DashboardStatus> {
        let machine = common::machine_for_device(self.store.as_ref(), device_id).await?;

        let active_shift = match self.store.active_shift(machine.id).await? {
            Some(shift) => {
                let name =
                    common::operator_name(self.directory.as_ref(), Some(shift.operator_id)).await;
                Some(ShiftSummary::of(&shift).with_operator_name(name))
            }
            None => None,
        };
        let open_call = self
            .store
            .open_call(machine.id)
            .await?
            .map(|call| CallSummary::of(&call));

        Ok(DashboardStatus {
            machine: common::snapshot(self.directory.as_ref(), &machine).await,
            active_shift,
            open_call,
        })
    }

    /// Shift history for a machine, newest first, operator names resolved.
    pub async fn shift_history(
        &self,
        machine_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShiftSummary>> {
        let shifts = self.store.shift_history(machine_id, page).await?;
        let mut items = Vec::with_capacity(shifts.items.len());
        for shift in &shifts.items {
            let name =
                common::operator_name(self.directory.as_ref(), Some(shift.operator_id)).await;
            items.push(ShiftSummary::of(shift).with_operator_name(name));
        }
        Ok(PageResponse::new(
            items,
            shifts.page,
            shifts.page_size,
            shifts.total_items,
        ))
    }

    /// Maintenance call history for a machine, newest first.
    pub async fn call_history(
        &self,
        machine_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<CallSummary>> {
        let calls = self.store.call_history(machine_id, page).await?;
        Ok(PageResponse::new(
            calls.items.iter().map(CallSummary::of).collect(),
            calls.page,
            calls.page_size,
            calls.total_items,
        ))
    }

    /// Most recent pulse log rows for a machine, newest first.
    pub async fn recent_pulses(&self, machine_id: Uuid, limit: i64) -> AppResult<Vec<PulseLog>> {
        self.store.recent_pulses(machine_id, limit).await
    }
}
