//! Persistence trait seams implemented by `lohia-database`.
//!
//! The service layer speaks only to these traits; the physical store is an
//! external collaborator. Composite methods exist wherever the monitor
//! needs several rows written as a single atomic unit — an implementation
//! must commit all of a composite write or none of it.

use async_trait::async_trait;
use uuid::Uuid;

use lohia_core::AppResult;
use lohia_core::types::{PageRequest, PageResponse};

use crate::employee::Employee;
use crate::machine::Machine;
use crate::maintenance::MaintenanceCall;
use crate::pulse::PulseLog;
use crate::shift::Shift;

/// Persistent state of machines, shifts, maintenance calls, and pulses.
#[async_trait]
pub trait MonitorStore: Send + Sync + 'static {
    /// Insert a newly registered machine.
    async fn insert_machine(&self, machine: &Machine) -> AppResult<()>;

    /// Persist the machine's current state.
    async fn update_machine(&self, machine: &Machine) -> AppResult<()>;

    /// Look up an active machine by its device network id.
    async fn machine_by_device(&self, device_id: &str) -> AppResult<Option<Machine>>;

    /// Look up a machine by primary key.
    async fn machine_by_id(&self, id: Uuid) -> AppResult<Option<Machine>>;

    /// The machine's currently active shift, if any. At most one exists.
    async fn active_shift(&self, machine_id: Uuid) -> AppResult<Option<Shift>>;

    /// Persist a shift open together with the machine state it produced.
    async fn open_shift(&self, machine: &Machine, shift: &Shift) -> AppResult<()>;

    /// Persist a shift close together with the machine state it produced.
    ///
    /// The shift carries its frozen totals; the machine carries the reset
    /// accumulator. Both land atomically so readers never see one without
    /// the other.
    async fn close_shift(&self, machine: &Machine, shift: &Shift) -> AppResult<()>;

    /// Completed-and-active shift history for a machine, newest first.
    async fn shift_history(
        &self,
        machine_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Shift>>;

    /// Commit one pulse ingest: updated machine accumulator, appended log
    /// row, and synced shift totals, as a single atomic unit.
    async fn record_pulse(
        &self,
        machine: &Machine,
        shift: &Shift,
        log: &PulseLog,
    ) -> AppResult<()>;

    /// Most recent pulse log rows for a machine, newest first.
    async fn recent_pulses(&self, machine_id: Uuid, limit: i64) -> AppResult<Vec<PulseLog>>;

    /// Insert a newly reported maintenance call.
    async fn insert_call(&self, call: &MaintenanceCall) -> AppResult<()>;

    /// Persist a call transition together with the machine status change it
    /// drove, as a single atomic unit.
    async fn update_call(&self, machine: &Machine, call: &MaintenanceCall) -> AppResult<()>;

    /// The machine's open (non-completed) call, if any. At most one exists.
    async fn open_call(&self, machine_id: Uuid) -> AppResult<Option<MaintenanceCall>>;

    /// Maintenance call history for a machine, newest first.
    async fn call_history(
        &self,
        machine_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<MaintenanceCall>>;
}

/// Badge lookup against the (external) staff directory.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync + 'static {
    /// Resolve an active employee by badge UID (case-insensitive).
    ///
    /// Returns `None` for unknown badges *and* for badges of deactivated
    /// employees; callers treat both as a failed access attempt.
    async fn find_active_by_badge(&self, badge_uid: &str) -> AppResult<Option<Employee>>;

    /// Resolve an employee by primary key, active or not.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Employee>>;
}
