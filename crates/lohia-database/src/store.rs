//! PostgreSQL implementation of the monitor store.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use lohia_core::error::{AppError, ErrorKind};
use lohia_core::result::AppResult;
use lohia_core::types::{PageRequest, PageResponse};
use lohia_entity::machine::Machine;
use lohia_entity::maintenance::MaintenanceCall;
use lohia_entity::pulse::PulseLog;
use lohia_entity::shift::Shift;
use lohia_entity::store::MonitorStore;

use crate::repositories::{
    MachineRepository, MaintenanceCallRepository, PulseLogRepository, ShiftRepository,
};

/// Store implementation composing the repositories into the composite
/// atomic writes the service layer requires.
///
/// Every composite write runs in one transaction that first takes an
/// exclusive lock on the machine row, so multi-node deployments get the
/// same per-machine serialization the in-process lock registry provides
/// on a single node.
#[derive(Debug, Clone)]
pub struct PostgresMonitorStore {
    pool: PgPool,
    machines: MachineRepository,
    shifts: ShiftRepository,
    calls: MaintenanceCallRepository,
    pulse_logs: PulseLogRepository,
}

impl PostgresMonitorStore {
    /// Create a new store over the shared pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            machines: MachineRepository::new(pool.clone()),
            shifts: ShiftRepository::new(pool.clone()),
            calls: MaintenanceCallRepository::new(pool.clone()),
            pulse_logs: PulseLogRepository::new(pool.clone()),
            pool,
        }
    }

    async fn begin(&self) -> AppResult<Transaction<'_, Postgres>> {
        self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })
    }
}

async fn commit(tx: Transaction<'_, Postgres>) -> AppResult<()> {
    tx.commit().await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
    })
}

#[async_trait]
impl MonitorStore for PostgresMonitorStore {
    async fn insert_machine(&self, machine: &Machine) -> AppResult<()> {
        self.machines.insert(machine).await
    }

    async fn update_machine(&self, machine: &Machine) -> AppResult<()> {
        self.machines.update(machine).await
    }

    async fn machine_by_device(&self, device_id: &str) -> AppResult<Option<Machine>> {
        self.machines.find_by_device(device_id).await
    }

    async fn machine_by_id(&self, id: Uuid) -> AppResult<Option<Machine>> {
        self.machines.find_by_id(id).await
    }

    async fn active_shift(&self, machine_id: Uuid) -> AppResult<Option<Shift>> {
        self.shifts.find_active(machine_id).await
    }

    async fn open_shift(&self, machine: &Machine, shift: &Shift) -> AppResult<()> {
        let mut tx = self.begin().await?;
        self.machines.lock_row(&mut tx, machine.id).await?;
        self.machines.update_tx(&mut tx, machine).await?;
        self.shifts.insert_tx(&mut tx, shift).await?;
        commit(tx).await
    }

    async fn close_shift(&self, machine: &Machine, shift: &Shift) -> AppResult<()> {
        let mut tx = self.begin().await?;
        self.machines.lock_row(&mut tx, machine.id).await?;
        self.machines.update_tx(&mut tx, machine).await?;
        self.shifts.update_tx(&mut tx, shift).await?;
        commit(tx).await
    }

    async fn shift_history(
        &self,
        machine_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Shift>> {
        self.shifts.find_by_machine(machine_id, page).await
    }

    async fn record_pulse(
        &self,
        machine: &Machine,
        shift: &Shift,
        log: &PulseLog,
    ) -> AppResult<()> {
        let mut tx = self.begin().await?;
        self.machines.lock_row(&mut tx, machine.id).await?;
        self.machines.update_tx(&mut tx, machine).await?;
        self.pulse_logs.insert_tx(&mut tx, log).await?;
        self.shifts.update_tx(&mut tx, shift).await?;
        commit(tx).await
    }

    async fn recent_pulses(&self, machine_id: Uuid, limit: i64) -> AppResult<Vec<PulseLog>> {
        self.pulse_logs.find_recent(machine_id, limit).await
    }

    async fn insert_call(&self, call: &MaintenanceCall) -> AppResult<()> {
        self.calls.insert(call).await
    }

    async fn update_call(&self, machine: &Machine, call: &MaintenanceCall) -> AppResult<()> {
        let mut tx = self.begin().await?;
        self.machines.lock_row(&mut tx, machine.id).await?;
        self.machines.update_tx(&mut tx, machine).await?;
        self.calls.update_tx(&mut tx, call).await?;
        commit(tx).await
    }

    async fn open_call(&self, machine_id: Uuid) -> AppResult<Option<MaintenanceCall>> {
        self.calls.find_open(machine_id).await
    }

    async fn call_history(
        &self,
        machine_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<MaintenanceCall>> {
        self.calls.find_by_machine(machine_id, page).await
    }
}
