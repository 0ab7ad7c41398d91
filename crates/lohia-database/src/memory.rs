//! In-memory store for single-node tests and demos.
//!
//! Behaviorally equivalent to the PostgreSQL store: every composite write
//! happens under a single write lock, so readers never observe a partial
//! commit.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use lohia_core::AppResult;
use lohia_core::types::{PageRequest, PageResponse};
use lohia_entity::employee::Employee;
use lohia_entity::machine::Machine;
use lohia_entity::maintenance::MaintenanceCall;
use lohia_entity::pulse::PulseLog;
use lohia_entity::shift::{Shift, ShiftStatus};
use lohia_entity::store::{EmployeeDirectory, MonitorStore};

#[derive(Debug, Default)]
struct State {
    machines: HashMap<Uuid, Machine>,
    shifts: HashMap<Uuid, Shift>,
    calls: HashMap<Uuid, MaintenanceCall>,
    pulse_logs: Vec<PulseLog>,
}

/// In-memory monitor store.
#[derive(Debug, Default)]
pub struct MemoryMonitorStore {
    state: RwLock<State>,
}

impl MemoryMonitorStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pulse log rows, across all machines.
    pub async fn pulse_log_count(&self) -> usize {
        self.state.read().await.pulse_logs.len()
    }

    /// All shifts recorded for a machine (test inspection helper).
    pub async fn shifts_for(&self, machine_id: Uuid) -> Vec<Shift> {
        let state = self.state.read().await;
        let mut shifts: Vec<Shift> = state
            .shifts
            .values()
            .filter(|s| s.machine_id == machine_id)
            .cloned()
            .collect();
        shifts.sort_by_key(|s| s.start_time);
        shifts
    }
}

#[async_trait]
impl MonitorStore for MemoryMonitorStore {
    async fn insert_machine(&self, machine: &Machine) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.machines.insert(machine.id, machine.clone());
        Ok(())
    }

    async fn update_machine(&self, machine: &Machine) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.machines.insert(machine.id, machine.clone());
        Ok(())
    }

    async fn machine_by_device(&self, device_id: &str) -> AppResult<Option<Machine>> {
        let state = self.state.read().await;
        Ok(state
            .machines
            .values()
            .find(|m| m.device_id == device_id && m.is_active)
            .cloned())
    }

    async fn machine_by_id(&self, id: Uuid) -> AppResult<Option<Machine>> {
        let state = self.state.read().await;
        Ok(state.machines.get(&id).cloned())
    }

    async fn active_shift(&self, machine_id: Uuid) -> AppResult<Option<Shift>> {
        let state = self.state.read().await;
        Ok(state
            .shifts
            .values()
            .find(|s| s.machine_id == machine_id && s.status == ShiftStatus::Active)
            .cloned())
    }

    async fn open_shift(&self, machine: &Machine, shift: &Shift) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.machines.insert(machine.id, machine.clone());
        state.shifts.insert(shift.id, shift.clone());
        Ok(())
    }

    async fn close_shift(&self, machine: &Machine, shift: &Shift) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.machines.insert(machine.id, machine.clone());
        state.shifts.insert(shift.id, shift.clone());
        Ok(())
    }

    async fn shift_history(
        &self,
        machine_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Shift>> {
        let state = self.state.read().await;
        let mut shifts: Vec<Shift> = state
            .shifts
            .values()
            .filter(|s| s.machine_id == machine_id)
            .cloned()
            .collect();
        shifts.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(paginate(shifts, page))
    }

    async fn record_pulse(
        &self,
        machine: &Machine,
        shift: &Shift,
        log: &PulseLog,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.machines.insert(machine.id, machine.clone());
        state.pulse_logs.push(log.clone());
        state.shifts.insert(shift.id, shift.clone());
        Ok(())
    }

    async fn recent_pulses(&self, machine_id: Uuid, limit: i64) -> AppResult<Vec<PulseLog>> {
        let state = self.state.read().await;
        let mut logs: Vec<PulseLog> = state
            .pulse_logs
            .iter()
            .filter(|l| l.machine_id == machine_id)
            .cloned()
            .collect();
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        logs.truncate(limit.max(0) as usize);
        Ok(logs)
    }

    async fn insert_call(&self, call: &MaintenanceCall) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.calls.insert(call.id, call.clone());
        Ok(())
    }

    async fn update_call(&self, machine: &Machine, call: &MaintenanceCall) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.machines.insert(machine.id, machine.clone());
        state.calls.insert(call.id, call.clone());
        Ok(())
    }

    async fn open_call(&self, machine_id: Uuid) -> AppResult<Option<MaintenanceCall>> {
        let state = self.state.read().await;
        Ok(state
            .calls
            .values()
            .find(|c| c.machine_id == machine_id && c.status.is_open())
            .cloned())
    }

    async fn call_history(
        &self,
        machine_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<MaintenanceCall>> {
        let state = self.state.read().await;
        let mut calls: Vec<MaintenanceCall> = state
            .calls
            .values()
            .filter(|c| c.machine_id == machine_id)
            .cloned()
            .collect();
        calls.sort_by(|a, b| b.call_time.cmp(&a.call_time));
        Ok(paginate(calls, page))
    }
}

fn paginate<T: serde::Serialize + Clone>(items: Vec<T>, page: &PageRequest) -> PageResponse<T> {
    let total = items.len() as u64;
    let paged: Vec<T> = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    PageResponse::new(paged, page.page, page.page_size, total)
}

/// In-memory employee directory.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    employees: RwLock<HashMap<Uuid, Employee>>,
}

impl MemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an employee record.
    pub async fn insert(&self, employee: Employee) {
        self.employees
            .write()
            .await
            .insert(employee.id, employee);
    }
}

#[async_trait]
impl EmployeeDirectory for MemoryDirectory {
    async fn find_active_by_badge(&self, badge_uid: &str) -> AppResult<Option<Employee>> {
        let employees = self.employees.read().await;
        Ok(employees
            .values()
            .find(|e| e.is_active && e.badge_uid.eq_ignore_ascii_case(badge_uid))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Employee>> {
        let employees = self.employees.read().await;
        Ok(employees.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lohia_entity::employee::EmployeeRole;
    use lohia_entity::machine::Gearing;
    use rust_decimal::Decimal;

    fn gearing() -> Gearing {
        Gearing {
            pulses_per_revolution: 40,
            gearbox_ratio: Decimal::new(6400, 2),
            sprocket_drive_teeth: 23,
            sprocket_roller_teeth: 41,
            roller_diameter_cm: Decimal::new(1670, 2),
        }
    }

    #[tokio::test]
    async fn test_machine_device_lookup_respects_is_active() {
        let store = MemoryMonitorStore::new();
        let mut machine = Machine::register("Lohia 1", "esp32-001", &gearing()).unwrap();
        store.insert_machine(&machine).await.unwrap();

        assert!(store.machine_by_device("esp32-001").await.unwrap().is_some());

        machine.is_active = false;
        store.update_machine(&machine).await.unwrap();
        assert!(store.machine_by_device("esp32-001").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_directory_badge_lookup_is_case_insensitive() {
        let directory = MemoryDirectory::new();
        let mut employee = Employee::new("Anna K.", "AB12CD34", EmployeeRole::Operator);
        directory.insert(employee.clone()).await;

        assert!(
            directory
                .find_active_by_badge("ab12cd34")
                .await
                .unwrap()
                .is_some()
        );

        employee.is_active = false;
        directory.insert(employee).await;
        assert!(
            directory
                .find_active_by_badge("AB12CD34")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_recent_pulses_ordering_and_limit() {
        let store = MemoryMonitorStore::new();
        let machine_id = Uuid::new_v4();
        let shift_id = Uuid::new_v4();
        for i in 1..=5 {
            let log = PulseLog::record(machine_id, shift_id, i, i, Decimal::ZERO);
            let machine = Machine::register("M", format!("d{i}"), &gearing()).unwrap();
            let shift = Shift::open(machine_id, Uuid::new_v4());
            store.record_pulse(&machine, &shift, &log).await.unwrap();
        }
        let recent = store.recent_pulses(machine_id, 3).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert!(recent[0].timestamp >= recent[1].timestamp);
    }
}
