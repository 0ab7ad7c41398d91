//! Shared fixtures for service integration tests.

use std::sync::Arc;

use rust_decimal::Decimal;

use lohia_core::traits::NullNotifier;
use lohia_database::{MemoryDirectory, MemoryMonitorStore};
use lohia_entity::{Employee, EmployeeRole, Gearing, MachineSnapshot, MonitorStore};
use lohia_service::{
    BadgeRouter, MachineLocks, MachineService, MaintenanceWorkflow, PulseIngest, ShiftLedger,
};

/// The whole service stack wired against in-memory collaborators.
pub struct TestApp {
    pub store: Arc<MemoryMonitorStore>,
    pub directory: Arc<MemoryDirectory>,
    pub machines: MachineService,
    pub shifts: Arc<ShiftLedger>,
    pub pulses: PulseIngest,
    pub maintenance: Arc<MaintenanceWorkflow>,
    pub router: BadgeRouter,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryMonitorStore::new());
        let directory = Arc::new(MemoryDirectory::new());
        Self::with_store(store, directory)
    }

    pub fn with_store(store: Arc<MemoryMonitorStore>, directory: Arc<MemoryDirectory>) -> Self {
        let store_dyn: Arc<dyn MonitorStore> = store.clone();
        let locks = Arc::new(MachineLocks::new());
        let notifier = Arc::new(NullNotifier);

        let machines = MachineService::new(
            store_dyn.clone(),
            directory.clone(),
            locks.clone(),
            notifier.clone(),
        );
        let shifts = Arc::new(ShiftLedger::new(
            store_dyn.clone(),
            directory.clone(),
            locks.clone(),
            notifier.clone(),
        ));
        let pulses = PulseIngest::new(store_dyn.clone(), locks.clone(), notifier.clone());
        let maintenance = Arc::new(MaintenanceWorkflow::new(
            store_dyn.clone(),
            directory.clone(),
            locks.clone(),
            notifier,
        ));
        let router = BadgeRouter::new(
            store_dyn,
            directory.clone(),
            shifts.clone(),
            maintenance.clone(),
        );

        Self {
            store,
            directory,
            machines,
            shifts,
            pulses,
            maintenance,
            router,
        }
    }

    /// Register a machine with the standard test gearing.
    pub async fn seed_machine(&self, device_id: &str) -> MachineSnapshot {
        self.machines
            .register("Lohia 1", device_id, &gearing())
            .await
            .expect("register machine")
    }

    /// Add an active employee to the directory.
    pub async fn seed_employee(&self, name: &str, badge: &str, role: EmployeeRole) -> Employee {
        let employee = Employee::new(name, badge, role);
        self.directory.insert(employee.clone()).await;
        employee
    }
}

/// Gear parameters matching a standard Lohia loom take-up.
pub fn gearing() -> Gearing {
    Gearing {
        pulses_per_revolution: 40,
        gearbox_ratio: Decimal::new(6400, 2),
        sprocket_drive_teeth: 23,
        sprocket_roller_teeth: 41,
        roller_diameter_cm: Decimal::new(1670, 2),
    }
}
