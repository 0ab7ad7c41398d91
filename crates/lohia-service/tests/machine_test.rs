//! Machine registration, provisioning, and query integration tests.

mod helpers;

use rust_decimal::Decimal;

use lohia_core::error::ErrorKind;
use lohia_core::types::PageRequest;
use lohia_entity::{EmployeeRole, MachineStatus, MonitorStore, ShiftStatus};

#[tokio::test]
async fn test_register_computes_conversion_constant() {
    let app = helpers::TestApp::new();
    let machine = app.seed_machine("esp32-001").await;

    assert_eq!(machine.meters_per_pulse, Decimal::new(115, 6));
    assert_eq!(machine.status, MachineStatus::Idle);
}

#[tokio::test]
async fn test_register_rejects_duplicate_device() {
    let app = helpers::TestApp::new();
    app.seed_machine("esp32-001").await;

    let err = app
        .machines
        .register("Lohia 2", "esp32-001", &helpers::gearing())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_provision_preserves_calibrated_value() {
    let app = helpers::TestApp::new();
    let machine = app.seed_machine("esp32-001").await;

    let mut changed = helpers::gearing();
    changed.roller_diameter_cm = Decimal::new(2000, 2);
    let snapshot = app.machines.provision("esp32-001", &changed).await.unwrap();

    // registration already derived a non-zero constant; it must survive
    assert_eq!(snapshot.meters_per_pulse, machine.meters_per_pulse);

    // zeroing the stored value re-arms the computation
    let mut stored = app
        .store
        .machine_by_id(machine.id)
        .await
        .unwrap()
        .expect("machine");
    stored.meters_per_pulse = Decimal::ZERO;
    app.store.update_machine(&stored).await.unwrap();

    let snapshot = app.machines.provision("esp32-001", &changed).await.unwrap();
    assert_ne!(snapshot.meters_per_pulse, Decimal::ZERO);
    assert_ne!(snapshot.meters_per_pulse, machine.meters_per_pulse);
}

#[tokio::test]
async fn test_provision_rejects_bad_parameters() {
    let app = helpers::TestApp::new();
    app.seed_machine("esp32-001").await;

    let mut bad = helpers::gearing();
    bad.pulses_per_revolution = 0;
    let err = app.machines.provision("esp32-001", &bad).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_status_reports_shift_and_call() {
    let app = helpers::TestApp::new();
    app.seed_machine("esp32-001").await;
    let anna = app
        .seed_employee("Anna Petrova", "BADGE-A", EmployeeRole::Operator)
        .await;

    let status = app.machines.status("esp32-001").await.unwrap();
    assert!(status.active_shift.is_none());
    assert!(status.open_call.is_none());

    app.shifts.operator_scan("esp32-001", &anna).await.unwrap();
    app.pulses.ingest("esp32-001", 12).await.unwrap();
    app.maintenance.report("esp32-001").await.unwrap();

    let status = app.machines.status("esp32-001").await.unwrap();
    assert_eq!(status.machine.status, MachineStatus::Working);
    assert_eq!(
        status.machine.current_operator_name.as_deref(),
        Some("Anna Petrova")
    );
    let shift = status.active_shift.expect("active shift");
    assert_eq!(shift.total_pulses, 12);
    assert!(status.open_call.is_some());
}

#[tokio::test]
async fn test_shift_history_pages_newest_first() {
    let app = helpers::TestApp::new();
    let machine = app.seed_machine("esp32-001").await;
    let anna = app
        .seed_employee("Anna Petrova", "BADGE-A", EmployeeRole::Operator)
        .await;

    for _ in 0..3 {
        app.shifts.operator_scan("esp32-001", &anna).await.unwrap();
        app.pulses.ingest("esp32-001", 10).await.unwrap();
        app.shifts.operator_scan("esp32-001", &anna).await.unwrap();
    }

    let page = app
        .machines
        .shift_history(machine.id, &PageRequest::new(1, 2))
        .await
        .unwrap();
    assert_eq!(page.total_items, 3);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_pages(), 2);
    assert!(page.items.iter().all(|s| s.status == ShiftStatus::Completed));
    assert_eq!(page.items[0].operator_name.as_deref(), Some("Anna Petrova"));
    assert!(page.items[0].start_time >= page.items[1].start_time);
}
