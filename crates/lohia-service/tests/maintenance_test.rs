//! Maintenance workflow integration tests.

mod helpers;

use lohia_core::error::ErrorKind;
use lohia_entity::{CallStatus, EmployeeRole, MachineStatus, MonitorStore};
use lohia_service::ScanAction;

#[tokio::test]
async fn test_full_call_lifecycle() {
    let app = helpers::TestApp::new();
    let machine = app.seed_machine("esp32-001").await;
    let anna = app
        .seed_employee("Anna Petrova", "BADGE-A", EmployeeRole::Operator)
        .await;
    let dmitri = app
        .seed_employee("Dmitri Volkov", "BADGE-M", EmployeeRole::Mechanic)
        .await;
    app.shifts.operator_scan("esp32-001", &anna).await.unwrap();

    // operator reports a fault; the machine keeps running for now
    let reported = app.maintenance.report("esp32-001").await.unwrap();
    assert_eq!(reported.action, ScanAction::MaintenanceRequested);
    assert_eq!(reported.machine.status, MachineStatus::Working);
    let call = reported.call.expect("call summary");
    assert_eq!(call.status, CallStatus::Pending);
    assert_eq!(call.operator_id, anna.id);

    // mechanic's first scan accepts and stops the line
    let accepted = app
        .maintenance
        .mechanic_scan("esp32-001", &dmitri)
        .await
        .unwrap();
    assert_eq!(accepted.action, ScanAction::MaintenanceStarted);
    assert_eq!(accepted.machine.status, MachineStatus::Maintenance);
    let call = accepted.call.expect("call summary");
    assert_eq!(call.status, CallStatus::InProgress);
    assert_eq!(call.mechanic_id, Some(dmitri.id));

    // second scan by the same mechanic signs off
    let completed = app
        .maintenance
        .mechanic_scan("esp32-001", &dmitri)
        .await
        .unwrap();
    assert_eq!(completed.action, ScanAction::MaintenanceCompleted);
    assert_eq!(completed.call.expect("call summary").status, CallStatus::Completed);
    // operator still holds the machine, so it goes back to working
    assert_eq!(completed.machine.status, MachineStatus::Working);
    assert_eq!(completed.machine.current_operator_id, Some(anna.id));

    let history = app
        .machines
        .call_history(machine.id, &Default::default())
        .await
        .unwrap();
    assert_eq!(history.total_items, 1);
    assert_eq!(history.items[0].status, CallStatus::Completed);
}

#[tokio::test]
async fn test_report_does_not_stop_the_machine() {
    let app = helpers::TestApp::new();
    let machine = app.seed_machine("esp32-001").await;
    let anna = app
        .seed_employee("Anna Petrova", "BADGE-A", EmployeeRole::Operator)
        .await;
    app.shifts.operator_scan("esp32-001", &anna).await.unwrap();

    app.maintenance.report("esp32-001").await.unwrap();

    // status only changes once a mechanic accepts
    let stored = app
        .store
        .machine_by_id(machine.id)
        .await
        .unwrap()
        .expect("machine");
    assert_eq!(stored.status, MachineStatus::Working);
    assert_eq!(stored.current_operator_id, Some(anna.id));
}

#[tokio::test]
async fn test_report_requires_operator_at_machine() {
    let app = helpers::TestApp::new();
    app.seed_machine("esp32-001").await;

    let err = app.maintenance.report("esp32-001").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_report_conflicts_when_call_already_open() {
    let app = helpers::TestApp::new();
    app.seed_machine("esp32-001").await;
    let anna = app
        .seed_employee("Anna Petrova", "BADGE-A", EmployeeRole::Operator)
        .await;
    app.shifts.operator_scan("esp32-001", &anna).await.unwrap();

    app.maintenance.report("esp32-001").await.unwrap();
    let err = app.maintenance.report("esp32-001").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_only_accepting_mechanic_can_complete() {
    let app = helpers::TestApp::new();
    app.seed_machine("esp32-001").await;
    let anna = app
        .seed_employee("Anna Petrova", "BADGE-A", EmployeeRole::Operator)
        .await;
    let dmitri = app
        .seed_employee("Dmitri Volkov", "BADGE-M1", EmployeeRole::Mechanic)
        .await;
    let pavel = app
        .seed_employee("Pavel Orlov", "BADGE-M2", EmployeeRole::Mechanic)
        .await;
    app.shifts.operator_scan("esp32-001", &anna).await.unwrap();
    app.maintenance.report("esp32-001").await.unwrap();
    app.maintenance.accept("esp32-001", &dmitri).await.unwrap();

    // another mechanic's scan is a harmless no-op
    let outcome = app
        .maintenance
        .mechanic_scan("esp32-001", &pavel)
        .await
        .unwrap();
    assert_eq!(outcome.action, ScanAction::NothingToDo);
    assert_eq!(
        outcome.call.expect("call summary").mechanic_id,
        Some(dmitri.id)
    );

    // a direct completion attempt is a hard conflict
    let err = app
        .maintenance
        .complete("esp32-001", &pavel, "not mine")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    app.maintenance
        .complete("esp32-001", &dmitri, "replaced belt")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_mechanic_scan_with_no_open_call_is_noop() {
    let app = helpers::TestApp::new();
    app.seed_machine("esp32-001").await;
    let dmitri = app
        .seed_employee("Dmitri Volkov", "BADGE-M", EmployeeRole::Mechanic)
        .await;

    let outcome = app
        .maintenance
        .mechanic_scan("esp32-001", &dmitri)
        .await
        .unwrap();
    assert_eq!(outcome.action, ScanAction::NothingToDo);
    assert!(outcome.call.is_none());
}

#[tokio::test]
async fn test_complete_returns_machine_to_idle_without_operator() {
    let app = helpers::TestApp::new();
    app.seed_machine("esp32-001").await;
    let anna = app
        .seed_employee("Anna Petrova", "BADGE-A", EmployeeRole::Operator)
        .await;
    let dmitri = app
        .seed_employee("Dmitri Volkov", "BADGE-M", EmployeeRole::Mechanic)
        .await;
    app.shifts.operator_scan("esp32-001", &anna).await.unwrap();
    app.maintenance.report("esp32-001").await.unwrap();
    app.maintenance.accept("esp32-001", &dmitri).await.unwrap();

    // the operator badges out while the repair is running
    app.shifts.operator_scan("esp32-001", &anna).await.unwrap();

    let completed = app
        .maintenance
        .complete("esp32-001", &dmitri, "replaced belt")
        .await
        .unwrap();
    assert_eq!(completed.machine.status, MachineStatus::Idle);
    assert_eq!(completed.machine.current_operator_id, None);
}
