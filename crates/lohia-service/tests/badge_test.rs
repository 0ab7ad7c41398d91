//! Badge router integration tests.

mod helpers;

use lohia_core::error::ErrorKind;
use lohia_entity::{Employee, EmployeeRole, MachineStatus};
use lohia_service::ScanAction;

#[tokio::test]
async fn test_unknown_badge_rejected() {
    let app = helpers::TestApp::new();
    app.seed_machine("esp32-001").await;

    let err = app.router.scan("esp32-001", "NO-SUCH-BADGE").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownBadge);
}

#[tokio::test]
async fn test_deactivated_badge_rejected_like_unknown() {
    let app = helpers::TestApp::new();
    app.seed_machine("esp32-001").await;
    let mut former = Employee::new("Former Employee", "BADGE-X", EmployeeRole::Operator);
    former.is_active = false;
    app.directory.insert(former).await;

    let err = app.router.scan("esp32-001", "BADGE-X").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownBadge);
}

#[tokio::test]
async fn test_badge_lookup_is_case_insensitive() {
    let app = helpers::TestApp::new();
    app.seed_machine("esp32-001").await;
    app.seed_employee("Anna Petrova", "BADGE-A", EmployeeRole::Operator)
        .await;

    let outcome = app.router.scan("esp32-001", "badge-a").await.unwrap();
    assert_eq!(outcome.action, ScanAction::ShiftStarted);
}

#[tokio::test]
async fn test_operator_badge_routes_to_shift_ledger() {
    let app = helpers::TestApp::new();
    app.seed_machine("esp32-001").await;
    let anna = app
        .seed_employee("Anna Petrova", "BADGE-A", EmployeeRole::Operator)
        .await;

    let outcome = app.router.scan("esp32-001", "BADGE-A").await.unwrap();
    assert_eq!(outcome.action, ScanAction::ShiftStarted);
    assert_eq!(outcome.machine.current_operator_id, Some(anna.id));

    let outcome = app.router.scan("esp32-001", "BADGE-A").await.unwrap();
    assert_eq!(outcome.action, ScanAction::ShiftEnded);
}

#[tokio::test]
async fn test_mechanic_badge_routes_to_maintenance() {
    let app = helpers::TestApp::new();
    app.seed_machine("esp32-001").await;
    app.seed_employee("Anna Petrova", "BADGE-A", EmployeeRole::Operator)
        .await;
    app.seed_employee("Dmitri Volkov", "BADGE-M", EmployeeRole::Mechanic)
        .await;

    app.router.scan("esp32-001", "BADGE-A").await.unwrap();
    app.maintenance.report("esp32-001").await.unwrap();

    let outcome = app.router.scan("esp32-001", "BADGE-M").await.unwrap();
    assert_eq!(outcome.action, ScanAction::MaintenanceStarted);
    assert_eq!(outcome.machine.status, MachineStatus::Maintenance);
}

#[tokio::test]
async fn test_other_role_is_acknowledged_without_state_change() {
    let app = helpers::TestApp::new();
    let machine = app.seed_machine("esp32-001").await;
    app.seed_employee("Olga Smirnova", "BADGE-O", EmployeeRole::Other)
        .await;

    let outcome = app.router.scan("esp32-001", "BADGE-O").await.unwrap();
    assert_eq!(outcome.action, ScanAction::Acknowledged);
    assert_eq!(outcome.machine.status, MachineStatus::Idle);
    assert!(app.store.shifts_for(machine.id).await.is_empty());
}
