//! End-to-end event fan-out: service operations through the broadcast hub.

mod helpers;

use std::sync::Arc;

use lohia_core::config::RealtimeConfig;
use lohia_core::events::MachineEvent;
use lohia_database::{MemoryDirectory, MemoryMonitorStore};
use lohia_entity::{EmployeeRole, MonitorStore};
use lohia_realtime::MachineChannelHub;
use lohia_service::{MachineLocks, PulseIngest, ShiftLedger};

struct EventApp {
    app: helpers::TestApp,
    hub: Arc<MachineChannelHub>,
}

/// Service stack wired to a real broadcast hub instead of the null notifier.
fn event_app() -> EventApp {
    let store = Arc::new(MemoryMonitorStore::new());
    let directory = Arc::new(MemoryDirectory::new());
    let mut app = helpers::TestApp::with_store(store.clone(), directory.clone());

    let hub = Arc::new(MachineChannelHub::new(&RealtimeConfig::default()));
    let store_dyn: Arc<dyn MonitorStore> = store;
    let locks = Arc::new(MachineLocks::new());
    app.shifts = Arc::new(ShiftLedger::new(
        store_dyn.clone(),
        directory,
        locks.clone(),
        hub.clone(),
    ));
    app.pulses = PulseIngest::new(store_dyn, locks, hub.clone());

    EventApp { app, hub }
}

#[tokio::test]
async fn test_shift_and_pulse_events_reach_subscribers() {
    let EventApp { app, hub } = event_app();
    let machine = app.seed_machine("esp32-001").await;
    let anna = app
        .seed_employee("Anna Petrova", "BADGE-A", EmployeeRole::Operator)
        .await;
    let mut rx = hub.subscribe(machine.id);

    app.shifts.operator_scan("esp32-001", &anna).await.unwrap();
    app.pulses.ingest("esp32-001", 25).await.unwrap();
    app.shifts.operator_scan("esp32-001", &anna).await.unwrap();

    let started = rx.recv().await.expect("start event");
    assert!(matches!(
        started.payload,
        MachineEvent::ShiftStarted { operator_id, .. } if operator_id == anna.id
    ));
    assert_eq!(started.actor_id, Some(anna.id));

    let pulsed = rx.recv().await.expect("pulse event");
    assert!(matches!(
        pulsed.payload,
        MachineEvent::PulseRecorded { delta: 25, total_pulses: 25, .. }
    ));

    let closed = rx.recv().await.expect("close event");
    assert!(matches!(
        closed.payload,
        MachineEvent::ShiftClosed { total_pulses: 25, .. }
    ));
}

#[tokio::test]
async fn test_hand_over_emits_single_hand_over_event_after_close() {
    let EventApp { app, hub } = event_app();
    let machine = app.seed_machine("esp32-001").await;
    let anna = app
        .seed_employee("Anna Petrova", "BADGE-A", EmployeeRole::Operator)
        .await;
    let boris = app
        .seed_employee("Boris Ivanov", "BADGE-B", EmployeeRole::Operator)
        .await;
    let mut rx = hub.subscribe(machine.id);

    app.shifts.operator_scan("esp32-001", &anna).await.unwrap();
    app.shifts.operator_scan("esp32-001", &boris).await.unwrap();

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event.payload);
    }

    assert!(matches!(events[0], MachineEvent::ShiftStarted { .. }));
    assert!(matches!(events[1], MachineEvent::ShiftClosed { .. }));
    assert!(matches!(
        events[2],
        MachineEvent::ShiftHandedOver { outgoing_operator_id, incoming_operator_id, .. }
            if outgoing_operator_id == anna.id && incoming_operator_id == boris.id
    ));
    assert_eq!(events.len(), 3);
}
