//! Serializable results of monitor operations.
//!
//! These are the shapes handed back to whatever surface drives the monitor
//! (device firmware, dashboards); all rounding for display happens here.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lohia_entity::{CallStatus, MachineSnapshot, MaintenanceCall, Shift, ShiftStatus};

/// Display precision for meter figures.
const METERS_DISPLAY_SCALE: u32 = 2;

/// What a badge scan (or direct shift/maintenance call) ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanAction {
    /// A new shift was opened for the scanning operator.
    ShiftStarted,
    /// The scanning operator's own shift was closed.
    ShiftEnded,
    /// The occupant's shift was closed and a new one opened for the scanner.
    ShiftHandedOver,
    /// A fault was reported and a pending maintenance call opened.
    MaintenanceRequested,
    /// A pending maintenance call was accepted by the scanning mechanic.
    MaintenanceStarted,
    /// An in-progress repair was signed off by the scanning mechanic.
    MaintenanceCompleted,
    /// The scan was valid but there was nothing for this person to do.
    NothingToDo,
    /// The badge belongs to a role the machine has no workflow for.
    Acknowledged,
}

/// Result of a state-changing operation, centered on the machine's
/// post-operation snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationOutcome {
    /// What happened.
    pub action: ScanAction,
    /// Short human-readable description, suitable for the device display.
    pub message: String,
    /// The machine after the operation.
    pub machine: MachineSnapshot,
    /// The shift the operation touched, if any.
    pub shift: Option<ShiftSummary>,
    /// The maintenance call the operation touched, if any.
    pub call: Option<CallSummary>,
}

impl OperationOutcome {
    /// Build an outcome with no shift or call attached.
    pub fn new(action: ScanAction, message: impl Into<String>, machine: MachineSnapshot) -> Self {
        Self {
            action,
            message: message.into(),
            machine,
            shift: None,
            call: None,
        }
    }

    /// Attach the touched shift.
    pub fn with_shift(mut self, shift: ShiftSummary) -> Self {
        self.shift = Some(shift);
        self
    }

    /// Attach the touched maintenance call.
    pub fn with_call(mut self, call: CallSummary) -> Self {
        self.call = Some(call);
        self
    }
}

/// Minimal acknowledgment of a recorded pulse burst.
///
/// The ingest path answers devices dozens of times a minute; it returns
/// running totals only, never the full machine snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PulseOutcome {
    /// The machine the burst accrued to.
    pub machine_id: Uuid,
    /// The shift the burst accrued to.
    pub shift_id: Uuid,
    /// Running pulse total after the burst.
    pub total_pulses: i64,
    /// Distance produced this shift after the burst, meters (2 dp).
    pub total_meters: Decimal,
}

/// Read-only view of a shift for outcomes and history listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftSummary {
    /// Shift identifier.
    pub id: Uuid,
    /// The machine worked on.
    pub machine_id: Uuid,
    /// The operator holding the shift.
    pub operator_id: Uuid,
    /// Operator display name, when resolved.
    pub operator_name: Option<String>,
    /// When the shift opened.
    pub start_time: DateTime<Utc>,
    /// When the shift closed (null while open).
    pub end_time: Option<DateTime<Utc>>,
    /// Total pulses over the shift.
    pub total_pulses: i64,
    /// Total meters over the shift (2 dp).
    pub total_meters: Decimal,
    /// Lifecycle status.
    pub status: ShiftStatus,
    /// `H:MM` duration display.
    pub duration: String,
}

impl ShiftSummary {
    /// Build a summary of the given shift.
    pub fn of(shift: &Shift) -> Self {
        Self {
            id: shift.id,
            machine_id: shift.machine_id,
            operator_id: shift.operator_id,
            operator_name: None,
            start_time: shift.start_time,
            end_time: shift.end_time,
            total_pulses: shift.total_pulses,
            total_meters: shift.total_meters.round_dp(METERS_DISPLAY_SCALE),
            status: shift.status,
            duration: shift.duration_display(),
        }
    }

    /// Attach the resolved operator display name.
    pub fn with_operator_name(mut self, name: Option<String>) -> Self {
        self.operator_name = name;
        self
    }
}

/// Read-only view of a maintenance call for outcomes and history listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSummary {
    /// Call identifier.
    pub id: Uuid,
    /// The machine that faulted.
    pub machine_id: Uuid,
    /// The reporting operator.
    pub operator_id: Uuid,
    /// The assigned mechanic, once accepted.
    pub mechanic_id: Option<Uuid>,
    /// Lifecycle status.
    pub status: CallStatus,
    /// When the fault was reported.
    pub call_time: DateTime<Utc>,
    /// `M:SS` response time display.
    pub response_time: String,
    /// `M:SS` repair duration display.
    pub repair_duration: String,
    /// Problem/resolution description.
    pub description: String,
}

impl CallSummary {
    /// Build a summary of the given call.
    pub fn of(call: &MaintenanceCall) -> Self {
        Self {
            id: call.id,
            machine_id: call.machine_id,
            operator_id: call.operator_id,
            mechanic_id: call.mechanic_id,
            status: call.status,
            call_time: call.call_time,
            response_time: call.response_time_display(),
            repair_duration: call.repair_duration_display(),
            description: call.description.clone(),
        }
    }
}

/// One machine's full live picture for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStatus {
    /// The machine's live state.
    pub machine: MachineSnapshot,
    /// The currently active shift, if any.
    pub active_shift: Option<ShiftSummary>,
    /// The open maintenance call, if any.
    pub open_call: Option<CallSummary>,
}
