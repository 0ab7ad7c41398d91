//! Serializable machine snapshot for device responses and dashboards.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::Machine;
use super::status::MachineStatus;

/// Display precision for meter figures.
const METERS_DISPLAY_SCALE: u32 = 2;

/// Read-only view of a machine's live state.
///
/// This is what device-facing handlers serialize back to the ESP32 and what
/// dashboards render; distance is rounded here, at the presentation edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineSnapshot {
    /// Machine identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Device network identifier.
    pub device_id: String,
    /// Current status.
    pub status: MachineStatus,
    /// Operator currently holding the line.
    pub current_operator_id: Option<Uuid>,
    /// Operator display name, when resolved.
    pub current_operator_name: Option<String>,
    /// Raw pulse accumulator.
    pub current_pulse_count: i64,
    /// Distance produced this shift, meters (2 dp).
    pub current_meters: Decimal,
    /// Derived conversion constant.
    pub meters_per_pulse: Decimal,
}

impl MachineSnapshot {
    /// Build a snapshot of the given machine.
    pub fn of(machine: &Machine) -> Self {
        Self {
            id: machine.id,
            name: machine.name.clone(),
            device_id: machine.device_id.clone(),
            status: machine.status,
            current_operator_id: machine.current_operator_id,
            current_operator_name: None,
            current_pulse_count: machine.current_pulse_count,
            current_meters: machine.current_distance().round_dp(METERS_DISPLAY_SCALE),
            meters_per_pulse: machine.meters_per_pulse,
        }
    }

    /// Attach the resolved operator display name.
    pub fn with_operator_name(mut self, name: Option<String>) -> Self {
        self.current_operator_name = name;
        self
    }
}
