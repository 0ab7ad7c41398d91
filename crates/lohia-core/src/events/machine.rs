//! Machine-related domain events.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to machine state transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MachineEvent {
    /// A machine was provisioned with new gear parameters.
    Provisioned {
        /// The machine ID.
        machine_id: Uuid,
        /// The effective meters-per-pulse after provisioning.
        meters_per_pulse: Decimal,
        /// Whether the derived value was recomputed from the parameters.
        recomputed: bool,
    },
    /// An operator started a shift.
    ShiftStarted {
        /// The machine ID.
        machine_id: Uuid,
        /// The new shift ID.
        shift_id: Uuid,
        /// The operator who started it.
        operator_id: Uuid,
    },
    /// A shift was closed and its totals frozen.
    ShiftClosed {
        /// The machine ID.
        machine_id: Uuid,
        /// The closed shift ID.
        shift_id: Uuid,
        /// The operator whose shift closed.
        operator_id: Uuid,
        /// Total pulses accumulated over the shift.
        total_pulses: i64,
        /// Total meters produced over the shift.
        total_meters: Decimal,
    },
    /// An incoming operator's scan closed the outgoing operator's shift.
    ShiftHandedOver {
        /// The machine ID.
        machine_id: Uuid,
        /// The shift that was closed.
        closed_shift_id: Uuid,
        /// The operator whose shift was closed.
        outgoing_operator_id: Uuid,
        /// The newly opened shift.
        new_shift_id: Uuid,
        /// The operator taking over.
        incoming_operator_id: Uuid,
    },
    /// A pulse burst was recorded.
    PulseRecorded {
        /// The machine ID.
        machine_id: Uuid,
        /// The shift the pulses accrued to.
        shift_id: Uuid,
        /// Pulses in this burst.
        delta: i64,
        /// Running machine total after the burst.
        total_pulses: i64,
        /// Distance produced after the burst.
        total_meters: Decimal,
    },
    /// An operator reported a fault.
    MaintenanceRequested {
        /// The machine ID.
        machine_id: Uuid,
        /// The new maintenance call ID.
        call_id: Uuid,
        /// The reporting operator.
        operator_id: Uuid,
    },
    /// A mechanic accepted a maintenance call.
    MaintenanceStarted {
        /// The machine ID.
        machine_id: Uuid,
        /// The accepted call ID.
        call_id: Uuid,
        /// The accepting mechanic.
        mechanic_id: Uuid,
    },
    /// A mechanic completed a repair.
    MaintenanceCompleted {
        /// The machine ID.
        machine_id: Uuid,
        /// The completed call ID.
        call_id: Uuid,
        /// The mechanic who signed off.
        mechanic_id: Uuid,
    },
}

impl MachineEvent {
    /// The machine this event concerns.
    pub fn machine_id(&self) -> Uuid {
        match self {
            Self::Provisioned { machine_id, .. }
            | Self::ShiftStarted { machine_id, .. }
            | Self::ShiftClosed { machine_id, .. }
            | Self::ShiftHandedOver { machine_id, .. }
            | Self::PulseRecorded { machine_id, .. }
            | Self::MaintenanceRequested { machine_id, .. }
            | Self::MaintenanceStarted { machine_id, .. }
            | Self::MaintenanceCompleted { machine_id, .. } => *machine_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_machine_id_extraction() {
        let machine_id = Uuid::new_v4();
        let event = MachineEvent::ShiftStarted {
            machine_id,
            shift_id: Uuid::new_v4(),
            operator_id: Uuid::new_v4(),
        };
        assert_eq!(event.machine_id(), machine_id);
    }

    #[test]
    fn test_serde_tagging() {
        let event = MachineEvent::MaintenanceRequested {
            machine_id: Uuid::new_v4(),
            call_id: Uuid::new_v4(),
            operator_id: Uuid::new_v4(),
        };
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["type"], "MaintenanceRequested");
    }
}
