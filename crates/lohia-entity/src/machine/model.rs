//! Machine entity model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use lohia_core::{AppError, AppResult};

use super::gearing::Gearing;
use super::status::MachineStatus;

/// Stored scale of the derived meters-per-pulse constant.
const METERS_PER_PULSE_SCALE: u32 = 6;

/// One physical production line.
///
/// The machine row is the single serialization point for everything that
/// happens on a line: shift open/close, pulse accumulation, and maintenance
/// transitions all mutate it through the methods below, never field-by-field
/// from the outside.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Machine {
    /// Unique machine identifier.
    pub id: Uuid,
    /// Display name of the line.
    pub name: String,
    /// Network identifier of the badge-reader/sensor unit (unique).
    pub device_id: String,
    /// Sensor pulses emitted per roller revolution.
    pub pulses_per_revolution: i32,
    /// Gearbox reduction ratio.
    pub gearbox_ratio: Decimal,
    /// Tooth count of the gearbox-side sprocket.
    pub sprocket_drive_teeth: i32,
    /// Tooth count of the take-up-roller sprocket.
    pub sprocket_roller_teeth: i32,
    /// Take-up roller diameter in centimeters.
    pub roller_diameter_cm: Decimal,
    /// Derived meters-per-pulse constant; zero means "not yet computed".
    pub meters_per_pulse: Decimal,
    /// Whether the machine is provisioned and accepting device traffic.
    pub is_active: bool,
    /// Current operational status.
    pub status: MachineStatus,
    /// Operator currently holding the line (if any).
    pub current_operator_id: Option<Uuid>,
    /// Raw pulse accumulator, reset to zero exactly at shift boundaries.
    pub current_pulse_count: i64,
    /// When the machine was registered.
    pub created_at: DateTime<Utc>,
    /// When the machine was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Machine {
    /// Register a new machine with the given gear parameters.
    ///
    /// The derived meters-per-pulse is computed immediately since a fresh
    /// machine always carries the zero sentinel.
    pub fn register(
        name: impl Into<String>,
        device_id: impl Into<String>,
        gearing: &Gearing,
    ) -> AppResult<Self> {
        let now = Utc::now();
        let mut machine = Self {
            id: Uuid::new_v4(),
            name: name.into(),
            device_id: device_id.into(),
            pulses_per_revolution: gearing.pulses_per_revolution,
            gearbox_ratio: gearing.gearbox_ratio,
            sprocket_drive_teeth: gearing.sprocket_drive_teeth,
            sprocket_roller_teeth: gearing.sprocket_roller_teeth,
            roller_diameter_cm: gearing.roller_diameter_cm,
            meters_per_pulse: Decimal::ZERO,
            is_active: true,
            status: MachineStatus::Idle,
            current_operator_id: None,
            current_pulse_count: 0,
            created_at: now,
            updated_at: now,
        };
        machine.apply_gearing(gearing)?;
        Ok(machine)
    }

    /// The machine's current gear parameters.
    pub fn gearing(&self) -> Gearing {
        Gearing {
            pulses_per_revolution: self.pulses_per_revolution,
            gearbox_ratio: self.gearbox_ratio,
            sprocket_drive_teeth: self.sprocket_drive_teeth,
            sprocket_roller_teeth: self.sprocket_roller_teeth,
            roller_diameter_cm: self.roller_diameter_cm,
        }
    }

    /// Store new gear parameters, recomputing the derived meters-per-pulse
    /// **only** when it is still the zero sentinel.
    ///
    /// A non-zero value is left untouched even if the parameters changed:
    /// manually calibrated machines (sensor drift correction) must not be
    /// clobbered by a routine settings save. Every persistence path goes
    /// through this one rule. Returns whether the value was recomputed.
    pub fn apply_gearing(&mut self, gearing: &Gearing) -> AppResult<bool> {
        gearing.validate()?;

        self.pulses_per_revolution = gearing.pulses_per_revolution;
        self.gearbox_ratio = gearing.gearbox_ratio;
        self.sprocket_drive_teeth = gearing.sprocket_drive_teeth;
        self.sprocket_roller_teeth = gearing.sprocket_roller_teeth;
        self.roller_diameter_cm = gearing.roller_diameter_cm;

        let recomputed = if self.meters_per_pulse.is_zero() {
            self.meters_per_pulse = gearing
                .meters_per_pulse()?
                .round_dp(METERS_PER_PULSE_SCALE);
            true
        } else {
            false
        };
        self.touch();
        Ok(recomputed)
    }

    /// Current distance produced this shift, in meters.
    ///
    /// Computed at read time from the raw accumulator; never stored as a
    /// base quantity.
    pub fn current_distance(&self) -> Decimal {
        Decimal::from(self.current_pulse_count) * self.meters_per_pulse
    }

    /// Assign an operator and begin accruing production.
    ///
    /// Fails with a conflict when a different operator already occupies the
    /// machine; the caller must have closed the outgoing shift first (the
    /// badge router's hand-over path does exactly that).
    pub fn start_shift(&mut self, operator_id: Uuid) -> AppResult<()> {
        if let Some(current) = self.current_operator_id
            && current != operator_id
        {
            return Err(AppError::conflict(
                "machine is already occupied by another operator",
            ));
        }
        self.current_operator_id = Some(operator_id);
        self.status = MachineStatus::Working;
        self.current_pulse_count = 0;
        self.touch();
        Ok(())
    }

    /// Release the machine at the end of a shift.
    ///
    /// Resets the accumulator; the shift ledger must have captured the
    /// totals strictly before calling this.
    pub fn end_shift(&mut self) {
        self.current_operator_id = None;
        self.status = MachineStatus::Idle;
        self.current_pulse_count = 0;
        self.touch();
    }

    /// Accrue a pulse burst onto the raw accumulator.
    pub fn record_pulses(&mut self, delta: i64) -> AppResult<()> {
        if delta <= 0 {
            return Err(AppError::validation("pulse delta must be positive"));
        }
        if self.current_operator_id.is_none() {
            return Err(AppError::not_working("machine has no assigned operator"));
        }
        self.current_pulse_count += delta;
        self.touch();
        Ok(())
    }

    /// Mark the machine as under repair.
    pub fn start_maintenance(&mut self) {
        self.status = MachineStatus::Maintenance;
        self.touch();
    }

    /// Leave maintenance: back to working if an operator is still assigned,
    /// idle otherwise.
    pub fn end_maintenance(&mut self) {
        self.status = if self.current_operator_id.is_some() {
            MachineStatus::Working
        } else {
            MachineStatus::Idle
        };
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
