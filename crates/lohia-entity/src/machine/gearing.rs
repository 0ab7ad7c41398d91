//! Mechanical gear parameters and the meters-per-pulse conversion.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use lohia_core::config::machine::MachineDefaults;
use lohia_core::{AppError, AppResult};

/// π to the precision used throughout the meters calculation.
const PI: Decimal = Decimal::from_parts(626_652_751, 73, 0, false, 11);

/// The mechanical constants of a take-up roller drive train.
///
/// These are write-once configuration in practice; the derived
/// meters-per-pulse value is computed from them exactly once per machine
/// (see [`Machine::apply_gearing`](super::Machine::apply_gearing)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gearing {
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
}

impl Gearing {
    /// Reject non-positive parameters.
    pub fn validate(&self) -> AppResult<()> {
        if self.pulses_per_revolution <= 0 {
            return Err(AppError::validation("pulses_per_revolution must be positive"));
        }
        if self.gearbox_ratio <= Decimal::ZERO {
            return Err(AppError::validation("gearbox_ratio must be positive"));
        }
        if self.sprocket_drive_teeth <= 0 {
            return Err(AppError::validation("sprocket_drive_teeth must be positive"));
        }
        if self.sprocket_roller_teeth <= 0 {
            return Err(AppError::validation("sprocket_roller_teeth must be positive"));
        }
        if self.roller_diameter_cm <= Decimal::ZERO {
            return Err(AppError::validation("roller_diameter_cm must be positive"));
        }
        Ok(())
    }

    /// Convert the gear parameters into linear meters per sensor pulse.
    ///
    /// `circumference_m = π · (roller_diameter_cm / 100)`;
    /// `effective_ratio = gearbox_ratio · (roller_teeth / drive_teeth)`;
    /// the result is `circumference_m / effective_ratio / pulses_per_rev`.
    ///
    /// Fixed-point throughout; callers round only when persisting or
    /// displaying, never mid-calculation.
    pub fn meters_per_pulse(&self) -> AppResult<Decimal> {
        self.validate()?;

        let roller_diameter_m = self.roller_diameter_cm / Decimal::ONE_HUNDRED;
        let circumference = PI * roller_diameter_m;

        let effective_ratio = self.gearbox_ratio
            * (Decimal::from(self.sprocket_roller_teeth)
                / Decimal::from(self.sprocket_drive_teeth));

        let meters_per_revolution = circumference / effective_ratio;

        Ok(meters_per_revolution / Decimal::from(self.pulses_per_revolution))
    }
}

impl From<&MachineDefaults> for Gearing {
    fn from(defaults: &MachineDefaults) -> Self {
        Self {
            pulses_per_revolution: defaults.pulses_per_revolution,
            gearbox_ratio: defaults.gearbox_ratio,
            sprocket_drive_teeth: defaults.sprocket_drive_teeth,
            sprocket_roller_teeth: defaults.sprocket_roller_teeth,
            roller_diameter_cm: defaults.roller_diameter_cm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn factory_default() -> Gearing {
        Gearing {
            pulses_per_revolution: 40,
            gearbox_ratio: Decimal::new(6400, 2),
            sprocket_drive_teeth: 23,
            sprocket_roller_teeth: 41,
            roller_diameter_cm: Decimal::new(1670, 2),
        }
    }

    #[test]
    fn test_pi_literal() {
        assert_eq!(PI, Decimal::from_str("3.14159265359").unwrap());
    }

    #[test]
    fn test_factory_default_meters_per_pulse() {
        let mpp = factory_default().meters_per_pulse().unwrap();
        assert!(mpp > Decimal::ZERO);
        // circumference 0.5246... m over an effective ratio of 64·41/23,
        // split across 40 pulses per revolution
        assert_eq!(mpp.round_dp(6), Decimal::from_str("0.000115").unwrap());
        assert_eq!(mpp.round_dp(9), Decimal::from_str("0.000114966").unwrap());
    }

    #[test]
    fn test_strictly_positive_for_valid_inputs() {
        let mut gearing = factory_default();
        gearing.roller_diameter_cm = Decimal::new(1, 2);
        gearing.gearbox_ratio = Decimal::new(100000, 0);
        let mpp = gearing.meters_per_pulse().unwrap();
        assert!(mpp > Decimal::ZERO);
    }

    #[test]
    fn test_rejects_non_positive_inputs() {
        let mut gearing = factory_default();
        gearing.pulses_per_revolution = 0;
        assert!(gearing.meters_per_pulse().is_err());

        let mut gearing = factory_default();
        gearing.gearbox_ratio = Decimal::ZERO;
        assert!(gearing.meters_per_pulse().is_err());

        let mut gearing = factory_default();
        gearing.sprocket_drive_teeth = -5;
        assert!(gearing.meters_per_pulse().is_err());

        let mut gearing = factory_default();
        gearing.roller_diameter_cm = Decimal::new(-1670, 2);
        assert!(gearing.meters_per_pulse().is_err());
    }

    #[test]
    fn test_configured_defaults_match_factory_sheet() {
        let gearing = Gearing::from(&MachineDefaults::default());
        assert_eq!(gearing, factory_default());
    }
}
