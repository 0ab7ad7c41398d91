//! Mechanical defaults for newly registered machines.
//!
//! These match the factory settings sheet of the Lohia lines: a machine
//! registered without explicit gear parameters starts from these values.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default gear parameters applied when registering a machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineDefaults {
    /// Sensor pulses emitted per roller revolution.
    #[serde(default = "default_pulses_per_revolution")]
    pub pulses_per_revolution: i32,
    /// Gearbox reduction ratio.
    #[serde(default = "default_gearbox_ratio")]
    pub gearbox_ratio: Decimal,
    /// Tooth count of the gearbox-side sprocket.
    #[serde(default = "default_sprocket_drive_teeth")]
    pub sprocket_drive_teeth: i32,
    /// Tooth count of the take-up-roller sprocket.
    #[serde(default = "default_sprocket_roller_teeth")]
    pub sprocket_roller_teeth: i32,
    /// Take-up roller diameter in centimeters.
    #[serde(default = "default_roller_diameter_cm")]
    pub roller_diameter_cm: Decimal,
}

impl Default for MachineDefaults {
    fn default() -> Self {
        Self {
            pulses_per_revolution: default_pulses_per_revolution(),
            gearbox_ratio: default_gearbox_ratio(),
            sprocket_drive_teeth: default_sprocket_drive_teeth(),
            sprocket_roller_teeth: default_sprocket_roller_teeth(),
            roller_diameter_cm: default_roller_diameter_cm(),
        }
    }
}

fn default_pulses_per_revolution() -> i32 {
    40
}

fn default_gearbox_ratio() -> Decimal {
    // 64.00
    Decimal::new(6400, 2)
}

fn default_sprocket_drive_teeth() -> i32 {
    23
}

fn default_sprocket_roller_teeth() -> i32 {
    41
}

fn default_roller_diameter_cm() -> Decimal {
    // 16.70 cm
    Decimal::new(1670, 2)
}
