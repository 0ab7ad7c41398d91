//! Machine operational status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operational status of a machine. Exactly one holds at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "machine_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MachineStatus {
    /// No operator assigned; line is available.
    Idle,
    /// An operator holds an active shift on the line.
    Working,
    /// A mechanic is repairing the line.
    Maintenance,
    /// The line is administratively stopped.
    Stopped,
}

impl MachineStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Working => "working",
            Self::Maintenance => "maintenance",
            Self::Stopped => "stopped",
        }
    }

    /// Whether the line currently accrues production.
    pub fn is_working(&self) -> bool {
        matches!(self, Self::Working)
    }
}

impl fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
