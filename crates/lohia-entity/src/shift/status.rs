//! Shift status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "shift_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ShiftStatus {
    /// The operator is on the machine; totals are still moving.
    Active,
    /// The shift is closed and its totals frozen.
    Completed,
}

impl ShiftStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
