//! Maintenance call status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a maintenance call.
///
/// Transitions run strictly pending → in_progress → completed; no skipping,
/// no moving backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "call_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    /// Reported, waiting for a mechanic.
    Pending,
    /// A mechanic is on the machine.
    InProgress,
    /// Repair signed off (terminal).
    Completed,
}

impl CallStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Whether the call still blocks new calls on the machine.
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Completed)
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
