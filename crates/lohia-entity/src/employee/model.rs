//! Employee entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::EmployeeRole;

/// The slice of an employee record the monitor needs: identity, badge,
/// role, and whether the badge is still valid.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employee {
    /// Unique employee identifier.
    pub id: Uuid,
    /// Display name.
    pub full_name: String,
    /// RFID badge UID (unique, matched case-insensitively).
    pub badge_uid: String,
    /// Role resolved from the directory's department field.
    pub role: EmployeeRole,
    /// Whether the employee (and badge) is active.
    pub is_active: bool,
}

impl Employee {
    /// Create an employee record.
    pub fn new(
        full_name: impl Into<String>,
        badge_uid: impl Into<String>,
        role: EmployeeRole,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            full_name: full_name.into(),
            badge_uid: badge_uid.into(),
            role,
            is_active: true,
        }
    }
}
