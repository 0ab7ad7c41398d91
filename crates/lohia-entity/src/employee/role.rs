//! Employee role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The roles the badge router dispatches on.
///
/// Resolved once at badge lookup from the directory's department string;
/// anything that is neither an operator nor a mechanic collapses into
/// `Other` and gets an informational acknowledgment only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "employee_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EmployeeRole {
    /// Runs production shifts on a machine.
    Operator,
    /// Accepts and completes maintenance calls.
    Mechanic,
    /// Any other department.
    Other,
}

impl EmployeeRole {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Operator => "operator",
            Self::Mechanic => "mechanic",
            Self::Other => "other",
        }
    }

    /// Whether this employee runs shifts.
    pub fn is_operator(&self) -> bool {
        matches!(self, Self::Operator)
    }

    /// Whether this employee handles maintenance calls.
    pub fn is_mechanic(&self) -> bool {
        matches!(self, Self::Mechanic)
    }
}

impl fmt::Display for EmployeeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EmployeeRole {
    type Err = std::convert::Infallible;

    /// Department strings map onto the closed enumeration; unknown
    /// departments become `Other` rather than an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "operator" => Self::Operator,
            "mechanic" | "master" => Self::Mechanic,
            _ => Self::Other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_mapping() {
        assert_eq!("operator".parse::<EmployeeRole>().unwrap(), EmployeeRole::Operator);
        assert_eq!("Mechanic".parse::<EmployeeRole>().unwrap(), EmployeeRole::Mechanic);
        // the legacy directory labels mechanics "master"
        assert_eq!("master".parse::<EmployeeRole>().unwrap(), EmployeeRole::Mechanic);
        assert_eq!("accounting".parse::<EmployeeRole>().unwrap(), EmployeeRole::Other);
    }
}
