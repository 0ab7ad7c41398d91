//! Maintenance call entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use lohia_core::{AppError, AppResult};

use super::status::CallStatus;

/// One fault-report-to-resolution cycle on a machine.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MaintenanceCall {
    /// Unique call identifier.
    pub id: Uuid,
    /// The machine that faulted.
    pub machine_id: Uuid,
    /// The operator who reported the fault.
    pub operator_id: Uuid,
    /// When the fault was reported.
    pub call_time: DateTime<Utc>,
    /// The mechanic assigned on acceptance.
    pub mechanic_id: Option<Uuid>,
    /// When the mechanic accepted and the repair started.
    pub repair_start: Option<DateTime<Utc>>,
    /// When the repair was signed off.
    pub repair_end: Option<DateTime<Utc>>,
    /// Lifecycle status.
    pub status: CallStatus,
    /// Free-text problem/resolution description.
    pub description: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl MaintenanceCall {
    /// Report a new fault, opening a pending call.
    pub fn report(machine_id: Uuid, operator_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            machine_id,
            operator_id,
            call_time: now,
            mechanic_id: None,
            repair_start: None,
            repair_end: None,
            status: CallStatus::Pending,
            description: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Accept the call: assign the mechanic and start the repair clock.
    ///
    /// Valid only from `pending`.
    pub fn accept(&mut self, mechanic_id: Uuid) -> AppResult<()> {
        if self.status != CallStatus::Pending {
            return Err(AppError::conflict(format!(
                "maintenance call is {} and cannot be accepted",
                self.status
            )));
        }
        self.mechanic_id = Some(mechanic_id);
        self.repair_start = Some(Utc::now());
        self.status = CallStatus::InProgress;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Sign off the repair.
    ///
    /// Valid only from `in_progress` and only by the mechanic who accepted
    /// the call.
    pub fn complete(&mut self, mechanic_id: Uuid, description: &str) -> AppResult<()> {
        if self.status != CallStatus::InProgress {
            return Err(AppError::conflict(format!(
                "maintenance call is {} and cannot be completed",
                self.status
            )));
        }
        if self.mechanic_id != Some(mechanic_id) {
            return Err(AppError::conflict(
                "repair can only be completed by the mechanic who accepted it",
            ));
        }
        if !description.is_empty() {
            self.description = description.to_string();
        }
        self.repair_end = Some(Utc::now());
        self.status = CallStatus::Completed;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Mechanic response time: from report to repair start. `None` until
    /// the call is accepted.
    pub fn response_time(&self) -> Option<Duration> {
        self.repair_start.map(|start| start - self.call_time)
    }

    /// Repair duration: from repair start to sign-off. `None` until the
    /// call is completed.
    pub fn repair_duration(&self) -> Option<Duration> {
        match (self.repair_start, self.repair_end) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// `M:SS` display of the response time, `—` when not yet accepted.
    pub fn response_time_display(&self) -> String {
        format_minutes_seconds(self.response_time())
    }

    /// `M:SS` display of the repair duration, `—` when not yet completed.
    pub fn repair_duration_display(&self) -> String {
        format_minutes_seconds(self.repair_duration())
    }
}

fn format_minutes_seconds(duration: Option<Duration>) -> String {
    match duration {
        Some(d) => {
            let total_seconds = d.num_seconds().max(0);
            format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
        }
        None => "—".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_happy_path() {
        let mechanic = Uuid::new_v4();
        let mut call = MaintenanceCall::report(Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(call.status, CallStatus::Pending);
        assert!(call.response_time().is_none());

        call.accept(mechanic).unwrap();
        assert_eq!(call.status, CallStatus::InProgress);
        assert_eq!(call.mechanic_id, Some(mechanic));
        assert!(call.response_time().is_some());
        assert!(call.repair_duration().is_none());

        call.complete(mechanic, "replaced belt").unwrap();
        assert_eq!(call.status, CallStatus::Completed);
        assert_eq!(call.description, "replaced belt");
        assert!(call.repair_duration().is_some());
    }

    #[test]
    fn test_accept_only_from_pending() {
        let mechanic = Uuid::new_v4();
        let mut call = MaintenanceCall::report(Uuid::new_v4(), Uuid::new_v4());
        call.accept(mechanic).unwrap();
        // a second mechanic cannot accept an in-progress call
        assert!(call.accept(Uuid::new_v4()).is_err());
        assert_eq!(call.mechanic_id, Some(mechanic));
    }

    #[test]
    fn test_complete_requires_same_mechanic() {
        let mechanic = Uuid::new_v4();
        let mut call = MaintenanceCall::report(Uuid::new_v4(), Uuid::new_v4());
        call.accept(mechanic).unwrap();
        assert!(call.complete(Uuid::new_v4(), "").is_err());
        assert_eq!(call.status, CallStatus::InProgress);
        call.complete(mechanic, "").unwrap();
    }

    #[test]
    fn test_no_backward_or_skipping_transitions() {
        let mechanic = Uuid::new_v4();
        let mut call = MaintenanceCall::report(Uuid::new_v4(), Uuid::new_v4());
        // cannot complete straight from pending
        assert!(call.complete(mechanic, "").is_err());

        call.accept(mechanic).unwrap();
        call.complete(mechanic, "done").unwrap();
        // terminal state
        assert!(call.accept(mechanic).is_err());
        assert!(call.complete(mechanic, "again").is_err());
    }

    #[test]
    fn test_display_helpers() {
        let call = MaintenanceCall::report(Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(call.response_time_display(), "—");
        assert_eq!(call.repair_duration_display(), "—");
    }
}
