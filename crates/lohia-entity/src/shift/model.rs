//! Shift entity model.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use lohia_core::{AppError, AppResult};

use super::status::ShiftStatus;

/// One operator's work session on one machine.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Shift {
    /// Unique shift identifier.
    pub id: Uuid,
    /// The machine worked on.
    pub machine_id: Uuid,
    /// The operator holding the shift.
    pub operator_id: Uuid,
    /// When the shift opened.
    pub start_time: DateTime<Utc>,
    /// When the shift closed (null while open).
    pub end_time: Option<DateTime<Utc>>,
    /// Total pulses, synced from the machine while active, frozen at close.
    pub total_pulses: i64,
    /// Total meters, synced from the machine while active, frozen at close.
    pub total_meters: Decimal,
    /// Lifecycle status.
    pub status: ShiftStatus,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Shift {
    /// Open a new active shift starting now.
    pub fn open(machine_id: Uuid, operator_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            machine_id,
            operator_id,
            start_time: now,
            end_time: None,
            total_pulses: 0,
            total_meters: Decimal::ZERO,
            status: ShiftStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the shift is still open.
    pub fn is_active(&self) -> bool {
        self.status == ShiftStatus::Active
    }

    /// Sync running totals from the machine's live counters.
    pub fn sync_totals(&mut self, total_pulses: i64, total_meters: Decimal) {
        self.total_pulses = total_pulses;
        self.total_meters = total_meters;
        self.updated_at = Utc::now();
    }

    /// Freeze the totals and close the shift.
    ///
    /// Must be fed the machine's counters *before* the accumulator reset;
    /// the ledger enforces that ordering.
    pub fn complete(&mut self, total_pulses: i64, total_meters: Decimal) -> AppResult<()> {
        if self.status == ShiftStatus::Completed {
            return Err(AppError::conflict("shift is already completed"));
        }
        self.total_pulses = total_pulses;
        self.total_meters = total_meters;
        self.end_time = Some(Utc::now());
        self.status = ShiftStatus::Completed;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Shift duration: up to the close for completed shifts, up to now for
    /// active ones.
    pub fn duration(&self) -> Duration {
        let end = self.end_time.unwrap_or_else(Utc::now);
        end - self.start_time
    }

    /// Shift duration in fractional hours (dashboard field).
    pub fn duration_hours(&self) -> f64 {
        self.duration().num_seconds() as f64 / 3600.0
    }

    /// `H:MM` display of the shift duration.
    pub fn duration_display(&self) -> String {
        let total_seconds = self.duration().num_seconds().max(0);
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        format!("{hours}:{minutes:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_defaults() {
        let shift = Shift::open(Uuid::new_v4(), Uuid::new_v4());
        assert!(shift.is_active());
        assert!(shift.end_time.is_none());
        assert_eq!(shift.total_pulses, 0);
    }

    #[test]
    fn test_complete_freezes_totals() {
        let mut shift = Shift::open(Uuid::new_v4(), Uuid::new_v4());
        shift.complete(50, Decimal::new(575, 2)).unwrap();
        assert_eq!(shift.status, ShiftStatus::Completed);
        assert_eq!(shift.total_pulses, 50);
        assert_eq!(shift.total_meters, Decimal::new(575, 2));
        assert!(shift.end_time.is_some());

        // closing twice is a conflict
        assert!(shift.complete(60, Decimal::ZERO).is_err());
        assert_eq!(shift.total_pulses, 50);
    }

    #[test]
    fn test_duration_display() {
        let mut shift = Shift::open(Uuid::new_v4(), Uuid::new_v4());
        shift.start_time = Utc::now() - Duration::seconds(3 * 3600 + 7 * 60);
        assert_eq!(shift.duration_display(), "3:07");
    }
}
