//! Pulse log entity model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One row per ingest event: the audit trail of the accumulator.
///
/// Rows are created only by the pulse ingest path and never mutated or
/// deleted afterwards; retention is an operational concern.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PulseLog {
    /// Unique log row identifier.
    pub id: Uuid,
    /// The machine that produced the pulses.
    pub machine_id: Uuid,
    /// The shift the pulses accrued to.
    pub shift_id: Uuid,
    /// When the burst was ingested.
    pub timestamp: DateTime<Utc>,
    /// Pulses in this burst.
    pub pulse_delta: i64,
    /// Machine running total after this burst.
    pub total_pulses: i64,
    /// Distance produced after this burst, in meters.
    pub meters_produced: Decimal,
}

impl PulseLog {
    /// Record one ingest event.
    pub fn record(
        machine_id: Uuid,
        shift_id: Uuid,
        pulse_delta: i64,
        total_pulses: i64,
        meters_produced: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            machine_id,
            shift_id,
            timestamp: Utc::now(),
            pulse_delta,
            total_pulses,
            meters_produced,
        }
    }
}
