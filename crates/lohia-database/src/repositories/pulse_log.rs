//! Pulse log repository implementation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use lohia_core::error::{AppError, ErrorKind};
use lohia_core::result::AppResult;
use lohia_entity::pulse::PulseLog;

/// Repository for the append-only pulse log.
#[derive(Debug, Clone)]
pub struct PulseLogRepository {
    pool: PgPool,
}

impl PulseLogRepository {
    /// Create a new pulse log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append one log row inside an open transaction.
    pub async fn insert_tx(&self, conn: &mut PgConnection, log: &PulseLog) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO pulse_logs (id, machine_id, shift_id, timestamp, pulse_delta, \
             total_pulses, meters_produced) VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(log.id)
        .bind(log.machine_id)
        .bind(log.shift_id)
        .bind(log.timestamp)
        .bind(log.pulse_delta)
        .bind(log.total_pulses)
        .bind(log.meters_produced)
        .execute(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to append pulse log", e)
        })?;
        Ok(())
    }

    /// Most recent log rows for a machine, newest first.
    pub async fn find_recent(&self, machine_id: Uuid, limit: i64) -> AppResult<Vec<PulseLog>> {
        sqlx::query_as::<_, PulseLog>(
            "SELECT * FROM pulse_logs WHERE machine_id = $1 \
             ORDER BY timestamp DESC LIMIT $2",
        )
        .bind(machine_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list pulse logs", e)
        })
    }
}
