//! Shift repository implementation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use lohia_core::error::{AppError, ErrorKind};
use lohia_core::result::AppResult;
use lohia_core::types::{PageRequest, PageResponse};
use lohia_entity::shift::Shift;

const INSERT_SQL: &str = "INSERT INTO shifts (id, machine_id, operator_id, start_time, \
     end_time, total_pulses, total_meters, status, created_at, updated_at) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)";

const UPDATE_SQL: &str = "UPDATE shifts SET end_time = $2, total_pulses = $3, \
     total_meters = $4, status = $5, updated_at = $6 WHERE id = $1";

/// Repository for shift rows.
#[derive(Debug, Clone)]
pub struct ShiftRepository {
    pool: PgPool,
}

impl ShiftRepository {
    /// Create a new shift repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The machine's currently active shift, if any.
    pub async fn find_active(&self, machine_id: Uuid) -> AppResult<Option<Shift>> {
        sqlx::query_as::<_, Shift>(
            "SELECT * FROM shifts WHERE machine_id = $1 AND status = 'active' \
             ORDER BY start_time DESC LIMIT 1",
        )
        .bind(machine_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find active shift", e)
        })
    }

    /// Insert a new shift inside an open transaction.
    pub async fn insert_tx(&self, conn: &mut PgConnection, shift: &Shift) -> AppResult<()> {
        sqlx::query(INSERT_SQL)
            .bind(shift.id)
            .bind(shift.machine_id)
            .bind(shift.operator_id)
            .bind(shift.start_time)
            .bind(shift.end_time)
            .bind(shift.total_pulses)
            .bind(shift.total_meters)
            .bind(shift.status)
            .bind(shift.created_at)
            .bind(shift.updated_at)
            .execute(conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert shift", e))?;
        Ok(())
    }

    /// Persist shift totals/status inside an open transaction.
    pub async fn update_tx(&self, conn: &mut PgConnection, shift: &Shift) -> AppResult<()> {
        sqlx::query(UPDATE_SQL)
            .bind(shift.id)
            .bind(shift.end_time)
            .bind(shift.total_pulses)
            .bind(shift.total_meters)
            .bind(shift.status)
            .bind(shift.updated_at)
            .execute(conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update shift", e))?;
        Ok(())
    }

    /// Shift history for a machine, newest first.
    pub async fn find_by_machine(
        &self,
        machine_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Shift>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shifts WHERE machine_id = $1")
            .bind(machine_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count shifts", e))?;

        let shifts = sqlx::query_as::<_, Shift>(
            "SELECT * FROM shifts WHERE machine_id = $1 \
             ORDER BY start_time DESC LIMIT $2 OFFSET $3",
        )
        .bind(machine_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list shifts", e))?;

        Ok(PageResponse::new(
            shifts,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
