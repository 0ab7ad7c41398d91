//! Maintenance call repository implementation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use lohia_core::error::{AppError, ErrorKind};
use lohia_core::result::AppResult;
use lohia_core::types::{PageRequest, PageResponse};
use lohia_entity::maintenance::MaintenanceCall;

/// Repository for maintenance call rows.
#[derive(Debug, Clone)]
pub struct MaintenanceCallRepository {
    pool: PgPool,
}

impl MaintenanceCallRepository {
    /// Create a new maintenance call repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The machine's open (non-completed) call, if any.
    pub async fn find_open(&self, machine_id: Uuid) -> AppResult<Option<MaintenanceCall>> {
        sqlx::query_as::<_, MaintenanceCall>(
            "SELECT * FROM maintenance_calls \
             WHERE machine_id = $1 AND status IN ('pending', 'in_progress') \
             ORDER BY call_time DESC LIMIT 1",
        )
        .bind(machine_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find open call", e)
        })
    }

    /// Insert a newly reported call.
    pub async fn insert(&self, call: &MaintenanceCall) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO maintenance_calls (id, machine_id, operator_id, call_time, \
             mechanic_id, repair_start, repair_end, status, description, created_at, \
             updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(call.id)
        .bind(call.machine_id)
        .bind(call.operator_id)
        .bind(call.call_time)
        .bind(call.mechanic_id)
        .bind(call.repair_start)
        .bind(call.repair_end)
        .bind(call.status)
        .bind(&call.description)
        .bind(call.created_at)
        .bind(call.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert call", e))?;
        Ok(())
    }

    /// Persist a call transition inside an open transaction.
    pub async fn update_tx(&self, conn: &mut PgConnection, call: &MaintenanceCall) -> AppResult<()> {
        sqlx::query(
            "UPDATE maintenance_calls SET mechanic_id = $2, repair_start = $3, \
             repair_end = $4, status = $5, description = $6, updated_at = $7 \
             WHERE id = $1",
        )
        .bind(call.id)
        .bind(call.mechanic_id)
        .bind(call.repair_start)
        .bind(call.repair_end)
        .bind(call.status)
        .bind(&call.description)
        .bind(call.updated_at)
        .execute(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update call", e))?;
        Ok(())
    }

    /// Maintenance call history for a machine, newest first.
    pub async fn find_by_machine(
        &self,
        machine_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<MaintenanceCall>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM maintenance_calls WHERE machine_id = $1")
                .bind(machine_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count calls", e)
                })?;

        let calls = sqlx::query_as::<_, MaintenanceCall>(
            "SELECT * FROM maintenance_calls WHERE machine_id = $1 \
             ORDER BY call_time DESC LIMIT $2 OFFSET $3",
        )
        .bind(machine_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list calls", e))?;

        Ok(PageResponse::new(
            calls,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
