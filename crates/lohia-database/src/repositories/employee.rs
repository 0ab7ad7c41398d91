//! Employee directory backed by the shared staff table.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use lohia_core::error::{AppError, ErrorKind};
use lohia_core::result::AppResult;
use lohia_entity::employee::Employee;
use lohia_entity::store::EmployeeDirectory;

/// PostgreSQL-backed employee lookup.
///
/// The employees table is owned by the (external) staff system; the monitor
/// only ever reads from it.
#[derive(Debug, Clone)]
pub struct PgEmployeeDirectory {
    pool: PgPool,
}

impl PgEmployeeDirectory {
    /// Create a new directory over the shared pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeDirectory for PgEmployeeDirectory {
    async fn find_active_by_badge(&self, badge_uid: &str) -> AppResult<Option<Employee>> {
        sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees \
             WHERE LOWER(badge_uid) = LOWER($1) AND is_active = TRUE",
        )
        .bind(badge_uid)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find employee by badge", e)
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Employee>> {
        sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find employee by id", e)
            })
    }
}
