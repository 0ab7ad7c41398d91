//! Machine repository implementation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use lohia_core::error::{AppError, ErrorKind};
use lohia_core::result::AppResult;
use lohia_entity::machine::Machine;

const UPDATE_SQL: &str = "UPDATE machines SET \
     name = $2, pulses_per_revolution = $3, gearbox_ratio = $4, \
     sprocket_drive_teeth = $5, sprocket_roller_teeth = $6, \
     roller_diameter_cm = $7, meters_per_pulse = $8, is_active = $9, \
     status = $10, current_operator_id = $11, current_pulse_count = $12, \
     updated_at = $13 \
     WHERE id = $1";

/// Repository for machine rows.
#[derive(Debug, Clone)]
pub struct MachineRepository {
    pool: PgPool,
}

impl MachineRepository {
    /// Create a new machine repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an active machine by its device network id.
    pub async fn find_by_device(&self, device_id: &str) -> AppResult<Option<Machine>> {
        sqlx::query_as::<_, Machine>(
            "SELECT * FROM machines WHERE device_id = $1 AND is_active = TRUE",
        )
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find machine by device", e)
        })
    }

    /// Find a machine by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Machine>> {
        sqlx::query_as::<_, Machine>("SELECT * FROM machines WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find machine by id", e)
            })
    }

    /// Insert a newly registered machine.
    pub async fn insert(&self, machine: &Machine) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO machines (id, name, device_id, pulses_per_revolution, \
             gearbox_ratio, sprocket_drive_teeth, sprocket_roller_teeth, \
             roller_diameter_cm, meters_per_pulse, is_active, status, \
             current_operator_id, current_pulse_count, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
        )
        .bind(machine.id)
        .bind(&machine.name)
        .bind(&machine.device_id)
        .bind(machine.pulses_per_revolution)
        .bind(machine.gearbox_ratio)
        .bind(machine.sprocket_drive_teeth)
        .bind(machine.sprocket_roller_teeth)
        .bind(machine.roller_diameter_cm)
        .bind(machine.meters_per_pulse)
        .bind(machine.is_active)
        .bind(machine.status)
        .bind(machine.current_operator_id)
        .bind(machine.current_pulse_count)
        .bind(machine.created_at)
        .bind(machine.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert machine", e))?;
        Ok(())
    }

    /// Persist the machine's current state.
    pub async fn update(&self, machine: &Machine) -> AppResult<()> {
        let result = bind_update(sqlx::query(UPDATE_SQL), machine)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update machine", e)
            })?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("machine row vanished during update"));
        }
        Ok(())
    }

    /// Persist the machine's current state inside an open transaction.
    pub async fn update_tx(&self, conn: &mut PgConnection, machine: &Machine) -> AppResult<()> {
        bind_update(sqlx::query(UPDATE_SQL), machine)
            .execute(conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update machine", e)
            })?;
        Ok(())
    }

    /// Take an exclusive row lock on the machine for the duration of the
    /// surrounding transaction.
    pub async fn lock_row(&self, conn: &mut PgConnection, id: Uuid) -> AppResult<()> {
        sqlx::query("SELECT id FROM machines WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to lock machine row", e)
            })?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("machine row vanished while locking"))
    }
}

fn bind_update<'q>(
    query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    machine: &'q Machine,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    query
        .bind(machine.id)
        .bind(&machine.name)
        .bind(machine.pulses_per_revolution)
        .bind(machine.gearbox_ratio)
        .bind(machine.sprocket_drive_teeth)
        .bind(machine.sprocket_roller_teeth)
        .bind(machine.roller_diameter_cm)
        .bind(machine.meters_per_pulse)
        .bind(machine.is_active)
        .bind(machine.status)
        .bind(machine.current_operator_id)
        .bind(machine.current_pulse_count)
        .bind(machine.updated_at)
}
