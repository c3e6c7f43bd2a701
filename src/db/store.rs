//! Storage operations for sensor readings and system settings.
//!
//! Every function borrows the process-wide pool; a connection is checked out
//! for the duration of the single statement and returned on all paths.

use chrono::Utc;
use sqlx::SqlitePool;

use super::models::{OperationMode, SensorReading, SystemSettings};

/// Appends one reading. Absent measurements are stored as NULL; the timestamp
/// is assigned here, not by the caller.
pub async fn insert_reading(
    pool: &SqlitePool,
    temperature: Option<f64>,
    humidity: Option<f64>,
    light_level: Option<i64>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO sensor_data (temperature, humidity, light_level, timestamp) \
         VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(temperature)
    .bind(humidity)
    .bind(light_level)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

/// Returns the `limit` most recent readings, newest first. Rows that share a
/// timestamp fall back to insertion order, also newest first.
pub async fn list_readings(
    pool: &SqlitePool,
    limit: u32,
) -> Result<Vec<SensorReading>, sqlx::Error> {
    sqlx::query_as::<_, SensorReading>(
        "SELECT id, temperature, humidity, light_level, timestamp \
         FROM sensor_data \
         ORDER BY timestamp DESC, id DESC \
         LIMIT ?1",
    )
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await
}

/// Returns the effective settings: the row with the highest `id`. The seed
/// migration guarantees at least one row, so `RowNotFound` here means the
/// store was never initialised.
pub async fn latest_settings(pool: &SqlitePool) -> Result<SystemSettings, sqlx::Error> {
    sqlx::query_as::<_, SystemSettings>(
        "SELECT id, temp_threshold, moisture_threshold, light_threshold, \
                operation_mode, last_updated \
         FROM system_settings \
         ORDER BY id DESC \
         LIMIT 1",
    )
    .fetch_one(pool)
    .await
}

/// Appends a new settings row. Full-record replace: all four fields are
/// written as given, and prior rows stay behind as history.
pub async fn append_settings(
    pool: &SqlitePool,
    temp_threshold: f64,
    moisture_threshold: i64,
    light_threshold: i64,
    operation_mode: OperationMode,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO system_settings \
         (temp_threshold, moisture_threshold, light_threshold, operation_mode, last_updated) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(temp_threshold)
    .bind(moisture_threshold)
    .bind(light_threshold)
    .bind(operation_mode)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

/// Switches the operation mode by updating the latest settings row in place.
/// Unlike [`append_settings`] this does NOT create a new row; the settings
/// `id` stays the same. Thresholds are untouched.
pub async fn update_mode(pool: &SqlitePool, mode: OperationMode) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE system_settings \
         SET operation_mode = ?1, last_updated = ?2 \
         WHERE id = (SELECT id FROM system_settings ORDER BY id DESC LIMIT 1)",
    )
    .bind(mode)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::SqlitePool;

    #[sqlx::test(migrations = "./migrations")]
    async fn seed_row_has_documented_defaults(pool: SqlitePool) {
        let settings = latest_settings(&pool).await.unwrap();
        assert_eq!(settings.temp_threshold, 23.0);
        assert_eq!(settings.moisture_threshold, 50);
        assert_eq!(settings.light_threshold, 1200);
        assert_eq!(settings.operation_mode, OperationMode::Auto);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn insert_then_list_returns_reading(pool: SqlitePool) {
        insert_reading(&pool, Some(21.5), Some(48.0), Some(900))
            .await
            .unwrap();

        let rows = list_readings(&pool, 10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].temperature, Some(21.5));
        assert_eq!(rows[0].humidity, Some(48.0));
        assert_eq!(rows[0].light_level, Some(900));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn insert_accepts_all_fields_absent(pool: SqlitePool) {
        insert_reading(&pool, None, None, None).await.unwrap();

        let rows = list_readings(&pool, 1).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].temperature, None);
        assert_eq!(rows[0].humidity, None);
        assert_eq!(rows[0].light_level, None);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn list_orders_newest_first_with_increasing_ids(pool: SqlitePool) {
        for i in 0..3 {
            insert_reading(&pool, Some(20.0 + f64::from(i)), None, None)
                .await
                .unwrap();
        }

        let rows = list_readings(&pool, 10).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].temperature, Some(22.0));
        assert_eq!(rows[2].temperature, Some(20.0));
        assert!(rows[0].id > rows[1].id && rows[1].id > rows[2].id);
        assert!(rows[0].timestamp >= rows[2].timestamp);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn list_limit_caps_rows(pool: SqlitePool) {
        for _ in 0..5 {
            insert_reading(&pool, Some(20.0), None, None).await.unwrap();
        }

        let rows = list_readings(&pool, 2).await.unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn list_limit_zero_is_empty(pool: SqlitePool) {
        insert_reading(&pool, Some(20.0), None, None).await.unwrap();

        let rows = list_readings(&pool, 0).await.unwrap();
        assert!(rows.is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn identical_inserts_get_distinct_ids(pool: SqlitePool) {
        insert_reading(&pool, Some(20.0), Some(50.0), Some(800))
            .await
            .unwrap();
        insert_reading(&pool, Some(20.0), Some(50.0), Some(800))
            .await
            .unwrap();

        let rows = list_readings(&pool, 10).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_ne!(rows[0].id, rows[1].id);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn append_settings_creates_new_row(pool: SqlitePool) {
        let before = latest_settings(&pool).await.unwrap();

        append_settings(&pool, 25.5, 60, 1500, OperationMode::Manual)
            .await
            .unwrap();

        let after = latest_settings(&pool).await.unwrap();
        assert!(after.id > before.id);
        assert_eq!(after.temp_threshold, 25.5);
        assert_eq!(after.moisture_threshold, 60);
        assert_eq!(after.light_threshold, 1500);
        assert_eq!(after.operation_mode, OperationMode::Manual);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn update_mode_rewrites_latest_row_in_place(pool: SqlitePool) {
        let before = latest_settings(&pool).await.unwrap();

        update_mode(&pool, OperationMode::Off).await.unwrap();

        let after = latest_settings(&pool).await.unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.operation_mode, OperationMode::Off);
        assert_eq!(after.temp_threshold, before.temp_threshold);
        assert_eq!(after.moisture_threshold, before.moisture_threshold);
        assert_eq!(after.light_threshold, before.light_threshold);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn update_mode_targets_highest_id_row(pool: SqlitePool) {
        append_settings(&pool, 24.0, 55, 1300, OperationMode::Auto)
            .await
            .unwrap();
        let appended = latest_settings(&pool).await.unwrap();

        update_mode(&pool, OperationMode::Manual).await.unwrap();

        let after = latest_settings(&pool).await.unwrap();
        assert_eq!(after.id, appended.id);
        assert_eq!(after.operation_mode, OperationMode::Manual);
    }
}
