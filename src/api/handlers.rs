use axum::{extract::State, Json};
use serde::Deserialize;
use sqlx::SqlitePool;
use utoipa::OpenApi;

use super::{
    dto::{
        ModeRequest, SensorDataRequest, SensorReadingDto, SettingsRequest, StatusResponse,
        SystemSettingsDto,
    },
    errors::{ApiJson, ApiQuery, AppError},
};
use crate::db::{models::OperationMode, store};

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

const DEFAULT_READINGS_LIMIT: u32 = 10;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<u32>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Ingest one sensor reading. All measurement fields are optional; the
/// timestamp is assigned server-side at insertion.
#[utoipa::path(
    post,
    path = "/api/sensor-data",
    request_body = SensorDataRequest,
    responses(
        (status = 200, description = "Reading stored", body = StatusResponse),
        (status = 400, description = "Malformed request body"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "sensor-data"
)]
pub async fn post_sensor_data(
    State(pool): State<SqlitePool>,
    ApiJson(req): ApiJson<SensorDataRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    store::insert_reading(&pool, req.temperature, req.humidity, req.light_level).await?;
    Ok(Json(StatusResponse::success()))
}

/// Fetch the most recent readings, newest first. `?limit=<n>` caps the row
/// count and defaults to 10; `limit=0` yields an empty array.
#[utoipa::path(
    get,
    path = "/api/sensor-data",
    params(
        ("limit" = Option<u32>, Query, description = "Maximum number of rows (default 10)"),
    ),
    responses(
        (status = 200, description = "Most recent readings", body = Vec<SensorReadingDto>),
        (status = 400, description = "Malformed limit parameter"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "sensor-data"
)]
pub async fn get_sensor_data(
    State(pool): State<SqlitePool>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Vec<SensorReadingDto>>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_READINGS_LIMIT);
    let rows = store::list_readings(&pool, limit).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// Fetch the effective system settings (the newest settings row).
#[utoipa::path(
    get,
    path = "/api/settings",
    responses(
        (status = 200, description = "Current settings", body = SystemSettingsDto),
        (status = 500, description = "Internal server error"),
    ),
    tag = "settings"
)]
pub async fn get_settings(
    State(pool): State<SqlitePool>,
) -> Result<Json<SystemSettingsDto>, AppError> {
    let settings = store::latest_settings(&pool).await?;
    Ok(Json(settings.into()))
}

/// Replace the system settings. The full record is required; a new settings
/// row is appended and the previous one becomes history.
#[utoipa::path(
    post,
    path = "/api/settings",
    request_body = SettingsRequest,
    responses(
        (status = 200, description = "Settings stored", body = StatusResponse),
        (status = 400, description = "Malformed request body"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "settings"
)]
pub async fn post_settings(
    State(pool): State<SqlitePool>,
    ApiJson(req): ApiJson<SettingsRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    store::append_settings(
        &pool,
        req.temp_threshold,
        req.moisture_threshold,
        req.light_threshold,
        req.operation_mode,
    )
    .await?;
    Ok(Json(StatusResponse::success()))
}

/// Switch the operation mode. Updates the latest settings row in place, so
/// the settings `id` does not change. Anything outside AUTO/MANUAL/OFF gets
/// a 400 with `{"error":"Invalid mode"}` and no mutation.
#[utoipa::path(
    post,
    path = "/api/mode",
    request_body = ModeRequest,
    responses(
        (status = 200, description = "Mode updated", body = StatusResponse),
        (status = 400, description = "Invalid mode"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "settings"
)]
pub async fn set_mode(
    State(pool): State<SqlitePool>,
    ApiJson(req): ApiJson<ModeRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    let mode: OperationMode = req
        .mode
        .parse()
        .map_err(|_| AppError::Validation("Invalid mode".to_owned()))?;
    store::update_mode(&pool, mode).await?;
    Ok(Json(StatusResponse::success()))
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Returns `200 OK` with `{"status":"ok"}` when the server is running.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
    ),
    tag = "system"
)]
pub async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(post_sensor_data, get_sensor_data, get_settings, post_settings, set_mode, health),
    components(schemas(
        SensorDataRequest,
        SensorReadingDto,
        SettingsRequest,
        SystemSettingsDto,
        ModeRequest,
        StatusResponse,
        OperationMode,
    )),
    tags(
        (name = "sensor-data", description = "Sensor reading ingestion and retrieval"),
        (name = "settings",    description = "System configuration endpoints"),
        (name = "system",      description = "System endpoints"),
    ),
    info(
        title = "IoT Hub API",
        version = "0.1.0",
        description = "Telemetry ingestion and configuration API for IoT devices"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
