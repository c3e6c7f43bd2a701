use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::models::{OperationMode, SensorReading, SystemSettings};

/// Request body for `POST /api/sensor-data`. Every measurement is optional;
/// a device reports whichever sensors it has.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SensorDataRequest {
    /// Degrees Celsius
    pub temperature: Option<f64>,
    /// Relative humidity percentage
    pub humidity: Option<f64>,
    /// Raw light sensor level
    pub light_level: Option<i64>,
}

/// Request body for `POST /api/settings`. Full-record replace: every field
/// is required and a new settings row is appended.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SettingsRequest {
    /// Degrees Celsius
    pub temp_threshold: f64,
    pub moisture_threshold: i64,
    pub light_threshold: i64,
    pub operation_mode: OperationMode,
}

/// Request body for `POST /api/mode`. The mode string is validated by the
/// handler so an unknown value gets the documented `Invalid mode` reply.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ModeRequest {
    pub mode: String,
}

/// Body returned by every successful POST.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self {
            status: "success".to_owned(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SensorReadingDto {
    pub id: i64,
    /// Degrees Celsius
    pub temperature: Option<f64>,
    /// Relative humidity percentage
    pub humidity: Option<f64>,
    pub light_level: Option<i64>,
    pub timestamp: DateTime<Utc>,
}

impl From<SensorReading> for SensorReadingDto {
    fn from(r: SensorReading) -> Self {
        Self {
            id: r.id,
            temperature: r.temperature,
            humidity: r.humidity,
            light_level: r.light_level,
            timestamp: r.timestamp,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SystemSettingsDto {
    pub id: i64,
    /// Degrees Celsius
    pub temp_threshold: f64,
    pub moisture_threshold: i64,
    pub light_threshold: i64,
    pub operation_mode: OperationMode,
    pub last_updated: DateTime<Utc>,
}

impl From<SystemSettings> for SystemSettingsDto {
    fn from(s: SystemSettings) -> Self {
        Self {
            id: s.id,
            temp_threshold: s.temp_threshold,
            moisture_threshold: s.moisture_threshold,
            light_threshold: s.light_threshold,
            operation_mode: s.operation_mode,
            last_updated: s.last_updated,
        }
    }
}
