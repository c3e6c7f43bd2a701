use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Operation mode of the connected device. Stored as TEXT in
/// `system_settings.operation_mode` and carried verbatim on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationMode {
    Auto,
    Manual,
    Off,
}

impl FromStr for OperationMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "AUTO" => Ok(Self::Auto),
            "MANUAL" => Ok(Self::Manual),
            "OFF" => Ok(Self::Off),
            other => Err(anyhow::anyhow!("unknown operation mode: {other:?}")),
        }
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OperationMode::Auto => "AUTO",
            OperationMode::Manual => "MANUAL",
            OperationMode::Off => "OFF",
        };
        f.write_str(s)
    }
}

/// One row of `sensor_data`. Every measurement column is nullable because a
/// device reports whichever sensors it actually has.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SensorReading {
    pub id: i64,
    /// Degrees Celsius
    pub temperature: Option<f64>,
    /// Relative humidity percentage
    pub humidity: Option<f64>,
    /// Raw light sensor level
    pub light_level: Option<i64>,
    pub timestamp: DateTime<Utc>,
}

/// One row of `system_settings`. The effective configuration is the row with
/// the highest `id`; older rows are kept as history.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SystemSettings {
    pub id: i64,
    /// Degrees Celsius
    pub temp_threshold: f64,
    pub moisture_threshold: i64,
    pub light_threshold: i64,
    pub operation_mode: OperationMode,
    pub last_updated: DateTime<Utc>,
}
