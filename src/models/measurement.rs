use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One growth measurement, including the z-score fields the backend
/// derives against the WHO standards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Measurement {
    pub id: String,
    pub child_id: String,
    /// Measurement date (YYYY-MM-DD)
    pub measurement_date: NaiveDate,
    /// Weight in kg
    pub weight: f64,
    /// Height in cm
    pub height: f64,
    /// Head circumference in cm, optional
    #[serde(default)]
    pub head_circumference: Option<f64>,
    #[serde(default)]
    pub age_in_days: i64,
    #[serde(default)]
    pub age_in_months: i32,
    #[serde(default)]
    pub weight_for_age_zscore: Option<f64>,
    #[serde(default)]
    pub height_for_age_zscore: Option<f64>,
    #[serde(default)]
    pub weight_status: Option<String>,
    #[serde(default)]
    pub height_status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Create/full-update payload for a measurement.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct MeasurementPayload {
    pub measurement_date: NaiveDate,
    pub weight: f64,
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_circumference: Option<f64>,
}
