//! Decoded observation records.
//!
//! Measured values are kept as the decimal strings the feed sent. A value
//! the feed left empty is replaced by the variant's sentinel (see
//! [`Sentinels`]), so consumers never see a missing field.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One day of snow depth and mean temperature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyRecord {
    /// Observation timestamp as received (ISO-8601).
    pub time: String,
    /// Display date derived from `time`.
    pub date: String,
    /// Snow depth in centimetres.
    pub snow: String,
    /// Daily mean temperature in °C.
    pub temperature: String,
}

/// The most recent snow depth and temperature reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatestRecord {
    pub snow: String,
    pub temperature: String,
}

/// One hour of temperature and wind observations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyRecord {
    /// Observation timestamp as received (ISO-8601).
    pub time: String,
    /// `time` parsed as a UTC instant.
    pub time_value: DateTime<Utc>,
    /// Hourly mean temperature in °C.
    pub temperature: String,
    /// Hourly mean wind speed in m/s.
    pub wind_speed: String,
    /// Hourly maximum wind speed in m/s.
    pub wind_gust: String,
    /// Hourly mean wind direction in degrees.
    pub wind_direction: String,
}

/// Placeholder values substituted for absent measurements, per variant.
///
/// The defaults reproduce the historical behaviour of the consumers:
/// `"NaN"` for the daily and latest views, an empty string for the hourly
/// chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentinels {
    pub daily: String,
    pub latest: String,
    pub hourly: String,
}

impl Default for Sentinels {
    fn default() -> Self {
        Self {
            daily: "NaN".to_string(),
            latest: "NaN".to_string(),
            hourly: String::new(),
        }
    }
}
