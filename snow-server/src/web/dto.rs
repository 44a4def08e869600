//! Data transfer objects for web responses.

use serde::Serialize;

use crate::cache::{CacheStats, Records};
use crate::domain::{DailyRecord, HourlyRecord, LatestRecord, StationId};

/// Records of one variant for one station.
#[derive(Debug, Serialize)]
pub struct RecordsResponse<T> {
    /// Station id
    pub station: StationId,

    /// Decoded records, oldest first
    pub records: Records<T>,
}

/// All three variants for one station.
#[derive(Debug, Serialize)]
pub struct StationResponse {
    pub station: StationId,
    pub daily: Records<DailyRecord>,
    pub latest: Records<LatestRecord>,
    pub hourly: Records<HourlyRecord>,
}

/// Cache statistics.
#[derive(Debug, Serialize)]
pub struct CacheResponse {
    /// Number of cached stations per variant
    pub stations: CacheStats,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
