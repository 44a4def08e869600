//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::domain::{DailyRecord, HourlyRecord, InvalidStationId, LatestRecord, StationId};
use crate::fmi::FmiError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/cache", get(cache_stats))
        .route("/api/stations/:id", get(station_all))
        .route("/api/stations/:id/daily", get(station_daily))
        .route("/api/stations/:id/latest", get(station_latest))
        .route("/api/stations/:id/hourly", get(station_hourly))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Number of cached stations per variant.
async fn cache_stats(State(state): State<AppState>) -> Json<CacheResponse> {
    let stations = state.observations.cache().stats().await;
    Json(CacheResponse { stations })
}

/// Daily snow depth and mean temperature for the last five days.
async fn station_daily(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecordsResponse<DailyRecord>>, AppError> {
    let station = StationId::parse(&id)?;
    let records = state.observations.get_daily(&station).await?;
    Ok(Json(RecordsResponse { station, records }))
}

/// Latest snow depth and temperature.
async fn station_latest(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecordsResponse<LatestRecord>>, AppError> {
    let station = StationId::parse(&id)?;
    let records = state.observations.get_latest(&station).await?;
    Ok(Json(RecordsResponse { station, records }))
}

/// Hourly temperature and wind for the last day.
async fn station_hourly(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecordsResponse<HourlyRecord>>, AppError> {
    let station = StationId::parse(&id)?;
    let records = state.observations.get_hourly(&station).await?;
    Ok(Json(RecordsResponse { station, records }))
}

/// All three series for a station, fetched concurrently.
async fn station_all(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StationResponse>, AppError> {
    let station = StationId::parse(&id)?;
    let observations = &state.observations;

    let (daily, latest, hourly) = futures::try_join!(
        observations.get_daily(&station),
        observations.get_latest(&station),
        observations.get_hourly(&station),
    )?;

    Ok(Json(StationResponse {
        station,
        daily,
        latest,
        hourly,
    }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    BadGateway { message: String },
    Internal { message: String },
}

impl From<InvalidStationId> for AppError {
    fn from(e: InvalidStationId) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<FmiError> for AppError {
    fn from(e: FmiError) -> Self {
        match e {
            FmiError::InvalidConfig(_) => AppError::Internal {
                message: e.to_string(),
            },
            _ => AppError::BadGateway {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(status = status.as_u16(), error = %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
