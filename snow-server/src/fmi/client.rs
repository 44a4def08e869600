//! FMI open-data WFS client.
//!
//! Issues stored-query requests and decodes the responses into records.
//! The client itself keeps no state between calls; see
//! [`crate::cache::CachedFmiClient`] for the caching layer.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::{
    DEFAULT_DATE_FORMAT, DailyRecord, HourlyRecord, LatestRecord, Sentinels, StationId,
    validate_date_format,
};

use super::decode::{FeatureElement, decode_daily, decode_hourly, decode_latest, parse_elements};
use super::error::FmiError;
use super::query::{StoredQuery, Variant};

/// Default WFS endpoint of the FMI open-data service.
const DEFAULT_BASE_URL: &str = "https://opendata.fmi.fi/wfs";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the feed client.
#[derive(Debug, Clone)]
pub struct FmiConfig {
    /// WFS endpoint URL (defaults to the public FMI service)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Placeholders for absent values, per variant
    pub sentinels: Sentinels,
    /// `chrono` format string for [`DailyRecord::date`]
    pub date_format: String,
}

impl FmiConfig {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_sentinels(mut self, sentinels: Sentinels) -> Self {
        self.sentinels = sentinels;
        self
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }
}

impl Default for FmiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            sentinels: Sentinels::default(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// FMI observation feed client.
///
/// Uses a semaphore to limit concurrent requests to the public service.
#[derive(Debug, Clone)]
pub struct FmiClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
    sentinels: Sentinels,
    date_format: String,
}

impl FmiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: FmiConfig) -> Result<Self, FmiError> {
        if config.max_concurrent == 0 {
            return Err(FmiError::InvalidConfig(
                "max_concurrent must be at least 1".to_string(),
            ));
        }
        validate_date_format(&config.date_format)
            .map_err(|e| FmiError::InvalidConfig(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FmiError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
            sentinels: config.sentinels,
            date_format: config.date_format,
        })
    }

    /// Get five days of daily snow depth and mean temperature, ending at `now`.
    pub async fn get_daily(
        &self,
        station: &StationId,
        now: DateTime<Utc>,
    ) -> Result<Vec<DailyRecord>, FmiError> {
        let query = StoredQuery::new(Variant::Daily, station.clone(), now);
        let elements = self.fetch_elements(&query).await?;
        decode_daily(&elements, &self.sentinels.daily, &self.date_format)
    }

    /// Get the most recent snow depth and temperature reading.
    ///
    /// Returns exactly one record on success.
    pub async fn get_latest(
        &self,
        station: &StationId,
        now: DateTime<Utc>,
    ) -> Result<Vec<LatestRecord>, FmiError> {
        let query = StoredQuery::new(Variant::Latest, station.clone(), now);
        let elements = self.fetch_elements(&query).await?;
        decode_latest(&elements, &self.sentinels.latest)
    }

    /// Get one day of hourly temperature and wind, ending at `now`.
    pub async fn get_hourly(
        &self,
        station: &StationId,
        now: DateTime<Utc>,
    ) -> Result<Vec<HourlyRecord>, FmiError> {
        let query = StoredQuery::new(Variant::Hourly, station.clone(), now);
        let elements = self.fetch_elements(&query).await?;
        decode_hourly(&elements, &self.sentinels.hourly)
    }

    /// Run a stored query and return the raw observation elements.
    pub async fn fetch_elements(
        &self,
        query: &StoredQuery,
    ) -> Result<Vec<FeatureElement>, FmiError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| FmiError::Transport {
                message: "request limiter closed".to_string(),
            })?;

        debug!(
            station = %query.station,
            variant = %query.variant,
            "requesting observations"
        );

        let response = self
            .http
            .get(&self.base_url)
            .query(&query.params())
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                station = %query.station,
                variant = %query.variant,
                status = status.as_u16(),
                "feed returned error status"
            );
            return Err(FmiError::api(status.as_u16(), &body));
        }

        let body = response.text().await?;
        let elements = parse_elements(&body)?;

        debug!(
            station = %query.station,
            variant = %query.variant,
            elements = elements.len(),
            "received observations"
        );

        Ok(elements)
    }
}
