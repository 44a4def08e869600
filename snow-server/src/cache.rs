//! Per-station caching of decoded observations.
//!
//! Each variant has its own cache keyed by station id. Entries are kept for
//! the lifetime of the process: there is no TTL, no capacity bound and no
//! invalidation, so the first successful fetch for a station is what every
//! later caller sees.
//!
//! Concurrent requests for the same uncached station are coalesced: the
//! first caller performs the fetch and the others wait for its result.
//! Failed fetches are not cached.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use moka::future::Cache as MokaCache;
use serde::Serialize;
use tracing::{debug, trace};

use crate::domain::{DailyRecord, HourlyRecord, LatestRecord, StationId};
use crate::fmi::{FmiClient, FmiError, Variant};

/// Cached record list for one station.
pub type Records<T> = Arc<Vec<T>>;

/// Append-only map from station id to decoded records.
pub struct StationCache<T> {
    entries: MokaCache<StationId, Records<T>>,
}

impl<T> StationCache<T>
where
    T: Send + Sync + 'static,
{
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: MokaCache::builder().build(),
        }
    }

    /// Get the cached records for a station.
    pub async fn get(&self, station: &StationId) -> Option<Records<T>> {
        self.entries.get(station).await
    }

    /// Store records for a station.
    ///
    /// An existing entry is never replaced; returns `false` if the station
    /// was already cached and `records` was discarded.
    pub async fn put(&self, station: StationId, records: Records<T>) -> bool {
        let entry = self.entries.entry(station).or_insert(records).await;
        if !entry.is_fresh() {
            debug!(station = %entry.key(), "ignoring put for already cached station");
        }
        entry.is_fresh()
    }

    /// Whether a station has an entry.
    pub fn contains(&self, station: &StationId) -> bool {
        self.entries.contains_key(station)
    }

    /// Get the cached records, or run `fetch` to produce them.
    ///
    /// At most one `fetch` runs per station at a time; concurrent callers
    /// for the same station share its outcome. An error is returned to all
    /// waiting callers and nothing is stored.
    pub async fn get_or_fetch<F>(
        &self,
        station: &StationId,
        fetch: F,
    ) -> Result<Records<T>, FmiError>
    where
        F: Future<Output = Result<Vec<T>, FmiError>>,
    {
        // moka has its own hit path; this check exists for the trace line
        if let Some(records) = self.get(station).await {
            trace!(station = %station, "cache hit");
            return Ok(records);
        }

        self.entries
            .try_get_with_by_ref(station, async move { fetch.await.map(Arc::new) })
            .await
            .map_err(|e| (*e).clone())
    }

    /// Number of cached stations.
    pub async fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}

impl<T> Default for StationCache<T>
where
    T: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Number of cached stations per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub daily: u64,
    pub latest: u64,
    pub hourly: u64,
}

/// The three per-variant caches.
///
/// Constructed once at startup and owned by [`CachedFmiClient`]; tests
/// build their own to stay isolated.
#[derive(Default)]
pub struct ObservationCache {
    pub daily: StationCache<DailyRecord>,
    pub latest: StationCache<LatestRecord>,
    pub hourly: StationCache<HourlyRecord>,
}

impl ObservationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get cache statistics (for monitoring).
    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            daily: self.daily.entry_count().await,
            latest: self.latest.entry_count().await,
            hourly: self.hourly.entry_count().await,
        }
    }
}

/// Feed client with per-station caching.
///
/// This is the entry point for consumers: one method per observation
/// variant, each taking a station id and returning the shared record list.
pub struct CachedFmiClient {
    client: FmiClient,
    cache: ObservationCache,
}

impl CachedFmiClient {
    /// Create a new cached client around an existing cache.
    pub fn new(client: FmiClient, cache: ObservationCache) -> Self {
        Self { client, cache }
    }

    /// Five days of daily snow depth and mean temperature.
    pub async fn get_daily(
        &self,
        station: &StationId,
    ) -> Result<Records<DailyRecord>, FmiError> {
        let fetch = self.fetch(Variant::Daily, station, |c, s, now| async move {
            c.get_daily(&s, now).await
        });
        self.cache.daily.get_or_fetch(station, fetch).await
    }

    /// The most recent snow depth and temperature reading.
    pub async fn get_latest(
        &self,
        station: &StationId,
    ) -> Result<Records<LatestRecord>, FmiError> {
        let fetch = self.fetch(Variant::Latest, station, |c, s, now| async move {
            c.get_latest(&s, now).await
        });
        self.cache.latest.get_or_fetch(station, fetch).await
    }

    /// One day of hourly temperature and wind.
    pub async fn get_hourly(
        &self,
        station: &StationId,
    ) -> Result<Records<HourlyRecord>, FmiError> {
        let fetch = self.fetch(Variant::Hourly, station, |c, s, now| async move {
            c.get_hourly(&s, now).await
        });
        self.cache.hourly.get_or_fetch(station, fetch).await
    }

    /// Wrap a client call with logging. The returned future does nothing
    /// until the cache decides it needs to run.
    fn fetch<T, F, Fut>(
        &self,
        variant: Variant,
        station: &StationId,
        call: F,
    ) -> impl Future<Output = Result<Vec<T>, FmiError>>
    where
        F: FnOnce(FmiClient, StationId, chrono::DateTime<Utc>) -> Fut,
        Fut: Future<Output = Result<Vec<T>, FmiError>>,
    {
        let client = self.client.clone();
        let station = station.clone();
        async move {
            debug!(station = %station, variant = %variant, "cache miss, fetching");
            let result = call(client, station.clone(), Utc::now()).await;
            match &result {
                Ok(records) => {
                    debug!(
                        station = %station,
                        variant = %variant,
                        records = records.len(),
                        "cached observations"
                    );
                }
                Err(e) => {
                    debug!(station = %station, variant = %variant, error = %e, "fetch failed");
                }
            }
            result
        }
    }

    /// Access the cache.
    pub fn cache(&self) -> &ObservationCache {
        &self.cache
    }
}
