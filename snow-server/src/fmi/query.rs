//! Stored-query parameters for each observation variant.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

use crate::domain::{StationId, format_query_time};

/// The three observation series the service can fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Five days of daily snow depth and mean temperature.
    Daily,
    /// The most recent snow depth and temperature reading.
    Latest,
    /// One day of hourly temperature and wind.
    Hourly,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Daily, Variant::Latest, Variant::Hourly];

    /// Stored query identifier understood by the feed.
    pub fn stored_query_id(self) -> &'static str {
        match self {
            Variant::Daily => "fmi::observations::weather::daily::simple",
            Variant::Latest => "fmi::observations::weather::simple",
            Variant::Hourly => "fmi::observations::weather::hourly::simple",
        }
    }

    /// Parameter codes, in the order the feed interleaves them.
    pub fn parameters(self) -> &'static [&'static str] {
        match self {
            Variant::Daily => &["snow", "tday"],
            Variant::Latest => &["snow_aws", "t2m"],
            Variant::Hourly => &["TA_PT1H_AVG", "WS_PT1H_MAX", "WS_PT1H_AVG", "WD_PT1H_AVG"],
        }
    }

    /// Number of consecutive feed elements that make up one time point.
    pub fn window_size(self) -> usize {
        self.parameters().len()
    }

    /// How far back the requested series reaches, if it is a range query.
    pub fn lookback(self) -> Option<Duration> {
        match self {
            Variant::Daily => Some(Duration::days(5)),
            Variant::Latest => None,
            Variant::Hourly => Some(Duration::days(1)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Daily => "daily",
            Variant::Latest => "latest",
            Variant::Hourly => "hourly",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved stored query for one station at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredQuery {
    pub variant: Variant,
    pub station: StationId,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: DateTime<Utc>,
}

impl StoredQuery {
    /// Build the query for `variant` and `station` relative to `now`.
    pub fn new(variant: Variant, station: StationId, now: DateTime<Utc>) -> Self {
        Self {
            variant,
            station,
            start_time: variant.lookback().map(|d| now - d),
            end_time: now,
        }
    }

    /// Query-string pairs for the WFS `getFeature` request.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("service", "WFS".to_string()),
            ("version", "2.0.0".to_string()),
            ("request", "getFeature".to_string()),
            ("storedquery_id", self.variant.stored_query_id().to_string()),
            ("fmisid", self.station.as_str().to_string()),
        ];

        if let Some(start) = self.start_time {
            params.push(("starttime", format_query_time(start)));
        }
        params.push(("endtime", format_query_time(self.end_time)));
        params.push(("parameters", self.variant.parameters().join(",")));

        if self.variant == Variant::Latest {
            params.push(("timestep", "60".to_string()));
            params.push(("maxlocations", "1".to_string()));
        }

        params
    }
}
