//! Server configuration from environment variables.

use std::net::SocketAddr;

use crate::domain::{InvalidStationId, StationId, validate_date_format};
use crate::fmi::FmiConfig;

/// Default listen address.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Stations warmed into the cache at startup unless overridden.
const DEFAULT_PREFETCH_STATIONS: &str = "101885,107081,101950,101914,101990,101987";

/// Errors from reading the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {message}")]
    Invalid { var: &'static str, message: String },

    #[error("invalid station in SNOW_PREFETCH_STATIONS: {0}")]
    Station(#[from] InvalidStationId),
}

/// Runtime configuration for the server binary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (`SNOW_BIND_ADDR`)
    pub bind_addr: SocketAddr,
    /// Feed client settings (`FMI_BASE_URL`, `FMI_TIMEOUT_SECS`,
    /// `FMI_MAX_CONCURRENT`, `SNOW_DATE_FORMAT`)
    pub fmi: FmiConfig,
    /// Stations to fetch at startup (`SNOW_PREFETCH_STATIONS`,
    /// comma-separated; empty disables prefetch)
    pub prefetch_stations: Vec<StationId>,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration using `lookup` to resolve variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr: SocketAddr = lookup("SNOW_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                var: "SNOW_BIND_ADDR",
                message: e.to_string(),
            })?;

        let mut fmi = FmiConfig::default();
        if let Some(url) = lookup("FMI_BASE_URL") {
            fmi = fmi.with_base_url(url);
        }
        if let Some(secs) = lookup("FMI_TIMEOUT_SECS") {
            fmi = fmi.with_timeout(parse_number("FMI_TIMEOUT_SECS", &secs)?);
        }
        if let Some(n) = lookup("FMI_MAX_CONCURRENT") {
            fmi = fmi.with_max_concurrent(parse_number("FMI_MAX_CONCURRENT", &n)?);
        }
        if let Some(format) = lookup("SNOW_DATE_FORMAT") {
            validate_date_format(&format).map_err(|e| ConfigError::Invalid {
                var: "SNOW_DATE_FORMAT",
                message: e.to_string(),
            })?;
            fmi = fmi.with_date_format(format);
        }

        let prefetch_stations = parse_station_list(
            &lookup("SNOW_PREFETCH_STATIONS")
                .unwrap_or_else(|| DEFAULT_PREFETCH_STATIONS.to_string()),
        )?;

        Ok(Self {
            bind_addr,
            fmi,
            prefetch_stations,
        })
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        message: e.to_string(),
    })
}

/// Parse a comma-separated station list, ignoring empty items.
fn parse_station_list(s: &str) -> Result<Vec<StationId>, InvalidStationId> {
    s.split(',')
        .filter(|item| !item.trim().is_empty())
        .map(StationId::parse)
        .collect()
}
