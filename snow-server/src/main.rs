use std::process::ExitCode;

use futures::future::join_all;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use snow_server::cache::{CachedFmiClient, ObservationCache};
use snow_server::config::ServerConfig;
use snow_server::domain::StationId;
use snow_server::fmi::FmiClient;
use snow_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("snow_server=info,tower_http=info")),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let client = match FmiClient::new(config.fmi.clone()) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to create feed client");
            return ExitCode::FAILURE;
        }
    };

    let state = AppState::new(CachedFmiClient::new(client, ObservationCache::new()));

    // Warm the cache in the background so startup isn't blocked on the feed
    if !config.prefetch_stations.is_empty() {
        let prefetch_state = state.clone();
        let stations = config.prefetch_stations.clone();
        tokio::spawn(async move { prefetch(&prefetch_state, &stations).await });
    }

    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.bind_addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    info!(addr = %config.bind_addr, feed = %config.fmi.base_url, "snow server listening");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Fetch every variant for each station, logging failures.
async fn prefetch(state: &AppState, stations: &[StationId]) {
    let observations = &state.observations;

    let results = join_all(stations.iter().map(|station| async move {
        let result = futures::try_join!(
            observations.get_daily(station),
            observations.get_latest(station),
            observations.get_hourly(station),
        );
        (station, result)
    }))
    .await;

    let mut loaded = 0;
    for (station, result) in results {
        match result {
            Ok(_) => loaded += 1,
            Err(e) => warn!(station = %station, error = %e, "prefetch failed"),
        }
    }

    info!(loaded, total = stations.len(), "prefetched station observations");
}
