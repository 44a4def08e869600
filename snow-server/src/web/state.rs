//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedFmiClient;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Cached observation feed client
    pub observations: Arc<CachedFmiClient>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(observations: CachedFmiClient) -> Self {
        Self {
            observations: Arc::new(observations),
        }
    }
}
