//! Web layer for the observation service.
//!
//! Provides JSON endpoints returning cached station observations.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
