//! FMI open-data observation feed client.
//!
//! This module provides an HTTP client for the Finnish Meteorological
//! Institute WFS service, which serves station observations as XML.
//!
//! Key characteristics of the feed:
//! - Every query is a named "stored query" selected by `storedquery_id`
//! - Responses are a flat list of (time, parameter, value) elements,
//!   interleaved in the order the parameters were requested
//! - Missing measurements show up as empty value elements, not as
//!   missing elements

mod client;
mod decode;
mod error;
mod query;

pub use client::{FmiClient, FmiConfig};
pub use decode::{
    FeatureElement, decode_daily, decode_hourly, decode_latest, decode_windows, parse_elements,
};
pub use error::FmiError;
pub use query::{StoredQuery, Variant};
