//! Snow and weather observation server.
//!
//! Fetches snow depth, temperature and wind observations for FMI ground
//! stations, caches them per station for the lifetime of the process,
//! and serves them as JSON.

pub mod cache;
pub mod config;
pub mod domain;
pub mod fmi;
pub mod web;
