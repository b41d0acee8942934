//! HTTP API: relays to the lookup services and the scan endpoints.

pub mod app;
pub mod config;
