//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: lookup clients + orchestrator shared by every handler
//! - `routes/`: HTTP routes + handlers (relays, scan, system)
//! - `dto.rs`: request/response DTOs
//! - `upload.rs`: multipart form parsing
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;
pub mod upload;

use services::AppServices;

/// Largest accepted image upload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api", routes::router())
        .layer(Extension(services))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
