use axum::{routing::post, Router};

pub mod relays;
pub mod scan;
pub mod system;

/// Router for everything under `/api`.
pub fn router() -> Router {
    Router::new()
        .route("/barcode-lookup", post(relays::barcode_lookup))
        .route("/ethical-search", post(relays::ethical_search))
        .route("/lykdat-search", post(relays::lykdat_search))
        .route("/scan", post(scan::scan))
        .route("/scan/events", post(scan::scan_events))
}
