#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use ethiscan_api::app::{build_app, services::AppServices};
use ethiscan_core::Barcode;
use ethiscan_lookup::{LookupConfig, Lookups};
use ethiscan_scan::{DecodeError, ImageDecoder};

pub const KNOWN_BARCODE: &str = "0038000000305";
/// In the nutrition database as clothing; unknown to the product registry.
pub const CLOTHING_BARCODE: &str = "0888000000017";

// ─────────────────────────────────────────────────────────────────────────────
// Fake third-party services
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct Hits {
    pub nutrition: Arc<AtomicUsize>,
    pub manufacturer: Arc<AtomicUsize>,
    pub ethical: Arc<AtomicUsize>,
    pub visual: Arc<AtomicUsize>,
}

impl Hits {
    pub fn total(&self) -> usize {
        self.nutrition.load(Ordering::SeqCst)
            + self.manufacturer.load(Ordering::SeqCst)
            + self.ethical.load(Ordering::SeqCst)
            + self.visual.load(Ordering::SeqCst)
    }
}

pub struct FakeUpstream {
    pub base_url: String,
    pub hits: Hits,
    handle: tokio::task::JoinHandle<()>,
}

impl FakeUpstream {
    pub async fn spawn() -> Self {
        let hits = Hits::default();
        let app = Router::new()
            .route("/api/v0/product/:file", get(off_product))
            .route("/v3/products", get(registry_products))
            .route("/customsearch/v1", get(custom_search))
            .route("/v1/global/search", post(lykdat_search))
            .with_state(hits.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            hits,
            handle,
        }
    }

    /// Every service pointed at this fake, every credential present.
    pub fn config(&self) -> LookupConfig {
        LookupConfig {
            openfoodfacts_base_url: self.base_url.clone(),
            barcode_lookup_base_url: self.base_url.clone(),
            barcode_lookup_api_key: Some("registry-key".into()),
            google_search_base_url: self.base_url.clone(),
            google_api_key: Some("google-key".into()),
            google_cse_id: Some("cse-id".into()),
            lykdat_base_url: self.base_url.clone(),
            lykdat_api_key: Some("lykdat-key".into()),
            ..LookupConfig::default()
        }
    }
}

impl Drop for FakeUpstream {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn off_product(State(hits): State<Hits>, Path(file): Path<String>) -> impl IntoResponse {
    hits.nutrition.fetch_add(1, Ordering::SeqCst);
    if file == format!("{KNOWN_BARCODE}.json") {
        (
            StatusCode::OK,
            Json(json!({
                "status": 1,
                "product": {
                    "product_name": "Cheerios",
                    "brands": "General Mills",
                    "nutriscore_grade": "b"
                }
            })),
        )
    } else if file == format!("{CLOTHING_BARCODE}.json") {
        (
            StatusCode::OK,
            Json(json!({
                "status": 1,
                "product": {
                    "product_name": "Organic cotton tee",
                    "brands": "Patagonia",
                    "categories": "Clothing, T-shirts"
                }
            })),
        )
    } else {
        (StatusCode::NOT_FOUND, Json(json!({ "status": 0 })))
    }
}

async fn registry_products(
    State(hits): State<Hits>,
    Query(q): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    hits.manufacturer.fetch_add(1, Ordering::SeqCst);
    match q.get("barcode").map(String::as_str) {
        Some(KNOWN_BARCODE) => (
            StatusCode::OK,
            Json(json!({ "products": [{ "manufacturer": "General Mills" }] })),
        ),
        _ => (StatusCode::NOT_FOUND, Json(json!({}))),
    }
}

async fn custom_search(
    State(hits): State<Hits>,
    Query(q): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    hits.ethical.fetch_add(1, Ordering::SeqCst);
    let query = q.get("q").cloned().unwrap_or_default();
    if query.starts_with("General Mills") {
        Json(json!({
            "items": [{
                "title": "General Mills rating",
                "link": "https://example.org/gm",
                "snippet": "Scores 6/20 on supply chain management."
            }]
        }))
    } else {
        Json(json!({ "searchInformation": { "totalResults": "0" } }))
    }
}

async fn lykdat_search(State(hits): State<Hits>, mut multipart: Multipart) -> impl IntoResponse {
    hits.visual.fetch_add(1, Ordering::SeqCst);
    let mut image_len = 0usize;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("image") {
            image_len = field.bytes().await.map(|b| b.len()).unwrap_or(0);
        }
    }
    if image_len == 3 {
        return Json(json!({ "results": [] }));
    }
    Json(json!({
        "results": [
            { "title": "Relaxed linen shirt", "brand": "Everlane", "url": "https://shop.example/linen" },
            { "title": "Second best", "brand": "Other" }
        ]
    }))
}

// ─────────────────────────────────────────────────────────────────────────────
// App under test
// ─────────────────────────────────────────────────────────────────────────────

/// Reads the image bytes as the barcode text, so tests don't need real images.
pub struct TextDecoder;

impl ImageDecoder for TextDecoder {
    fn decode(&self, image: &[u8]) -> Result<Barcode, DecodeError> {
        let text = std::str::from_utf8(image).map_err(|e| DecodeError::Image(e.to_string()))?;
        Barcode::parse(text).map_err(|_| DecodeError::NotFound)
    }
}

pub struct TestServer {
    pub base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn(config: &LookupConfig) -> Self {
        let lookups = Lookups::from_config(config).expect("failed to build lookups");
        let services = AppServices::with_parts(Arc::new(TextDecoder), lookups);

        // Same router as prod, bound to an ephemeral port.
        let app = build_app(Arc::new(services));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn image_form(bytes: impl Into<Vec<u8>>) -> reqwest::multipart::Form {
    let part = reqwest::multipart::Part::bytes(bytes.into()).file_name("photo.jpg");
    reqwest::multipart::Form::new().part("image", part)
}
