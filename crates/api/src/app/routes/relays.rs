//! Request relays: forward one payload to a third-party API with the
//! server-held credential, and hand back a narrow projection of the answer.

use std::sync::Arc;

use axum::{
    extract::{
        Extension, Multipart,
        multipart::MultipartRejection,
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use ethiscan_core::{Barcode, ManufacturerName};
use ethiscan_lookup::config::LYKDAT_API_KEY;

use crate::app::services::AppServices;
use crate::app::{dto, errors, upload};

/// POST /api/barcode-lookup
///
/// `{barcode}` -> `{manufacturer}` (`null` when the registry has no name).
pub async fn barcode_lookup(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::BarcodeLookupRequest>, JsonRejection>,
) -> axum::response::Response {
    let Ok(Json(body)) = body else {
        return errors::json_error(StatusCode::BAD_REQUEST, "Invalid request body");
    };
    let Some(barcode) = body.barcode.and_then(|b| Barcode::parse(b).ok()) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "Barcode is required");
    };

    match services.lookups.manufacturer.manufacturer(&barcode).await {
        Ok(manufacturer) => (
            StatusCode::OK,
            Json(dto::BarcodeLookupResponse { manufacturer }),
        )
            .into_response(),
        Err(e) => errors::lookup_error_to_response(
            &e,
            "barcode-lookup",
            "API key not configured",
            "Failed to lookup barcode",
        ),
    }
}

/// POST /api/ethical-search
///
/// `{brand}` -> `{title, url}`; both `null` on no match.
pub async fn ethical_search(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::EthicalSearchRequest>, JsonRejection>,
) -> axum::response::Response {
    let Ok(Json(body)) = body else {
        return errors::json_error(StatusCode::BAD_REQUEST, "Invalid request body");
    };
    let Some(brand) = body.brand.and_then(ManufacturerName::new) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "Brand is required");
    };

    match services.lookups.ethical.ethical_rating(&brand).await {
        Ok(rating) => (
            StatusCode::OK,
            Json(dto::EthicalSearchResponse::from(rating)),
        )
            .into_response(),
        Err(e) => errors::lookup_error_to_response(
            &e,
            "ethical-search",
            "Search API key not configured",
            "Failed to search ethical ratings",
        ),
    }
}

/// POST /api/lykdat-search
///
/// multipart `image` -> `{results: [first match]}` or `{results: []}`.
pub async fn lykdat_search(
    Extension(services): Extension<Arc<AppServices>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> axum::response::Response {
    let Ok(multipart) = multipart else {
        return errors::json_error(StatusCode::BAD_REQUEST, "Error parsing form data");
    };
    let form = match upload::read_form(multipart).await {
        Ok(form) => form,
        Err(e) => {
            tracing::debug!(error = %e, "unreadable upload");
            return errors::json_error(StatusCode::BAD_REQUEST, "Error parsing form data");
        }
    };
    let Some(image) = form.image else {
        return errors::json_error(StatusCode::BAD_REQUEST, "No image uploaded");
    };

    match services.lookups.visual.visual_search(&image).await {
        Ok(first) => (
            StatusCode::OK,
            Json(dto::VisualSearchResponse {
                results: first.into_iter().collect(),
            }),
        )
            .into_response(),
        Err(e) => errors::lookup_error_to_response(
            &e,
            "lykdat-search",
            &format!("{LYKDAT_API_KEY} not set"),
            "Failed to search image",
        ),
    }
}
