//! Scan endpoints: run a whole pipeline server-side.
//!
//! `/api/scan` answers once with the result and the collected progress log.
//! `/api/scan/events` streams the same log as Server-Sent Events while the scan
//! runs, then sends one `result` or `failure` event.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Extension, Multipart, multipart::MultipartRejection},
    http::StatusCode,
    response::{
        IntoResponse,
        sse::{Event as SseEvent, KeepAlive, Sse},
    },
    Json,
};
use serde::Serialize;
use tokio::sync::mpsc::unbounded_channel;
use tokio_stream::wrappers::UnboundedReceiverStream;

use ethiscan_core::{Pipeline, ScanId, ScanRequest};
use ethiscan_scan::ScanLog;

use crate::app::services::AppServices;
use crate::app::{dto, errors, upload};

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// POST /api/scan
pub async fn scan(
    Extension(services): Extension<Arc<AppServices>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> axum::response::Response {
    let request = match scan_request(multipart).await {
        Ok(r) => r,
        Err(response) => return response,
    };

    let scan_id = ScanId::new();
    let log = ScanLog::new(scan_id);
    let outcome = services.orchestrator.run(request, &log).await;
    let entries = log.into_entries();

    match outcome {
        Ok(result) => (
            StatusCode::OK,
            Json(dto::ScanResponse {
                scan_id,
                result,
                log: entries,
            }),
        )
            .into_response(),
        Err(failure) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(dto::ScanFailureResponse::new(scan_id, &failure, entries)),
        )
            .into_response(),
    }
}

/// POST /api/scan/events
///
/// Events:
/// - `log`: one per progress entry, `{at, message}`
/// - `result`: final `{scanId, result}`
/// - `failure`: final `{scanId, error, code}`
pub async fn scan_events(
    Extension(services): Extension<Arc<AppServices>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> axum::response::Response {
    // The body has to be consumed before the response starts streaming.
    let request = match scan_request(multipart).await {
        Ok(r) => r,
        Err(response) => return response,
    };

    let scan_id = ScanId::new();
    let (tx, rx) = unbounded_channel::<Result<SseEvent, Infallible>>();

    tokio::spawn(async move {
        let (log, mut entries) = ScanLog::with_subscriber(scan_id);

        let log_tx = tx.clone();
        let forward = tokio::spawn(async move {
            while let Some(entry) = entries.recv().await {
                if log_tx.send(Ok(json_event("log", &entry))).is_err() {
                    break; // client went away; the scan still finishes
                }
            }
        });

        let outcome = services.orchestrator.run(request, &log).await;

        // Closing the log ends the forwarder once it has drained every entry,
        // so the final event is always last.
        drop(log);
        if let Err(e) = forward.await {
            tracing::warn!(scan_id = %scan_id, error = %e, "sse log forwarder failed");
        }

        let last = match outcome {
            Ok(result) => json_event("result", &FinalResult { scan_id, result }),
            Err(failure) => json_event(
                "failure",
                &FinalFailure {
                    scan_id,
                    error: failure.to_string(),
                    code: failure.code(),
                },
            ),
        };
        let _ = tx.send(Ok(last));
    });

    Sse::new(UnboundedReceiverStream::new(rx))
        .keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
        .into_response()
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FinalResult {
    scan_id: ScanId,
    result: ethiscan_core::ScanReport,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FinalFailure {
    scan_id: ScanId,
    error: String,
    code: &'static str,
}

fn json_event<T: Serialize>(name: &'static str, payload: &T) -> SseEvent {
    let data = serde_json::to_string(payload).unwrap_or_else(|e| {
        tracing::warn!(error = %e, event = name, "failed to serialize sse payload");
        "{}".to_string()
    });
    SseEvent::default().event(name).data(data)
}

async fn scan_request(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ScanRequest, axum::response::Response> {
    let multipart = multipart
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "Error parsing form data"))?;
    let form = upload::read_form(multipart).await.map_err(|e| {
        tracing::debug!(error = %e, "unreadable upload");
        errors::json_error(StatusCode::BAD_REQUEST, "Error parsing form data")
    })?;

    let image = form
        .image
        .ok_or_else(|| errors::json_error(StatusCode::BAD_REQUEST, "No image uploaded"))?;
    let pipeline = match form.pipeline.as_deref() {
        None => Pipeline::default(),
        Some(raw) if raw.trim().is_empty() => Pipeline::default(),
        Some(raw) => raw
            .parse::<Pipeline>()
            .map_err(|e| errors::json_error(StatusCode::BAD_REQUEST, e.to_string()))?,
    };

    Ok(ScanRequest::new(image, pipeline))
}
