use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use ethiscan_lookup::LookupError;

/// `{ "error": message }` with the given status.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": message.into(),
        })),
    )
        .into_response()
}

/// Map an adapter fault to a relay response.
///
/// Configuration faults get `config_message`; everything upstream gets
/// `upstream_message`. Both are server errors: the caller did nothing wrong.
pub fn lookup_error_to_response(
    err: &LookupError,
    relay: &'static str,
    config_message: &str,
    upstream_message: &str,
) -> axum::response::Response {
    if err.is_configuration() {
        tracing::error!(relay, error = %err, "relay misconfigured");
        json_error(StatusCode::INTERNAL_SERVER_ERROR, config_message)
    } else {
        tracing::error!(relay, error = %err, "upstream lookup failed");
        json_error(StatusCode::INTERNAL_SERVER_ERROR, upstream_message)
    }
}
