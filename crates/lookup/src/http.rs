//! Shared outbound HTTP plumbing.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::LookupConfig;
use crate::error::LookupError;

pub const USER_AGENT: &str = concat!("ethiscan/", env!("CARGO_PKG_VERSION"));

/// Build the client every adapter shares (connection pool + timeout).
pub fn build_client(config: &LookupConfig) -> Result<reqwest::Client, LookupError> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(config.timeout)
        .build()?;
    Ok(client)
}

/// Join a configured base URL and a path without doubling slashes.
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Fail with [`LookupError::UpstreamStatus`] unless the response is a 2xx.
pub fn ensure_success(response: Response) -> Result<Response, LookupError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(LookupError::UpstreamStatus(status.as_u16()))
    }
}

/// Decode a JSON body, separating malformed payloads from transport faults.
pub async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, LookupError> {
    response.json::<T>().await.map_err(|e| {
        if e.is_decode() {
            LookupError::Parse(e.to_string())
        } else {
            LookupError::Transport(e)
        }
    })
}

pub fn is_not_found(status: StatusCode) -> bool {
    status == StatusCode::NOT_FOUND
}

/// Blank upstream strings mean absent. Kept values are passed through as-is.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
