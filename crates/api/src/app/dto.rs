use serde::{Deserialize, Serialize};

use ethiscan_core::{EthicalRating, ManufacturerName, ScanId, ScanReport, VisualMatch};
use ethiscan_scan::{ScanFailure, ScanLogEntry};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct BarcodeLookupRequest {
    #[serde(default)]
    pub barcode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EthicalSearchRequest {
    #[serde(default)]
    pub brand: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct BarcodeLookupResponse {
    pub manufacturer: Option<ManufacturerName>,
}

/// Both fields are `null` when nothing matched.
#[derive(Debug, Default, Serialize)]
pub struct EthicalSearchResponse {
    pub title: Option<String>,
    pub url: Option<String>,
}

impl From<Option<EthicalRating>> for EthicalSearchResponse {
    fn from(value: Option<EthicalRating>) -> Self {
        match value {
            Some(r) => Self {
                title: Some(r.title),
                url: Some(r.url),
            },
            None => Self::default(),
        }
    }
}

/// At most one element: the first match.
#[derive(Debug, Serialize)]
pub struct VisualSearchResponse {
    pub results: Vec<VisualMatch>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    pub scan_id: ScanId,
    pub result: ScanReport,
    pub log: Vec<ScanLogEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanFailureResponse {
    pub scan_id: ScanId,
    pub error: String,
    pub code: &'static str,
    pub log: Vec<ScanLogEntry>,
}

impl ScanFailureResponse {
    pub fn new(scan_id: ScanId, failure: &ScanFailure, log: Vec<ScanLogEntry>) -> Self {
        Self {
            scan_id,
            error: failure.to_string(),
            code: failure.code(),
            log,
        }
    }
}
