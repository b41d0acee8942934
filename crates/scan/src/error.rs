use thiserror::Error;

/// Terminal pipeline failure.
///
/// These are the only outcomes that abort a scan; every other lookup problem
/// degrades to an absent field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScanFailure {
    #[error("no barcode detected")]
    NoBarcodeDetected,

    #[error("no results found")]
    NoVisualResults,

    #[error("visual search failed: {0}")]
    VisualSearchFailed(String),
}

impl ScanFailure {
    /// Stable machine-readable code for API payloads.
    pub fn code(&self) -> &'static str {
        match self {
            ScanFailure::NoBarcodeDetected => "no_barcode_detected",
            ScanFailure::NoVisualResults => "no_visual_results",
            ScanFailure::VisualSearchFailed(_) => "visual_search_failed",
        }
    }
}
