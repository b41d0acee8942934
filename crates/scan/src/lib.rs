//! `ethiscan-scan`
//!
//! **Responsibility:** turn one uploaded image into one scan report.
//!
//! - `decoder`: image bytes -> barcode (CPU-bound, run on the blocking pool)
//! - `log`: ordered, append-only progress messages for one run
//! - `orchestrator`: the grocery and garment pipelines

pub mod decoder;
pub mod error;
pub mod log;
pub mod orchestrator;

pub use decoder::{DecodeError, ImageDecoder, RxingDecoder};
pub use error::ScanFailure;
pub use log::{ScanLog, ScanLogEntry};
pub use orchestrator::Orchestrator;
