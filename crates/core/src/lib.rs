//! `ethiscan-core`: scan domain values shared by every other crate.
//!
//! This crate contains **pure domain** types (no I/O, no HTTP).

pub mod error;
pub mod id;
pub mod model;

pub use error::{DomainError, DomainResult};
pub use id::ScanId;
pub use model::{
    Barcode, EthicalAssessment, EthicalRating, FoodStatus, ImageUpload, ManufacturerName,
    NutritionInfo, Pipeline, ScanReport, ScanRequest, ScanResult, VisualMatch,
};
