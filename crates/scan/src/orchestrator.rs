//! Scan orchestration.
//!
//! Grocery pipeline, as a dependency-ordered task graph:
//!
//! ```text
//! decode ──► nutrition ─┐
//!        └─► manufacturer ─┴─► ethical rating (only if a manufacturer was found)
//!                          └─► local assessment (brand ratings, food labels)
//! ```
//!
//! Only the decode edge is fatal. Every lookup fault downgrades to an absent
//! field and is recorded in the [`ScanLog`].
//!
//! Garment pipeline: a single visual-search step; no match or a failed search
//! is fatal because there is nothing else to report.

use std::sync::Arc;

use tracing::Instrument;

use ethiscan_core::{
    Barcode, EthicalAssessment, EthicalRating, ImageUpload, ManufacturerName, NutritionInfo, Pipeline, ScanReport,
    ScanRequest, ScanResult, VisualMatch,
};
use ethiscan_lookup::Lookups;

use crate::decoder::{DecodeError, ImageDecoder};
use crate::error::ScanFailure;
use crate::log::ScanLog;

#[derive(Clone)]
pub struct Orchestrator {
    decoder: Arc<dyn ImageDecoder>,
    lookups: Lookups,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator").finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub fn new(decoder: Arc<dyn ImageDecoder>, lookups: Lookups) -> Self {
        Self { decoder, lookups }
    }

    /// Run one scan to completion.
    ///
    /// Progress goes to `log`; a terminal failure is also logged as `Error: ..`.
    pub async fn run(&self, request: ScanRequest, log: &ScanLog) -> Result<ScanReport, ScanFailure> {
        let span = tracing::info_span!(
            "scan",
            scan_id = %log.scan_id(),
            pipeline = %request.pipeline,
            image_bytes = request.image.len(),
        );

        async move {
            let outcome = match request.pipeline {
                Pipeline::Grocery => self.grocery(request.image, log).await.map(ScanReport::Grocery),
                Pipeline::Garment => self.garment(&request.image, log).await.map(ScanReport::Garment),
            };
            if let Err(failure) = &outcome {
                tracing::info!(code = failure.code(), "scan failed");
                log.push(format!("Error: {failure}"));
            }
            outcome
        }
        .instrument(span)
        .await
    }

    async fn grocery(&self, image: ImageUpload, log: &ScanLog) -> Result<ScanResult, ScanFailure> {
        log.push("Starting barcode scan...");

        let barcode = self.decode_stage(image, log).await?;
        let (nutrition, manufacturer) = self.lookup_stage(&barcode, log).await;
        let assessment = self.assessment_stage(nutrition.as_ref(), manufacturer.as_ref(), log);
        let ethical = self.ethical_stage(manufacturer.as_ref(), log).await;

        log.push("Scan complete!");
        Ok(ScanResult::new(barcode, nutrition, manufacturer, ethical)
            .with_ethical_assessment(assessment))
    }

    /// decode: image -> barcode. Any decoder failure ends the run.
    pub async fn decode_stage(&self, image: ImageUpload, log: &ScanLog) -> Result<Barcode, ScanFailure> {
        log.push("Decoding barcode from image...");

        let decoder = self.decoder.clone();
        let outcome = tokio::task::spawn_blocking(move || decoder.decode(&image.bytes)).await;

        match outcome {
            Ok(Ok(barcode)) => {
                log.push(format!("Barcode detected: {barcode}"));
                Ok(barcode)
            }
            Ok(Err(DecodeError::NotFound)) => {
                log.push("No barcode found in image");
                Err(ScanFailure::NoBarcodeDetected)
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "decoder failed");
                log.push(format!("Error decoding: {e}"));
                Err(ScanFailure::NoBarcodeDetected)
            }
            Err(join) => {
                tracing::error!(error = %join, "decoder task panicked");
                log.push(format!("Error decoding: {join}"));
                Err(ScanFailure::NoBarcodeDetected)
            }
        }
    }

    /// barcode -> {nutrition, manufacturer}. The two lookups are independent and
    /// run concurrently; both finish before this returns.
    pub async fn lookup_stage(
        &self,
        barcode: &Barcode,
        log: &ScanLog,
    ) -> (Option<NutritionInfo>, Option<ManufacturerName>) {
        tokio::join!(self.nutrition(barcode, log), self.manufacturer(barcode, log))
    }

    /// {nutrition, manufacturer} -> local assessment. In-process and infallible.
    pub fn assessment_stage(
        &self,
        nutrition: Option<&NutritionInfo>,
        manufacturer: Option<&ManufacturerName>,
        log: &ScanLog,
    ) -> Option<EthicalAssessment> {
        let assessment = self.lookups.brand_ratings.assess(nutrition, manufacturer);
        if let Some(a) = &assessment {
            log.push(format!("Ethical assessment: {a}"));
        }
        assessment
    }

    /// manufacturer -> ethical rating. Skipped when there is no manufacturer.
    pub async fn ethical_stage(
        &self,
        manufacturer: Option<&ManufacturerName>,
        log: &ScanLog,
    ) -> Option<EthicalRating> {
        let Some(manufacturer) = manufacturer else {
            log.push("Skipping ethical rating search: no manufacturer");
            return None;
        };

        log.push(format!("Searching ethical ratings for: {manufacturer}"));
        match self.lookups.ethical.ethical_rating(manufacturer).await {
            Ok(Some(rating)) => {
                log.push(format!("Ethical rating found: {}", rating.title));
                Some(rating)
            }
            Ok(None) => {
                log.push("No ethical ratings found");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "ethical rating lookup failed");
                log.push(format!("Ethical rating error: {e}"));
                None
            }
        }
    }

    async fn nutrition(&self, barcode: &Barcode, log: &ScanLog) -> Option<NutritionInfo> {
        log.push("Fetching OpenFoodFacts data...");
        match self.lookups.nutrition.nutrition(barcode).await {
            Ok(Some(info)) => {
                log.push("OpenFoodFacts data retrieved");
                Some(info)
            }
            Ok(None) => {
                log.push("No OpenFoodFacts data found");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "nutrition lookup failed");
                log.push(format!("OpenFoodFacts error: {e}"));
                None
            }
        }
    }

    async fn manufacturer(&self, barcode: &Barcode, log: &ScanLog) -> Option<ManufacturerName> {
        log.push("Looking up manufacturer...");
        match self.lookups.manufacturer.manufacturer(barcode).await {
            Ok(Some(name)) => {
                log.push(format!("Manufacturer found: {name}"));
                Some(name)
            }
            Ok(None) => {
                log.push("No manufacturer data available");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "manufacturer lookup failed");
                log.push(format!("Manufacturer lookup error: {e}"));
                None
            }
        }
    }

    async fn garment(&self, image: &ImageUpload, log: &ScanLog) -> Result<VisualMatch, ScanFailure> {
        log.push("Uploading image to visual search...");
        match self.lookups.visual.visual_search(image).await {
            Ok(Some(m)) => {
                log.push(format!("Result found: {}", m.label()));
                Ok(m)
            }
            Ok(None) => Err(ScanFailure::NoVisualResults),
            Err(e) => {
                tracing::warn!(error = %e, "visual search failed");
                Err(ScanFailure::VisualSearchFailed(e.to_string()))
            }
        }
    }
}
