//! Scan domain values.
//!
//! All of these are request-scoped: they are created during one orchestration
//! run and dropped once the result has been handed to the caller.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Which fixed pipeline a scan runs through.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pipeline {
    /// decode -> nutrition || manufacturer -> ethical rating
    #[default]
    Grocery,
    /// visual search only
    Garment,
}

impl Pipeline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pipeline::Grocery => "grocery",
            Pipeline::Garment => "garment",
        }
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pipeline {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "grocery" | "barcode" => Ok(Pipeline::Grocery),
            "garment" | "clothing" => Ok(Pipeline::Garment),
            other => Err(DomainError::unknown_pipeline(other)),
        }
    }
}

/// Raw image upload as received from the user.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

impl ImageUpload {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            file_name: None,
            content_type: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Image bytes are never useful in logs.
impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("len", &self.bytes.len())
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// One user scan: an image plus the pipeline to run it through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub image: ImageUpload,
    pub pipeline: Pipeline,
}

impl ScanRequest {
    pub fn new(image: ImageUpload, pipeline: Pipeline) -> Self {
        Self { image, pipeline }
    }

    pub fn grocery(image: ImageUpload) -> Self {
        Self::new(image, Pipeline::Grocery)
    }

    pub fn garment(image: ImageUpload) -> Self {
        Self::new(image, Pipeline::Garment)
    }
}

/// A decoded barcode token.
///
/// Never empty: "no barcode" is modelled as the absence of a `Barcode`, not as
/// an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Barcode(String);

impl Barcode {
    pub fn parse(raw: impl AsRef<str>) -> DomainResult<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("barcode must not be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Barcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Barcode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Barcode::parse(value)
    }
}

impl From<Barcode> for String {
    fn from(value: Barcode) -> Self {
        value.0
    }
}

/// Company name associated with a barcode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ManufacturerName(String);

impl ManufacturerName {
    /// Returns `None` for blank input: an empty manufacturer is "no data".
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ManufacturerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ManufacturerName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ManufacturerName::new(&value)
            .ok_or_else(|| DomainError::validation("manufacturer must not be empty"))
    }
}

impl From<ManufacturerName> for String {
    fn from(value: ManufacturerName) -> Self {
        value.0
    }
}

/// Product facts from the public nutrition database.
///
/// The source may supply any subset of these fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brands: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<String>,
    /// Single-letter Nutri-Score grade.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutriscore: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
}

impl NutritionInfo {
    pub fn is_empty(&self) -> bool {
        self == &NutritionInfo::default()
    }
}

/// Link to a third-party ethical assessment of a manufacturer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthicalRating {
    pub title: String,
    pub url: String,
    /// Search-result excerpt, when the source provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

impl EthicalRating {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: None,
        }
    }

    pub fn with_snippet(mut self, snippet: Option<String>) -> Self {
        self.snippet = snippet;
        self
    }
}

/// How a food product rates, judged from its brand and labels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodStatus {
    OrganicOrFairTrade,
    Standard,
}

impl FoodStatus {
    pub fn label(&self) -> &'static str {
        match self {
            FoodStatus::OrganicOrFairTrade => "Organic / Fair Trade friendly",
            FoodStatus::Standard => "Standard food product",
        }
    }
}

/// Ethical information derived from local data, without a web search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum EthicalAssessment {
    /// Curated rating for a clothing or personal-care brand.
    BrandRating {
        brand: String,
        rating: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        comment: Option<String>,
    },
    FoodStatus { status: FoodStatus },
}

impl fmt::Display for EthicalAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EthicalAssessment::BrandRating { brand, rating, comment: Some(comment) } => {
                write!(f, "{brand} rated {rating} ({comment})")
            }
            EthicalAssessment::BrandRating { brand, rating, comment: None } => {
                write!(f, "{brand} rated {rating}")
            }
            EthicalAssessment::FoodStatus { status } => f.write_str(status.label()),
        }
    }
}

/// First candidate returned by the visual-search service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualMatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl VisualMatch {
    /// Best human-readable label for progress messages.
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .or(self.brand.as_deref())
            .unwrap_or("Unknown")
    }
}

/// Aggregate outcome of the grocery pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    barcode: Barcode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nutrition_info: Option<NutritionInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    manufacturer_name: Option<ManufacturerName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ethical_rating: Option<EthicalRating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ethical_assessment: Option<EthicalAssessment>,
}

impl ScanResult {
    pub fn new(
        barcode: Barcode,
        nutrition_info: Option<NutritionInfo>,
        manufacturer_name: Option<ManufacturerName>,
        ethical_rating: Option<EthicalRating>,
    ) -> Self {
        Self {
            barcode,
            nutrition_info,
            manufacturer_name,
            ethical_rating,
            ethical_assessment: None,
        }
    }

    pub fn with_ethical_assessment(mut self, assessment: Option<EthicalAssessment>) -> Self {
        self.ethical_assessment = assessment;
        self
    }

    pub fn barcode(&self) -> &Barcode {
        &self.barcode
    }

    pub fn nutrition_info(&self) -> Option<&NutritionInfo> {
        self.nutrition_info.as_ref()
    }

    pub fn manufacturer_name(&self) -> Option<&ManufacturerName> {
        self.manufacturer_name.as_ref()
    }

    pub fn ethical_rating(&self) -> Option<&EthicalRating> {
        self.ethical_rating.as_ref()
    }

    pub fn ethical_assessment(&self) -> Option<&EthicalAssessment> {
        self.ethical_assessment.as_ref()
    }
}

/// What a successful scan hands to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "pipeline", rename_all = "snake_case")]
pub enum ScanReport {
    Grocery(ScanResult),
    Garment(VisualMatch),
}

impl ScanReport {
    pub fn pipeline(&self) -> Pipeline {
        match self {
            ScanReport::Grocery(_) => Pipeline::Grocery,
            ScanReport::Garment(_) => Pipeline::Garment,
        }
    }
}
