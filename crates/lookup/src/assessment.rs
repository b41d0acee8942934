//! Local ethical assessment.
//!
//! Two rules that need no network call:
//! - clothing and personal-care products are looked up in a curated brand
//!   ratings file (JSON object keyed by brand name);
//! - food products get a status from their brand and labels.
//!
//! The web rating search still runs independently of this.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use ethiscan_core::{EthicalAssessment, FoodStatus, ManufacturerName, NutritionInfo};

use crate::error::LookupError;

const RATED_CATEGORIES: [&str; 2] = ["clothing", "personal care"];
const FOOD_CATEGORY: &str = "food";
const FRIENDLY_MARKERS: [&str; 2] = ["organic", "fair"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct BrandRatingEntry {
    rating: String,
    #[serde(default)]
    comment: Option<String>,
}

/// Curated brand ratings, matched case-insensitively on the brand name.
#[derive(Debug, Clone, Default)]
pub struct BrandRatings {
    by_brand: HashMap<String, BrandRatingEntry>,
}

fn brand_key(brand: &str) -> String {
    brand.trim().to_lowercase()
}

impl BrandRatings {
    /// Parse `{ "<brand>": { "rating": "..", "comment": ".." }, .. }`.
    pub fn from_json(raw: &str) -> Result<Self, LookupError> {
        let entries: HashMap<String, BrandRatingEntry> =
            serde_json::from_str(raw).map_err(|e| LookupError::Parse(e.to_string()))?;
        let by_brand = entries
            .into_iter()
            .filter(|(_, entry)| !entry.rating.trim().is_empty())
            .map(|(brand, entry)| (brand_key(&brand), entry))
            .collect();
        Ok(Self { by_brand })
    }

    pub fn load(path: &Path) -> Result<Self, LookupError> {
        let ratings_file = |reason: String| LookupError::RatingsFile {
            path: path.display().to_string(),
            reason,
        };
        let raw = std::fs::read_to_string(path).map_err(|e| ratings_file(e.to_string()))?;
        let ratings = Self::from_json(&raw).map_err(|e| ratings_file(e.to_string()))?;
        tracing::info!(path = %path.display(), brands = ratings.len(), "loaded brand ratings");
        Ok(ratings)
    }

    pub fn len(&self) -> usize {
        self.by_brand.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_brand.is_empty()
    }

    /// Assess a product from what the lookups returned.
    ///
    /// Categories decide which rule applies; without categories there is
    /// nothing to assess. A brand rating wins over the food rule when a product
    /// matches both.
    pub fn assess(
        &self,
        nutrition: Option<&NutritionInfo>,
        manufacturer: Option<&ManufacturerName>,
    ) -> Option<EthicalAssessment> {
        let nutrition = nutrition?;
        let categories = nutrition.categories.as_deref()?.to_lowercase();

        if RATED_CATEGORIES.iter().any(|c| categories.contains(c)) {
            let rated = brand_candidates(nutrition, manufacturer)
                .find_map(|brand| self.by_brand.get(&brand_key(brand)).map(|e| (brand, e)));
            if let Some((brand, entry)) = rated {
                return Some(EthicalAssessment::BrandRating {
                    brand: brand.to_string(),
                    rating: entry.rating.clone(),
                    comment: entry.comment.clone().filter(|c| !c.trim().is_empty()),
                });
            }
        }

        if categories.contains(FOOD_CATEGORY) {
            let marked = [nutrition.brands.as_deref(), nutrition.labels.as_deref()]
                .into_iter()
                .flatten()
                .map(str::to_lowercase)
                .any(|text| FRIENDLY_MARKERS.iter().any(|m| text.contains(m)));
            let status = if marked {
                FoodStatus::OrganicOrFairTrade
            } else {
                FoodStatus::Standard
            };
            return Some(EthicalAssessment::FoodStatus { status });
        }

        None
    }
}

/// Brand names to try, in order: the product's listed brands, then the
/// registry's manufacturer.
fn brand_candidates<'a>(
    nutrition: &'a NutritionInfo,
    manufacturer: Option<&'a ManufacturerName>,
) -> impl Iterator<Item = &'a str> {
    nutrition
        .brands
        .as_deref()
        .into_iter()
        .flat_map(|brands| brands.split(','))
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .chain(manufacturer.map(ManufacturerName::as_str))
}
