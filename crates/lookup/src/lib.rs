//! `ethiscan-lookup`
//!
//! **Responsibility:** one client per third-party lookup service.
//!
//! Every adapter has the same shape: one typed input, one outbound request to a
//! fixed endpoint, and a narrow projection of the JSON body. Adapters report
//! "no data" as `Ok(None)` and faults as [`LookupError`]; deciding whether a
//! fault is fatal is the caller's job (relay or orchestrator).
//!
//! [`assessment`] holds the local rules (curated brand ratings, food labels)
//! that complement the web rating search.

use std::sync::Arc;

use async_trait::async_trait;

use ethiscan_core::{Barcode, EthicalRating, ImageUpload, ManufacturerName, NutritionInfo, VisualMatch};

pub mod assessment;
pub mod config;
pub mod error;
pub mod ethical;
pub mod http;
pub mod manufacturer;
pub mod nutrition;
pub mod visual;

pub use assessment::BrandRatings;
pub use config::{ConfigError, LookupConfig};
pub use error::LookupError;
pub use ethical::GoogleEthicalSearchClient;
pub use manufacturer::BarcodeLookupClient;
pub use nutrition::OpenFoodFactsClient;
pub use visual::LykdatClient;

/// Barcode -> product facts from the public nutrition database.
#[async_trait]
pub trait NutritionLookup: Send + Sync {
    async fn nutrition(&self, barcode: &Barcode) -> Result<Option<NutritionInfo>, LookupError>;
}

/// Barcode -> manufacturer name from the product registry.
#[async_trait]
pub trait ManufacturerLookup: Send + Sync {
    async fn manufacturer(&self, barcode: &Barcode) -> Result<Option<ManufacturerName>, LookupError>;
}

/// Manufacturer name -> link to an ethical rating page.
#[async_trait]
pub trait EthicalRatingLookup: Send + Sync {
    async fn ethical_rating(
        &self,
        manufacturer: &ManufacturerName,
    ) -> Result<Option<EthicalRating>, LookupError>;
}

/// Garment photo -> first visual-search match.
#[async_trait]
pub trait VisualSearchLookup: Send + Sync {
    async fn visual_search(&self, image: &ImageUpload) -> Result<Option<VisualMatch>, LookupError>;
}

/// The full set of adapters, shared by the relays and the orchestrator.
#[derive(Clone)]
pub struct Lookups {
    pub nutrition: Arc<dyn NutritionLookup>,
    pub manufacturer: Arc<dyn ManufacturerLookup>,
    pub ethical: Arc<dyn EthicalRatingLookup>,
    pub visual: Arc<dyn VisualSearchLookup>,
    /// Local rules; consulted in-process, never over the network.
    pub brand_ratings: Arc<BrandRatings>,
}

impl Lookups {
    /// Build the production adapters over one shared HTTP client.
    pub fn from_config(config: &LookupConfig) -> Result<Self, LookupError> {
        let client = http::build_client(config)?;
        let brand_ratings = match &config.brand_ratings_file {
            Some(path) => BrandRatings::load(path)?,
            None => BrandRatings::default(),
        };
        if config.brand_ratings_file.is_some() && brand_ratings.is_empty() {
            tracing::warn!("brand ratings file has no usable entries");
        }

        Ok(Self {
            nutrition: Arc::new(OpenFoodFactsClient::new(client.clone(), config)),
            manufacturer: Arc::new(BarcodeLookupClient::new(client.clone(), config)),
            ethical: Arc::new(GoogleEthicalSearchClient::new(client.clone(), config)),
            visual: Arc::new(LykdatClient::new(client, config)),
            brand_ratings: Arc::new(brand_ratings),
        })
    }
}

impl std::fmt::Debug for Lookups {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lookups").finish_non_exhaustive()
    }
}
