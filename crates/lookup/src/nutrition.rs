//! OpenFoodFacts product lookup (public, no credential).

use async_trait::async_trait;
use serde::Deserialize;

use ethiscan_core::{Barcode, NutritionInfo};

use crate::config::LookupConfig;
use crate::error::LookupError;
use crate::http::{self, non_blank};
use crate::NutritionLookup;

#[derive(Debug, Clone)]
pub struct OpenFoodFactsClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenFoodFactsClient {
    pub fn new(http: reqwest::Client, config: &LookupConfig) -> Self {
        Self {
            http,
            base_url: config.openfoodfacts_base_url.clone(),
        }
    }

    fn product_url(&self, barcode: &Barcode) -> String {
        http::endpoint(&self.base_url, &format!("api/v0/product/{}.json", barcode.as_str()))
    }
}

#[derive(Debug, Deserialize)]
struct ProductResponse {
    /// 1 when the product exists, 0 otherwise.
    #[serde(default)]
    status: Option<i64>,
    #[serde(default)]
    product: Option<Product>,
}

#[derive(Debug, Deserialize)]
struct Product {
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    brands: Option<String>,
    #[serde(default)]
    ingredients_text: Option<String>,
    #[serde(default)]
    nutriscore_grade: Option<String>,
    #[serde(default)]
    categories: Option<String>,
    #[serde(default)]
    labels: Option<String>,
}

fn project(body: ProductResponse) -> Option<NutritionInfo> {
    if body.status == Some(0) {
        return None;
    }
    let product = body.product?;
    let info = NutritionInfo {
        product_name: non_blank(product.product_name),
        brands: non_blank(product.brands),
        ingredients: non_blank(product.ingredients_text),
        nutriscore: non_blank(product.nutriscore_grade),
        categories: non_blank(product.categories),
        labels: non_blank(product.labels),
    };
    (!info.is_empty()).then_some(info)
}

#[async_trait]
impl NutritionLookup for OpenFoodFactsClient {
    async fn nutrition(&self, barcode: &Barcode) -> Result<Option<NutritionInfo>, LookupError> {
        let response = self.http.get(self.product_url(barcode)).send().await?;

        // The public database answers unknown products with a non-2xx on some
        // mirrors; either way there is nothing to report.
        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), barcode = %barcode, "openfoodfacts returned non-success");
            return Ok(None);
        }

        let body: ProductResponse = http::read_json(response).await?;
        Ok(project(body))
    }
}
