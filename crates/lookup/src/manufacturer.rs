//! BarcodeLookup registry: barcode -> manufacturer.

use async_trait::async_trait;
use reqwest::header;
use serde::Deserialize;

use ethiscan_core::{Barcode, ManufacturerName};

use crate::config::{BARCODE_LOOKUP_API_KEY, LookupConfig};
use crate::error::LookupError;
use crate::http;
use crate::ManufacturerLookup;

/// The registry rejects non-browser agents.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

#[derive(Debug, Clone)]
pub struct BarcodeLookupClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl BarcodeLookupClient {
    pub fn new(http: reqwest::Client, config: &LookupConfig) -> Self {
        Self {
            http,
            base_url: config.barcode_lookup_base_url.clone(),
            api_key: config.barcode_lookup_api_key.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProductsResponse {
    #[serde(default)]
    products: Vec<RegistryProduct>,
}

#[derive(Debug, Deserialize)]
struct RegistryProduct {
    #[serde(default)]
    manufacturer: Option<String>,
}

fn project(body: ProductsResponse) -> Option<ManufacturerName> {
    body.products
        .into_iter()
        .next()
        .and_then(|p| p.manufacturer)
        .and_then(ManufacturerName::new)
}

#[async_trait]
impl ManufacturerLookup for BarcodeLookupClient {
    async fn manufacturer(&self, barcode: &Barcode) -> Result<Option<ManufacturerName>, LookupError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(LookupError::MissingCredential(BARCODE_LOOKUP_API_KEY))?;

        let response = self
            .http
            .get(http::endpoint(&self.base_url, "v3/products"))
            .query(&[
                ("barcode", barcode.as_str()),
                ("formatted", "y"),
                ("key", api_key),
            ])
            .header(header::USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await?;

        // Unknown barcodes come back as 404: a valid "no match", not a fault.
        if http::is_not_found(response.status()) {
            return Ok(None);
        }

        let body: ProductsResponse = http::read_json(http::ensure_success(response)?).await?;
        Ok(project(body))
    }
}
