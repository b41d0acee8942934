//! Ethical-rating search: manufacturer -> first matching rating page.
//!
//! Backed by the Google Custom Search JSON API, optionally restricted to one
//! ratings site.

use async_trait::async_trait;
use serde::Deserialize;

use ethiscan_core::{EthicalRating, ManufacturerName};

use crate::config::{GOOGLE_API_KEY, GOOGLE_CSE_ID, LookupConfig};
use crate::error::LookupError;
use crate::http::{self, non_blank};
use crate::EthicalRatingLookup;

#[derive(Debug, Clone)]
pub struct GoogleEthicalSearchClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    engine_id: Option<String>,
    site: Option<String>,
}

impl GoogleEthicalSearchClient {
    pub fn new(http: reqwest::Client, config: &LookupConfig) -> Self {
        Self {
            http,
            base_url: config.google_search_base_url.clone(),
            api_key: config.google_api_key.clone(),
            engine_id: config.google_cse_id.clone(),
            site: config.ethical_search_site.clone(),
        }
    }
}

pub(crate) fn search_query(manufacturer: &ManufacturerName) -> String {
    format!("{} ethical rating", manufacturer.as_str())
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

fn project(body: SearchResponse) -> Option<EthicalRating> {
    let first = body.items.into_iter().next()?;
    match (non_blank(first.title), non_blank(first.link)) {
        (Some(title), Some(url)) => {
            Some(EthicalRating::new(title, url).with_snippet(non_blank(first.snippet)))
        }
        _ => None,
    }
}

#[async_trait]
impl EthicalRatingLookup for GoogleEthicalSearchClient {
    async fn ethical_rating(
        &self,
        manufacturer: &ManufacturerName,
    ) -> Result<Option<EthicalRating>, LookupError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(LookupError::MissingCredential(GOOGLE_API_KEY))?;
        let engine_id = self
            .engine_id
            .as_deref()
            .ok_or(LookupError::MissingCredential(GOOGLE_CSE_ID))?;

        let query = search_query(manufacturer);
        let mut params = vec![
            ("key", api_key),
            ("cx", engine_id),
            ("q", query.as_str()),
            ("num", "1"),
        ];
        if let Some(site) = self.site.as_deref() {
            params.push(("siteSearch", site));
        }

        let response = self
            .http
            .get(http::endpoint(&self.base_url, "customsearch/v1"))
            .query(&params)
            .send()
            .await?;

        let body: SearchResponse = http::read_json(http::ensure_success(response)?).await?;
        Ok(project(body))
    }
}
