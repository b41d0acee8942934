//! Lykdat visual search: garment photo -> first product match.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use ethiscan_core::{ImageUpload, VisualMatch};

use crate::config::{LYKDAT_API_KEY, LookupConfig};
use crate::error::LookupError;
use crate::http::{self, non_blank};
use crate::VisualSearchLookup;

const DEFAULT_FILE_NAME: &str = "upload.jpg";

#[derive(Debug, Clone)]
pub struct LykdatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl LykdatClient {
    pub fn new(http: reqwest::Client, config: &LookupConfig) -> Self {
        Self {
            http,
            base_url: config.lykdat_base_url.clone(),
            api_key: config.lykdat_api_key.clone(),
        }
    }
}

fn image_part(image: &ImageUpload) -> Result<Part, LookupError> {
    let file_name = image
        .file_name
        .clone()
        .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());
    let part = Part::bytes(image.bytes.clone()).file_name(file_name);
    match image.content_type.as_deref() {
        Some(mime) => Ok(part.mime_str(mime)?),
        None => Ok(part),
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<RawMatch>,
}

#[derive(Debug, Deserialize)]
struct RawMatch {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

fn project(body: SearchResponse) -> Option<VisualMatch> {
    body.results.into_iter().next().map(|m| VisualMatch {
        title: non_blank(m.title),
        brand: non_blank(m.brand),
        url: non_blank(m.url),
        image: non_blank(m.image),
    })
}

#[async_trait]
impl VisualSearchLookup for LykdatClient {
    async fn visual_search(&self, image: &ImageUpload) -> Result<Option<VisualMatch>, LookupError> {
        let api_key = self
            .api_key
            .clone()
            .ok_or(LookupError::MissingCredential(LYKDAT_API_KEY))?;

        let form = Form::new()
            .text("api_key", api_key)
            .part("image", image_part(image)?);

        let response = self
            .http
            .post(http::endpoint(&self.base_url, "v1/global/search"))
            .multipart(form)
            .send()
            .await?;

        let body: SearchResponse = http::read_json(http::ensure_success(response)?).await?;
        Ok(project(body))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(value: serde_json::Value) -> Option<VisualMatch> {
        project(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn first_result_is_projected_unmodified() {
        let m = parse(json!({
            "results": [
                {
                    "title": "Relaxed linen shirt",
                    "brand": "Everlane",
                    "url": "https://shop.example/linen",
                    "image": "https://cdn.example/linen.jpg",
                    "price": "58.00",
                    "score": 0.93
                },
                { "title": "Second best" }
            ]
        }))
        .unwrap();

        assert_eq!(m.title.as_deref(), Some("Relaxed linen shirt"));
        assert_eq!(m.brand.as_deref(), Some("Everlane"));
        assert_eq!(m.url.as_deref(), Some("https://shop.example/linen"));
        assert_eq!(m.image.as_deref(), Some("https://cdn.example/linen.jpg"));
    }

    #[test]
    fn padded_fields_are_kept_verbatim_and_blank_ones_dropped() {
        let m = parse(json!({
            "results": [{ "title": "  Linen shirt ", "brand": "   ", "url": "https://shop.example/linen\n" }]
        }))
        .unwrap();

        assert_eq!(m.title.as_deref(), Some("  Linen shirt "));
        assert_eq!(m.brand, None);
        assert_eq!(m.url.as_deref(), Some("https://shop.example/linen\n"));
    }

    #[test]
    fn empty_results_is_no_match() {
        assert_eq!(parse(json!({ "results": [] })), None);
        assert_eq!(parse(json!({})), None);
    }

    #[test]
    fn bad_content_type_is_reported() {
        let upload = ImageUpload::new(vec![1, 2, 3]).with_content_type("not a mime");
        assert!(image_part(&upload).is_err());
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let client = LykdatClient::new(reqwest::Client::new(), &LookupConfig::default());
        let err = client
            .visual_search(&ImageUpload::new(vec![0xff, 0xd8]))
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::MissingCredential(LYKDAT_API_KEY)));
    }
}
