//! Lookup configuration: upstream endpoints and server-held credentials.
//!
//! Built once at process start and shared read-only by every adapter.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const BARCODE_LOOKUP_API_KEY: &str = "BARCODE_LOOKUP_API_KEY";
pub const LYKDAT_API_KEY: &str = "LYKDAT_API_KEY";
pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
pub const GOOGLE_CSE_ID: &str = "GOOGLE_CSE_ID";
pub const BRAND_RATINGS_FILE: &str = "ETHISCAN_BRAND_RATINGS_FILE";

pub const DEFAULT_OPENFOODFACTS_BASE_URL: &str = "https://world.openfoodfacts.org";
pub const DEFAULT_BARCODE_LOOKUP_BASE_URL: &str = "https://api.barcodelookup.com";
pub const DEFAULT_GOOGLE_SEARCH_BASE_URL: &str = "https://www.googleapis.com";
pub const DEFAULT_LYKDAT_BASE_URL: &str = "https://cloudapi.lykdat.com";
pub const DEFAULT_ETHICAL_SEARCH_SITE: &str = "ethicalconsumer.org";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Clone, PartialEq, Eq)]
pub struct LookupConfig {
    pub openfoodfacts_base_url: String,

    pub barcode_lookup_base_url: String,
    pub barcode_lookup_api_key: Option<String>,

    pub google_search_base_url: String,
    pub google_api_key: Option<String>,
    pub google_cse_id: Option<String>,
    /// Restricts ethical-rating search results to one site. `None` searches the web.
    pub ethical_search_site: Option<String>,
    /// Curated brand ratings consulted for clothing and personal-care products.
    pub brand_ratings_file: Option<PathBuf>,

    pub lykdat_base_url: String,
    pub lykdat_api_key: Option<String>,

    /// Per-request timeout for every outbound call.
    pub timeout: Duration,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            openfoodfacts_base_url: DEFAULT_OPENFOODFACTS_BASE_URL.to_string(),
            barcode_lookup_base_url: DEFAULT_BARCODE_LOOKUP_BASE_URL.to_string(),
            barcode_lookup_api_key: None,
            google_search_base_url: DEFAULT_GOOGLE_SEARCH_BASE_URL.to_string(),
            google_api_key: None,
            google_cse_id: None,
            ethical_search_site: Some(DEFAULT_ETHICAL_SEARCH_SITE.to_string()),
            brand_ratings_file: None,
            lykdat_base_url: DEFAULT_LYKDAT_BASE_URL.to_string(),
            lykdat_api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl LookupConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable source.
    ///
    /// Empty values count as unset.
    pub fn from_vars<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| get(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let timeout = match var("LOOKUP_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: "LOOKUP_TIMEOUT_SECS",
                        value: raw,
                    });
                }
            },
            None => defaults.timeout,
        };

        let ethical_search_site = match get("ETHICAL_SEARCH_SITE") {
            // Explicitly set but blank: search the whole web.
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => Some(raw.trim().to_string()),
            None => defaults.ethical_search_site,
        };

        Ok(Self {
            openfoodfacts_base_url: var("OPENFOODFACTS_BASE_URL")
                .unwrap_or(defaults.openfoodfacts_base_url),
            barcode_lookup_base_url: var("BARCODE_LOOKUP_BASE_URL")
                .unwrap_or(defaults.barcode_lookup_base_url),
            barcode_lookup_api_key: var(BARCODE_LOOKUP_API_KEY),
            google_search_base_url: var("GOOGLE_SEARCH_BASE_URL")
                .unwrap_or(defaults.google_search_base_url),
            google_api_key: var(GOOGLE_API_KEY),
            google_cse_id: var(GOOGLE_CSE_ID),
            ethical_search_site,
            brand_ratings_file: var(BRAND_RATINGS_FILE).map(PathBuf::from),
            lykdat_base_url: var("LYKDAT_BASE_URL").unwrap_or(defaults.lykdat_base_url),
            lykdat_api_key: var(LYKDAT_API_KEY),
            timeout,
        })
    }

    /// Names of credentials that are not configured (for a startup warning).
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.barcode_lookup_api_key.is_none() {
            missing.push(BARCODE_LOOKUP_API_KEY);
        }
        if self.google_api_key.is_none() {
            missing.push(GOOGLE_API_KEY);
        }
        if self.google_cse_id.is_none() {
            missing.push(GOOGLE_CSE_ID);
        }
        if self.lykdat_api_key.is_none() {
            missing.push(LYKDAT_API_KEY);
        }
        missing
    }
}

fn redact(secret: &Option<String>) -> &'static str {
    if secret.is_some() { "<set>" } else { "<unset>" }
}

impl fmt::Debug for LookupConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupConfig")
            .field("openfoodfacts_base_url", &self.openfoodfacts_base_url)
            .field("barcode_lookup_base_url", &self.barcode_lookup_base_url)
            .field("barcode_lookup_api_key", &redact(&self.barcode_lookup_api_key))
            .field("google_search_base_url", &self.google_search_base_url)
            .field("google_api_key", &redact(&self.google_api_key))
            .field("google_cse_id", &redact(&self.google_cse_id))
            .field("ethical_search_site", &self.ethical_search_site)
            .field("brand_ratings_file", &self.brand_ratings_file)
            .field("lykdat_base_url", &self.lykdat_base_url)
            .field("lykdat_api_key", &redact(&self.lykdat_api_key))
            .field("timeout", &self.timeout)
            .finish()
    }
}
