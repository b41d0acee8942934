//! Process configuration, read once at startup.

use std::net::SocketAddr;

use thiserror::Error;

use ethiscan_lookup::{ConfigError, LookupConfig};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServerConfigError {
    #[error("invalid ETHISCAN_BIND_ADDR: {0:?}")]
    InvalidBindAddr(String),

    #[error(transparent)]
    Lookup(#[from] ConfigError),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub lookup: LookupConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ServerConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    pub fn from_vars<F>(get: F) -> Result<Self, ServerConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = get("ETHISCAN_BIND_ADDR")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw
            .parse()
            .map_err(|_| ServerConfigError::InvalidBindAddr(raw.clone()))?;

        Ok(Self {
            bind_addr,
            lookup: LookupConfig::from_vars(get)?,
        })
    }
}
