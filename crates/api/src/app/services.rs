use std::sync::Arc;

use ethiscan_lookup::{LookupConfig, LookupError, Lookups};
use ethiscan_scan::{ImageDecoder, Orchestrator, RxingDecoder};

/// Everything the handlers need, built once at startup.
#[derive(Debug, Clone)]
pub struct AppServices {
    pub lookups: Lookups,
    pub orchestrator: Orchestrator,
}

impl AppServices {
    /// Production wiring: real HTTP adapters and the `rxing` decoder.
    pub fn from_config(config: &LookupConfig) -> Result<Self, LookupError> {
        let lookups = Lookups::from_config(config)?;
        Ok(Self::with_parts(Arc::new(RxingDecoder), lookups))
    }

    /// Wiring with an explicit decoder (tests substitute a deterministic one).
    pub fn with_parts(decoder: Arc<dyn ImageDecoder>, lookups: Lookups) -> Self {
        let orchestrator = Orchestrator::new(decoder, lookups.clone());
        Self {
            lookups,
            orchestrator,
        }
    }
}
