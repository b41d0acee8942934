use thiserror::Error;

/// Fault raised by a lookup adapter.
///
/// "No data" is not an error; adapters return `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum LookupError {
    /// A server-held credential is not configured. No request was sent.
    #[error("{0} not set")]
    MissingCredential(&'static str),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    UpstreamStatus(u16),

    #[error("parse error: {0}")]
    Parse(String),

    /// The configured brand ratings file could not be read or parsed.
    #[error("brand ratings file {path}: {reason}")]
    RatingsFile { path: String, reason: String },
}

impl LookupError {
    /// Configuration faults are the operator's problem, not the upstream's.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LookupError::MissingCredential(_) | LookupError::RatingsFile { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_operator_faults_are_configuration_faults() {
        assert!(LookupError::MissingCredential("LYKDAT_API_KEY").is_configuration());
        assert!(!LookupError::UpstreamStatus(502).is_configuration());
        assert!(!LookupError::Parse("eof".into()).is_configuration());
        assert!(LookupError::RatingsFile {
            path: "ratings.json".into(),
            reason: "not found".into(),
        }
        .is_configuration());
    }

    #[test]
    fn missing_credential_names_the_variable() {
        let err = LookupError::MissingCredential("BARCODE_LOOKUP_API_KEY");
        assert_eq!(err.to_string(), "BARCODE_LOOKUP_API_KEY not set");
    }
}
