//! Error types for tandem.

use thiserror::Error;

/// Result type alias using tandem's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for tandem suggestion generation.
///
/// Content-shape problems in a model reply are never errors: they are absorbed
/// by the normalizer into fewer (or zero) suggestions. The only variant that
/// `generate` surfaces after the precondition check is `GenerationUnavailable`.
#[derive(Error, Debug)]
pub enum Error {
    /// No profile was supplied; generation must not be attempted.
    #[error("Profile missing: a user profile is required before generating suggestions")]
    ProfileMissing,

    /// Network, transport, or vendor-envelope failure talking to the model.
    #[error("Generation unavailable: {0}")]
    GenerationUnavailable(String),

    /// The model replied but nothing usable survived normalization.
    #[error("Empty batch: no usable suggestions were generated")]
    EmptyBatch,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the failure happened at the transport layer.
    ///
    /// Callers use this to decide between surfacing an error and retrying;
    /// the gateway itself never retries.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::GenerationUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_profile_missing() {
        let err = Error::ProfileMissing;
        assert!(err.to_string().starts_with("Profile missing"));
    }

    #[test]
    fn test_error_display_generation_unavailable() {
        let err = Error::GenerationUnavailable("connection refused".to_string());
        assert_eq!(
            err.to_string(),
            "Generation unavailable: connection refused"
        );
    }

    #[test]
    fn test_error_display_empty_batch() {
        let err = Error::EmptyBatch;
        assert_eq!(
            err.to_string(),
            "Empty batch: no usable suggestions were generated"
        );
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("missing model".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing model");
    }

    #[test]
    fn test_is_transport() {
        assert!(Error::GenerationUnavailable("x".to_string()).is_transport());
        assert!(!Error::EmptyBatch.is_transport());
        assert!(!Error::ProfileMissing.is_transport());
    }
}
