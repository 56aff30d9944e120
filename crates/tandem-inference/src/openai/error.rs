//! OpenAI-specific error classification.
//!
//! Every gateway failure collapses into [`Error::GenerationUnavailable`]; the
//! code only sharpens the message so operators can tell a bad key from an
//! outage.

use tandem_core::Error;

/// OpenAI-specific error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAIErrorCode {
    /// Invalid authentication credentials.
    AuthenticationError,
    /// Rate limit exceeded.
    RateLimitExceeded,
    /// Model not found or not available.
    ModelNotFound,
    /// Request too large.
    ContextLengthExceeded,
    /// Server error.
    ServerError,
    /// Unknown error.
    Unknown,
}

impl OpenAIErrorCode {
    /// Determine error code from HTTP status and error type.
    pub fn from_response(status: u16, error_type: &str) -> Self {
        match (status, error_type) {
            (401, _) => Self::AuthenticationError,
            (429, _) => Self::RateLimitExceeded,
            (404, _) | (_, "model_not_found") => Self::ModelNotFound,
            (400, _) if error_type.contains("context_length") => Self::ContextLengthExceeded,
            (500..=599, _) => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::AuthenticationError => "Authentication failed",
            Self::RateLimitExceeded => "Rate limit exceeded",
            Self::ModelNotFound => "Model not found",
            Self::ContextLengthExceeded => "Context too long",
            Self::ServerError => "Server error",
            Self::Unknown => "Request rejected",
        }
    }
}

/// Convert a classified vendor failure into the gateway error.
pub fn unavailable(code: OpenAIErrorCode, message: &str) -> Error {
    Error::GenerationUnavailable(format!("{}: {}", code.label(), message))
}
