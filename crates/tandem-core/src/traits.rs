//! Core traits for tandem abstractions.
//!
//! These traits define the seams that concrete implementations must satisfy,
//! enabling pluggable model backends and testability.

use async_trait::async_trait;

use crate::error::Result;

// =============================================================================
// GENERATION TRAITS
// =============================================================================

/// Backend capable of sending one prompt to a generative text model.
///
/// Implementations own transport concerns only: a single bounded call, no
/// retry, and no knowledge of what the reply should contain. Any transport
/// failure, non-success status, or vendor error envelope is reported as
/// [`crate::Error::GenerationUnavailable`].
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Send the prompt and return the raw response body (the vendor envelope).
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}
