//! # tandem-inference
//!
//! Model gateway for tandem.
//!
//! This crate provides:
//! - OpenAI-compatible gateway (default feature `openai`)
//! - Mock generation backend (feature `mock`, for tests)
//!
//! A gateway performs one bounded network call per prompt and hands back the
//! raw vendor envelope. It has no semantic knowledge of the reply and never
//! retries; every transport or envelope failure becomes
//! [`tandem_core::Error::GenerationUnavailable`].
//!
//! # Example
//!
//! ```rust,no_run
//! use tandem_inference::OpenAIBackend;
//! use tandem_core::GenerationBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = OpenAIBackend::from_env().unwrap();
//!     let envelope = backend.complete("Suggest a date idea").await.unwrap();
//! }
//! ```

#[cfg(feature = "openai")]
pub mod openai;

// Mock generation backend for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(feature = "openai")]
pub use openai::{OpenAIBackend, OpenAIConfig};
