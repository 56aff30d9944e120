//! OpenAI-compatible model gateway.
//!
//! Works with any endpoint that speaks the `/chat/completions` protocol:
//!
//! - OpenAI cloud API
//! - Azure OpenAI
//! - Ollama (in OpenAI compatibility mode)
//! - vLLM, LocalAI, LM Studio
//!
//! # Example
//!
//! ```rust,no_run
//! use tandem_inference::openai::{OpenAIBackend, OpenAIConfig};
//! use tandem_core::GenerationBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = OpenAIConfig {
//!         base_url: "http://localhost:11434/v1".to_string(), // Ollama
//!         model: "llama3".to_string(),
//!         ..Default::default()
//!     };
//!     let backend = OpenAIBackend::new(config).unwrap();
//!
//!     // Raw vendor envelope; the suggest pipeline extracts the answer.
//!     let envelope = backend.complete("Suggest a date idea").await.unwrap();
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{OpenAIBackend, OpenAIConfig};
pub use error::{unavailable, OpenAIErrorCode};
pub use types::*;
