//! # tandem-suggest
//!
//! AI-assisted date-suggestion pipeline.
//!
//! A [`UserProfile`](tandem_core::UserProfile) is reduced to a
//! [`ProfileContext`](tandem_core::ProfileContext), rendered into a single
//! prompt, sent through a [`GenerationBackend`](tandem_core::GenerationBackend),
//! and the untrusted reply is normalized and sequenced into a
//! [`SuggestionBatch`].
//!
//! ```rust,ignore
//! use tandem_inference::OpenAIBackend;
//! use tandem_suggest::SuggestionGenerator;
//!
//! let generator = SuggestionGenerator::new(OpenAIBackend::from_env()?);
//! let batch = generator.generate(Some(&profile), Some("outdoor")).await?;
//! for entry in batch.entries() {
//!     println!("{}. {}", entry.suggestion.sequence, entry.suggestion.title);
//! }
//! ```

pub mod generator;
pub mod normalize;
pub mod profile;
pub mod prompt;
pub mod sequence;

pub use generator::SuggestionGenerator;
pub use normalize::{Normalizer, RandomStartTime, StartTimeSource};
pub use profile::build_context;
pub use prompt::{compose, ComposedPrompt};
pub use sequence::{sequence, BatchEntry, SuggestionBatch};
