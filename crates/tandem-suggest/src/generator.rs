//! End-to-end suggestion generation.

use std::time::Instant;

use tracing::{debug, info, instrument};

use tandem_core::{Error, GenerationBackend, ProfileContext, Result, UserProfile};

use crate::normalize::{Normalizer, StartTimeSource};
use crate::profile::build_context;
use crate::prompt::compose;
use crate::sequence::{sequence, SuggestionBatch};

/// Runs the pipeline: context, prompt, one model call, normalization, sequencing.
///
/// Holds only the backend and immutable normalization settings, so a single
/// generator can serve concurrent requests.
pub struct SuggestionGenerator<B: GenerationBackend> {
    backend: B,
    normalizer: Normalizer,
}

impl<B: GenerationBackend> SuggestionGenerator<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            normalizer: Normalizer::new(),
        }
    }

    /// Replace the source used for missing start times.
    pub fn with_start_time_source(mut self, source: impl StartTimeSource + 'static) -> Self {
        self.normalizer = Normalizer::with_start_time_source(source);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Generate a batch for a user profile.
    ///
    /// Fails with [`Error::ProfileMissing`] before any model call when there is
    /// no profile, and with [`Error::GenerationUnavailable`] when the model call
    /// fails. Unusable model output yields an empty batch, not an error.
    pub async fn generate(
        &self,
        profile: Option<&UserProfile>,
        category_filter: Option<&str>,
    ) -> Result<SuggestionBatch> {
        let profile = profile.ok_or(Error::ProfileMissing)?;
        let ctx = build_context(profile);
        self.generate_for_context(&ctx, category_filter).await
    }

    /// Generate a batch for an already-built context.
    #[instrument(
        skip(self, ctx),
        fields(subsystem = "suggest", op = "generate", model = %self.backend.model_name())
    )]
    pub async fn generate_for_context(
        &self,
        ctx: &ProfileContext,
        category_filter: Option<&str>,
    ) -> Result<SuggestionBatch> {
        let start = Instant::now();
        let prompt = compose(ctx, category_filter);

        let raw = self.backend.complete(&prompt.text).await?;
        debug!(response_len = raw.len(), "Received model response");

        let suggestions = self.normalizer.normalize(&raw);
        let batch = sequence(suggestions);

        info!(
            target_count = prompt.target_count,
            item_count = batch.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Generated suggestion batch"
        );
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::FirstStartTime;
    use tandem_core::Category;
    use tandem_inference::mock::MockGenerationBackend;

    #[tokio::test]
    async fn test_missing_profile_makes_no_call() {
        let backend = MockGenerationBackend::new();
        let generator = SuggestionGenerator::new(backend.clone());

        let result = generator.generate(None, None).await;
        assert!(matches!(result, Err(Error::ProfileMissing)));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_prompt_reaches_backend() {
        let backend = MockGenerationBackend::new()
            .with_answer(r#"[{"title": "Ramen night", "category": "dining"}]"#);
        let generator =
            SuggestionGenerator::new(backend.clone()).with_start_time_source(FirstStartTime);

        let profile = UserProfile {
            name: Some("Riley".to_string()),
            ..Default::default()
        };
        let batch = generator.generate(Some(&profile), Some("dining")).await.unwrap();

        assert_eq!(backend.call_count(), 1);
        let prompt = backend.last_prompt().unwrap();
        assert!(prompt.contains("Riley"));
        assert!(prompt.contains("\"dining\""));

        assert_eq!(batch.len(), 1);
        assert_eq!(batch.entries()[0].suggestion.category, Category::Dining);
    }

    #[tokio::test]
    async fn test_backend_failure_propagates() {
        let backend = MockGenerationBackend::new().with_failure_rate(1.0);
        let generator = SuggestionGenerator::new(backend);

        let result = generator
            .generate_for_context(&ProfileContext::default(), None)
            .await;
        assert!(matches!(result, Err(Error::GenerationUnavailable(_))));
    }

    #[tokio::test]
    async fn test_unusable_output_is_empty_batch() {
        let backend = MockGenerationBackend::new().with_answer("I cannot help with that.");
        let generator = SuggestionGenerator::new(backend);

        let batch = generator
            .generate_for_context(&ProfileContext::default(), None)
            .await
            .unwrap();
        assert!(batch.is_empty());
    }
}
