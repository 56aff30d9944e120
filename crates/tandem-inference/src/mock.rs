//! Mock generation backend for deterministic testing.
//!
//! Returns canned responses and records every prompt it receives, so pipeline
//! tests can run without a model endpoint.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tandem_core::GenerationBackend;
//! use tandem_inference::mock::MockGenerationBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = MockGenerationBackend::new().with_answer("[]");
//!
//!     let envelope = backend.complete("prompt").await.unwrap();
//!     assert!(envelope.contains("choices"));
//!     assert_eq!(backend.call_count(), 1);
//! }
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tandem_core::{Error, GenerationBackend, Result};

/// Mock generation backend for testing.
#[derive(Clone)]
pub struct MockGenerationBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    model: String,
    fixed_responses: HashMap<String, String>,
    default_response: String,
    latency_ms: u64,
    failure_rate: f64,
}

#[derive(Debug, Clone)]
pub struct MockCall {
    pub prompt: String,
    pub timestamp: std::time::Instant,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            model: "mock-model".to_string(),
            fixed_responses: HashMap::new(),
            default_response: envelope("[]"),
            latency_ms: 0,
            failure_rate: 0.0,
        }
    }
}

/// Wrap answer text in an OpenAI-style chat completion envelope.
pub fn envelope(answer: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-mock",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": answer},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

impl MockGenerationBackend {
    /// Create a new mock backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the raw response body returned for every prompt.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_response = response.into();
        self
    }

    /// Return `answer` wrapped in a chat completion envelope.
    pub fn with_answer(self, answer: &str) -> Self {
        self.with_fixed_response(envelope(answer))
    }

    /// Add a raw response for one exact prompt.
    pub fn with_response_mapping(
        mut self,
        prompt: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .fixed_responses
            .insert(prompt.into(), response.into());
        self
    }

    /// Set the reported model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).model = model.into();
        self
    }

    /// Set simulated latency for every call.
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        Arc::make_mut(&mut self.config).latency_ms = latency_ms;
        self
    }

    /// Set failure rate (0.0 - 1.0) for testing error handling.
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        Arc::make_mut(&mut self.config).failure_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Number of prompts received.
    pub fn call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }

    /// The most recent prompt, if any.
    pub fn last_prompt(&self) -> Option<String> {
        self.call_log
            .lock()
            .unwrap()
            .last()
            .map(|c| c.prompt.clone())
    }

    fn log_call(&self, prompt: &str) {
        self.call_log.lock().unwrap().push(MockCall {
            prompt: prompt.to_string(),
            timestamp: std::time::Instant::now(),
        });
    }

    fn should_fail(&self) -> bool {
        use rand::Rng;
        if self.config.failure_rate > 0.0 {
            rand::thread_rng().gen::<f64>() < self.config.failure_rate
        } else {
            false
        }
    }

    async fn simulate_latency(&self) {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;
        }
    }
}

impl Default for MockGenerationBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.log_call(prompt);
        self.simulate_latency().await;

        if self.should_fail() {
            return Err(Error::GenerationUnavailable(
                "Simulated failure for testing".to_string(),
            ));
        }

        if let Some(response) = self.config.fixed_responses.get(prompt) {
            return Ok(response.clone());
        }

        Ok(self.config.default_response.clone())
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_backend_default_is_empty_array() {
        let backend = MockGenerationBackend::new();
        let body = backend.complete("anything").await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["choices"][0]["message"]["content"], "[]");
    }

    #[tokio::test]
    async fn test_mock_backend_with_answer() {
        let backend = MockGenerationBackend::new().with_answer("hello");
        let body = backend.complete("prompt").await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["choices"][0]["message"]["content"], "hello");
    }

    #[tokio::test]
    async fn test_mock_backend_response_mapping() {
        let backend = MockGenerationBackend::new()
            .with_fixed_response("default")
            .with_response_mapping("hello", "world");

        assert_eq!(backend.complete("hello").await.unwrap(), "world");
        assert_eq!(backend.complete("other").await.unwrap(), "default");
    }

    #[tokio::test]
    async fn test_mock_backend_call_logging() {
        let backend = MockGenerationBackend::new();

        backend.complete("first").await.unwrap();
        backend.complete("second").await.unwrap();

        assert_eq!(backend.call_count(), 2);
        assert_eq!(backend.last_prompt().as_deref(), Some("second"));
        assert_eq!(backend.get_calls()[0].prompt, "first");
    }

    #[tokio::test]
    async fn test_mock_backend_failure_simulation() {
        let backend = MockGenerationBackend::new().with_failure_rate(1.0);

        let result = backend.complete("test").await;
        assert!(matches!(result, Err(Error::GenerationUnavailable(_))));
    }

    #[tokio::test]
    async fn test_mock_backend_latency_simulation() {
        let backend = MockGenerationBackend::new().with_latency_ms(20);

        let start = std::time::Instant::now();
        backend.complete("test").await.unwrap();

        assert!(start.elapsed().as_millis() >= 20, "Should simulate latency");
    }

    #[test]
    fn test_model_name() {
        let backend = MockGenerationBackend::new().with_model("m1");
        assert_eq!(backend.model_name(), "m1");
    }
}
