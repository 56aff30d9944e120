//! OpenAI-compatible gateway implementation.

use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use tandem_core::{defaults, Error, GenerationBackend, Result};

use super::error::{unavailable, OpenAIErrorCode};
use super::types::*;

/// Configuration for the OpenAI-compatible gateway.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key for authentication (optional for local endpoints).
    pub api_key: Option<String>,
    /// Model to use for generation.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Sampling temperature sent with every request.
    pub temperature: f32,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::LLM_BASE_URL.to_string(),
            api_key: None,
            model: defaults::LLM_MODEL.to_string(),
            timeout_seconds: defaults::LLM_TIMEOUT_SECS,
            temperature: defaults::LLM_TEMPERATURE,
        }
    }
}

impl OpenAIConfig {
    /// Load configuration from `TANDEM_LLM_*` environment variables.
    ///
    /// Unset or unparsable values fall back to [`defaults`].
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var(defaults::ENV_LLM_BASE_URL)
                .unwrap_or_else(|_| defaults::LLM_BASE_URL.to_string()),
            api_key: std::env::var(defaults::ENV_LLM_API_KEY)
                .ok()
                .filter(|k| !k.is_empty()),
            model: std::env::var(defaults::ENV_LLM_MODEL)
                .unwrap_or_else(|_| defaults::LLM_MODEL.to_string()),
            timeout_seconds: std::env::var(defaults::ENV_LLM_TIMEOUT_SECS)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::LLM_TIMEOUT_SECS),
            temperature: std::env::var(defaults::ENV_LLM_TEMPERATURE)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::LLM_TEMPERATURE),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if self.model.trim().is_empty() {
            return Err(Error::Config("model cannot be empty".to_string()));
        }

        if self.timeout_seconds == 0 {
            return Err(Error::Config(
                "timeout_seconds must be greater than zero".to_string(),
            ));
        }

        if !(0.0..=defaults::LLM_TEMPERATURE_MAX).contains(&self.temperature) {
            return Err(Error::Config(format!(
                "temperature must be within 0.0-{}, got: {}",
                defaults::LLM_TEMPERATURE_MAX,
                self.temperature
            )));
        }

        Ok(())
    }
}

/// OpenAI-compatible gateway.
///
/// Makes exactly one POST per [`GenerationBackend::complete`] call, bounded by
/// the configured timeout, and never retries.
pub struct OpenAIBackend {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIBackend {
    /// Create a new gateway with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            base_url = %config.base_url,
            model = %config.model,
            timeout_secs = config.timeout_seconds,
            "Initializing OpenAI-compatible gateway"
        );

        Ok(Self { client, config })
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(OpenAIConfig::default())
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(OpenAIConfig::from_env())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    /// Build a request with authentication if configured.
    fn build_request(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let mut req = self.client.post(&url);

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        req.header("Content-Type", "application/json")
    }
}

/// Reject bodies that are not a well-formed, error-free envelope.
fn check_envelope(body: &str) -> Result<()> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| Error::GenerationUnavailable(format!("Malformed response envelope: {}", e)))?;

    let Some(object) = value.as_object() else {
        return Err(Error::GenerationUnavailable(
            "Malformed response envelope: expected a JSON object".to_string(),
        ));
    };

    if let Some(error) = object.get("error").filter(|e| !e.is_null()) {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(Error::GenerationUnavailable(format!(
            "Vendor reported error: {}",
            message
        )));
    }

    // Chat completions carry `choices`; Gemini-style proxies carry `candidates`.
    let has_answer_list = ["choices", "candidates"]
        .iter()
        .any(|key| object.get(*key).is_some_and(|v| v.is_array()));
    if !has_answer_list {
        return Err(Error::GenerationUnavailable(
            "Malformed response envelope: no choices or candidates".to_string(),
        ));
    }

    Ok(())
}

#[async_trait]
impl GenerationBackend for OpenAIBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let start = Instant::now();
        debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Starting generation"
        );

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            temperature: Some(self.config.temperature),
            stream: false,
        };

        let response = self
            .build_request("/chat/completions")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::GenerationUnavailable(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body: OpenAIErrorResponse = response.json().await.unwrap_or_default();
            let code = OpenAIErrorCode::from_response(status.as_u16(), &body.error.error_type);
            warn!(
                status = status.as_u16(),
                error = %body.error.message,
                "Gateway returned non-success status"
            );
            return Err(unavailable(
                code,
                &format!("{} returned {}", self.config.base_url, status),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::GenerationUnavailable(format!("Failed to read response: {}", e)))?;

        if let Err(e) = check_envelope(&body) {
            warn!(error = %e, response_len = body.len(), "Rejecting response envelope");
            return Err(e);
        }

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            response_len = body.len(),
            duration_ms = elapsed,
            "Generation complete"
        );
        if elapsed > defaults::LLM_SLOW_MS {
            warn!(
                duration_ms = elapsed,
                prompt_len = prompt.len(),
                slow = true,
                "Slow generation operation"
            );
        }
        Ok(body)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OpenAIConfig::default();
        assert_eq!(config.base_url, defaults::LLM_BASE_URL);
        assert_eq!(config.model, defaults::LLM_MODEL);
        assert_eq!(config.timeout_seconds, defaults::LLM_TIMEOUT_SECS);
        assert_eq!(config.temperature, defaults::LLM_TEMPERATURE);
        assert!(config.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = OpenAIConfig {
            base_url: "ftp://example.com".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_empty_model() {
        let config = OpenAIConfig {
            model: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = OpenAIConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_temperature_out_of_range() {
        let config = OpenAIConfig {
            temperature: 2.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = OpenAIConfig {
            temperature: -0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backend_creation() {
        let backend = OpenAIBackend::with_defaults();
        assert!(backend.is_ok());

        let backend = backend.unwrap();
        assert_eq!(backend.config().base_url, defaults::LLM_BASE_URL);
    }

    #[test]
    fn test_backend_creation_rejects_invalid_config() {
        let config = OpenAIConfig {
            base_url: "localhost".to_string(),
            ..Default::default()
        };
        assert!(OpenAIBackend::new(config).is_err());
    }

    #[test]
    fn test_model_name_accessor() {
        let config = OpenAIConfig {
            model: "test-gen".to_string(),
            ..Default::default()
        };
        let backend = OpenAIBackend::new(config).unwrap();
        assert_eq!(backend.model_name(), "test-gen");
    }

    #[test]
    fn test_check_envelope_accepts_completion() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": "[]"}}]}"#;
        assert!(check_envelope(body).is_ok());
    }

    #[test]
    fn test_check_envelope_accepts_null_error() {
        let body = r#"{"error": null, "choices": []}"#;
        assert!(check_envelope(body).is_ok());
    }

    #[test]
    fn test_check_envelope_rejects_error_object() {
        let body = r#"{"error": {"message": "overloaded", "type": "server_error"}}"#;
        match check_envelope(body) {
            Err(Error::GenerationUnavailable(msg)) => assert!(msg.contains("overloaded")),
            other => panic!("Expected GenerationUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_check_envelope_rejects_non_json() {
        assert!(check_envelope("<html>502 Bad Gateway</html>").is_err());
    }

    #[test]
    fn test_check_envelope_rejects_array() {
        assert!(check_envelope("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_check_envelope_rejects_object_without_choices() {
        assert!(matches!(
            check_envelope(r#"{"detail": "upstream said nothing"}"#),
            Err(Error::GenerationUnavailable(_))
        ));
        assert!(check_envelope("{}").is_err());
        assert!(check_envelope(r#"{"choices": "none"}"#).is_err());
    }

    #[test]
    fn test_check_envelope_accepts_candidates() {
        let body = r#"{"candidates": [{"content": {"parts": [{"text": "[]"}]}}]}"#;
        assert!(check_envelope(body).is_ok());
    }
}
