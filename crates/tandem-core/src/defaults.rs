//! Centralized default constants for tandem.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers.

// =============================================================================
// GATEWAY
// =============================================================================

/// Default OpenAI-compatible API endpoint.
pub const LLM_BASE_URL: &str = "https://api.openai.com/v1";

/// Default generation model.
pub const LLM_MODEL: &str = "gpt-4o-mini";

/// Timeout for the single generation request in seconds.
pub const LLM_TIMEOUT_SECS: u64 = 60;

/// Fixed sampling temperature sent with every generation request.
pub const LLM_TEMPERATURE: f32 = 0.7;

/// Upper bound accepted for a configured temperature.
pub const LLM_TEMPERATURE_MAX: f32 = 2.0;

/// Generation calls slower than this are logged as slow (milliseconds).
pub const LLM_SLOW_MS: u64 = 30_000;

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Environment variable for the gateway base URL.
pub const ENV_LLM_BASE_URL: &str = "TANDEM_LLM_BASE_URL";

/// Environment variable for the gateway API key.
pub const ENV_LLM_API_KEY: &str = "TANDEM_LLM_API_KEY";

/// Environment variable for the generation model.
pub const ENV_LLM_MODEL: &str = "TANDEM_LLM_MODEL";

/// Environment variable for the request timeout in seconds.
pub const ENV_LLM_TIMEOUT_SECS: &str = "TANDEM_LLM_TIMEOUT_SECS";

/// Environment variable for the sampling temperature.
pub const ENV_LLM_TEMPERATURE: &str = "TANDEM_LLM_TEMPERATURE";

// =============================================================================
// BATCH SIZING
// =============================================================================

/// Activities requested for an extended outing.
pub const EXTENDED_ACTIVITY_COUNT: usize = 3;

/// Activities requested for every other duration window.
pub const SINGLE_ACTIVITY_COUNT: usize = 1;
