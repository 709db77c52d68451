use std::{fmt, time::Duration};

use crate::config::llm_provider::LlmProvider;

/// Default per-request timeout for every provider call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for one model invocation profile.
///
/// # Fields
///
/// - `provider`: backend serving the model (OpenAI or Ollama).
/// - `model`: model identifier (e.g. `"gpt-4o-mini"`, `"text-embedding-3-small"`).
/// - `endpoint`: base URL of the provider, without the API path.
/// - `api_key`: bearer token for providers that require one. Never printed.
/// - `max_tokens`: upper bound on generated tokens (chat only).
/// - `temperature`: sampling temperature (chat only).
/// - `top_p`: nucleus sampling cutoff (chat only).
/// - `timeout_secs`: request timeout; [`DEFAULT_TIMEOUT_SECS`] when `None`.
///
/// # Examples
///
/// ```
/// use ai_llm_service::{LlmModelConfig, LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::OpenAI,
///     model: "gpt-4o-mini".to_string(),
///     endpoint: "https://api.openai.com".to_string(),
///     api_key: Some("sk-...".to_string()),
///     max_tokens: Some(500),
///     temperature: Some(0.2),
///     top_p: None,
///     timeout_secs: Some(30),
/// };
/// assert!(!format!("{cfg:?}").contains("sk-"));
/// ```
#[derive(Clone, PartialEq)]
pub struct LlmModelConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Effective request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Endpoint with surrounding whitespace and trailing slashes removed.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim().trim_end_matches('/')
    }
}

impl fmt::Debug for LlmModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmModelConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
