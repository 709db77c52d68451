//! Unified error handling for `ai-llm-service`.
//!
//! This module exposes a single top-level error type [`AiLlmError`] for the whole
//! library, and groups domain-specific errors in nested enums ([`ConfigError`],
//! [`ProviderError`], [`HealthError`]). Small helpers for reading and validating
//! configuration values are provided and return the unified [`Result<T>`] alias.
//!
//! All messages include the prefix `[AI LLM Service]` to simplify attribution in logs.
//! None of them carry API keys: credentials only ever travel in request headers.

use std::{fmt, time::Duration};

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::llm_provider::LlmProvider;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AiLlmError>;

/// Source of configuration values (process environment in production, a map in tests).
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Maximum number of body characters kept in error snippets.
const SNIPPET_CHARS: usize = 240;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `ai-llm-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiLlmError {
    /// Configuration/validation errors (startup).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Provider rejected the request or answered with something unusable.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Health-check errors.
    #[error(transparent)]
    Health(#[from] HealthError),

    /// Underlying HTTP transport error (connection refused, TLS, ...).
    #[error("[AI LLM Service] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),

    /// Request exceeded the configured timeout.
    #[error("[AI LLM Service] operation timed out after {0:?}")]
    Timeout(Duration),
}

impl AiLlmError {
    /// Maps a `reqwest` send/decode failure, classifying timeouts separately.
    pub fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::HttpTransport(err.without_url())
        }
    }

    /// Returns `true` when the failure was a timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::HttpTransport(e) => e.is_timeout(),
            _ => false,
        }
    }
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Errors raised while loading or validating provider configuration.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required variable is missing or empty.
    #[error("[AI LLM Service] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (ports, limits, timeouts).
    #[error("[AI LLM Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },

    /// Unsupported provider in `LLM_KIND`.
    #[error("[AI LLM Service] unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Value had the wrong format (e.g. invalid URL).
    #[error("[AI LLM Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        var: &'static str,
        reason: &'static str,
    },

    /// A numeric field was outside of the allowed range.
    #[error("[AI LLM Service] {field} is out of range: {detail}")]
    OutOfRange {
        field: &'static str,
        detail: &'static str,
    },
}

/* ------------------------------------------------------------------------- */
/* Provider errors                                                           */
/* ------------------------------------------------------------------------- */

/// Non-2xx answer captured from a provider.
#[derive(Debug, Clone)]
pub struct HttpError {
    pub status: StatusCode,
    pub url: String,
    /// Short, single-line excerpt of the response body.
    pub snippet: String,
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {} from {}: {}", self.status, self.url, self.snippet)
    }
}

/// What went wrong with a provider call.
#[non_exhaustive]
#[derive(Debug)]
pub enum ProviderErrorKind {
    /// The config was handed to a client of another provider.
    InvalidProvider,
    /// The provider requires an API key and none was configured.
    MissingApiKey,
    /// Endpoint is empty or lacks an http/https scheme.
    InvalidEndpoint(String),
    /// Provider answered with a non-success status.
    HttpStatus(HttpError),
    /// Payload could not be decoded into the expected shape.
    Decode(String),
    /// Chat completion returned no usable choice.
    EmptyChoices,
    /// Embedding response carried no vector.
    EmptyEmbedding,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidProvider => f.write_str("config targets a different provider"),
            Self::MissingApiKey => f.write_str("API key is not configured"),
            Self::InvalidEndpoint(e) => write!(f, "invalid endpoint `{e}`"),
            Self::HttpStatus(h) => write!(f, "{h}"),
            Self::Decode(m) => write!(f, "failed to decode response: {m}"),
            Self::EmptyChoices => f.write_str("no choices in chat completion response"),
            Self::EmptyEmbedding => f.write_str("no embedding in response"),
        }
    }
}

/// Provider-scoped failure.
#[derive(Debug, Error)]
#[error("[AI LLM Service] {provider}: {kind}")]
pub struct ProviderError {
    pub provider: LlmProvider,
    pub kind: ProviderErrorKind,
}

impl ProviderError {
    pub fn new(provider: LlmProvider, kind: ProviderErrorKind) -> Self {
        Self { provider, kind }
    }
}

/* ------------------------------------------------------------------------- */
/* Health errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for provider health probes.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum HealthError {
    /// Upstream returned a non-successful HTTP status.
    #[error("[AI LLM Service] health probe failed: {0}")]
    HttpStatus(HttpError),

    /// Probe could not be built (e.g. missing key).
    #[error("[AI LLM Service] health probe misconfigured: {0}")]
    Misconfigured(String),
}

/* ------------------------------------------------------------------------- */
/* Helpers                                                                   */
/* ------------------------------------------------------------------------- */

/// Compacts a response body into a short single-line snippet for errors and logs.
pub fn make_snippet(body: &str) -> String {
    let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= SNIPPET_CHARS {
        flat
    } else {
        let mut s: String = flat.chars().take(SNIPPET_CHARS).collect();
        s.push('…');
        s
    }
}

/// Reads a variable from the process environment.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Returns the trimmed value if present and non-empty.
pub fn opt_var(lookup: EnvLookup<'_>, name: &str) -> Option<String> {
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Fetches a required, non-empty variable.
///
/// # Errors
/// [`ConfigError::MissingVar`] if the variable is absent or blank.
pub fn must_var(lookup: EnvLookup<'_>, name: &'static str) -> Result<String> {
    opt_var(lookup, name).ok_or_else(|| ConfigError::MissingVar(name).into())
}

/// Parses an optional `u32` (`Ok(None)` if unset/blank).
pub fn opt_u32(lookup: EnvLookup<'_>, name: &'static str) -> Result<Option<u32>> {
    parse_opt(lookup, name, "expected u32")
}

/// Parses an optional `u64` (`Ok(None)` if unset/blank).
pub fn opt_u64(lookup: EnvLookup<'_>, name: &'static str) -> Result<Option<u64>> {
    parse_opt(lookup, name, "expected u64")
}

/// Parses an optional `f32` (`Ok(None)` if unset/blank).
pub fn opt_f32(lookup: EnvLookup<'_>, name: &'static str) -> Result<Option<f32>> {
    parse_opt(lookup, name, "expected a floating-point number")
}

fn parse_opt<T: std::str::FromStr>(
    lookup: EnvLookup<'_>,
    name: &'static str,
    reason: &'static str,
) -> Result<Option<T>> {
    match opt_var(lookup, name) {
        Some(v) => v
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { var: name, reason }.into()),
        None => Ok(None),
    }
}

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

/// Validates that a floating-point value lies within `[min, max]`.
pub fn validate_range_f32(
    field: &'static str,
    detail: &'static str,
    value: f32,
    min: f32,
    max: f32,
) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, detail }.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_is_flattened_and_bounded() {
        let body = format!("line one\n\n  line two {}", "x".repeat(500));
        let s = make_snippet(&body);
        assert!(s.starts_with("line one line two"));
        assert!(!s.contains('\n'));
        assert_eq!(s.chars().count(), SNIPPET_CHARS + 1);
    }

    #[test]
    fn blank_values_count_as_missing() {
        let lookup = |name: &str| (name == "BLANK").then(|| "   ".to_string());
        assert!(opt_var(&lookup, "BLANK").is_none());
        assert!(matches!(
            must_var(&lookup, "BLANK"),
            Err(AiLlmError::Config(ConfigError::MissingVar("BLANK")))
        ));
    }

    #[test]
    fn bad_numbers_are_reported_with_variable_name() {
        let lookup = |_: &str| Some("ten".to_string());
        let err = opt_u32(&lookup, "LLM_MAX_TOKENS").unwrap_err();
        assert!(err.to_string().contains("LLM_MAX_TOKENS"));
    }

    #[test]
    fn provider_error_names_the_provider() {
        let err = ProviderError::new(LlmProvider::OpenAI, ProviderErrorKind::EmptyChoices);
        assert_eq!(
            err.to_string(),
            "[AI LLM Service] OpenAI: no choices in chat completion response"
        );
    }
}
