//! Default chat and embedding configs loaded from environment variables.
//!
//! Two roles are produced for the selected provider:
//!
//! - **Chat**      → answer synthesis (bounded output, low temperature)
//! - **Embedding** → question embeddings
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`          = `openai` (default) or `ollama`
//! - `LLM_MAX_TOKENS`    = max generated tokens, `1..=500` (default 500)
//! - `LLM_TEMPERATURE`   = sampling temperature, `0.0..=2.0` (default 0.2)
//! - `LLM_TIMEOUT_SECS`  = per-request timeout (default 30)
//!
//! OpenAI-specific:
//! - `OPENAI_API_KEY`         (mandatory)
//! - `OPENAI_URL`             (default `https://api.openai.com`)
//! - `OPENAI_CHAT_MODEL`      (default `gpt-4o-mini`)
//! - `OPENAI_EMBEDDING_MODEL` (default `text-embedding-3-small`)
//!
//! Ollama-specific:
//! - `OLLAMA_URL` or `OLLAMA_PORT` (mandatory)
//! - `OLLAMA_MODEL`                (mandatory, chat model)
//! - `EMBEDDING_MODEL`             (mandatory)

use crate::{
    config::{
        llm_model_config::{DEFAULT_TIMEOUT_SECS, LlmModelConfig},
        llm_provider::LlmProvider,
    },
    error_handler::{
        AiLlmError, ConfigError, EnvLookup, must_var, opt_f32, opt_u32, opt_u64, opt_var,
        process_env, validate_http_endpoint, validate_range_f32,
    },
};

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Upper bound on generated tokens for a summary.
pub const MAX_OUTPUT_TOKENS: u32 = 500;
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Chat and embedding profile configs for one deployment.
#[derive(Debug, Clone)]
pub struct ProfileConfigs {
    pub chat: LlmModelConfig,
    pub embedding: LlmModelConfig,
}

/// Knobs shared by both roles.
struct Common {
    max_tokens: u32,
    temperature: f32,
    timeout_secs: u64,
}

/// Loads both profiles from the process environment.
///
/// # Errors
/// Any [`ConfigError`] raised while reading or validating variables.
pub fn configs_from_env() -> Result<ProfileConfigs, AiLlmError> {
    configs_from_lookup(&process_env)
}

/// Loads both profiles from an arbitrary variable source.
pub fn configs_from_lookup(lookup: EnvLookup<'_>) -> Result<ProfileConfigs, AiLlmError> {
    let kind = match opt_var(lookup, "LLM_KIND") {
        Some(k) => k.parse::<LlmProvider>()?,
        None => LlmProvider::OpenAI,
    };
    let common = common(lookup)?;

    match kind {
        LlmProvider::OpenAI => openai_configs(lookup, &common),
        LlmProvider::Ollama => ollama_configs(lookup, &common),
    }
}

fn common(lookup: EnvLookup<'_>) -> Result<Common, AiLlmError> {
    let max_tokens = opt_u32(lookup, "LLM_MAX_TOKENS")?.unwrap_or(MAX_OUTPUT_TOKENS);
    if max_tokens == 0 || max_tokens > MAX_OUTPUT_TOKENS {
        return Err(ConfigError::OutOfRange {
            field: "LLM_MAX_TOKENS",
            detail: "expected 1..=500",
        }
        .into());
    }

    let temperature = opt_f32(lookup, "LLM_TEMPERATURE")?.unwrap_or(DEFAULT_TEMPERATURE);
    validate_range_f32("LLM_TEMPERATURE", "expected 0.0..=2.0", temperature, 0.0, 2.0)?;

    let timeout_secs = opt_u64(lookup, "LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(ConfigError::OutOfRange {
            field: "LLM_TIMEOUT_SECS",
            detail: "expected a positive number of seconds",
        }
        .into());
    }

    Ok(Common {
        max_tokens,
        temperature,
        timeout_secs,
    })
}

fn openai_configs(lookup: EnvLookup<'_>, common: &Common) -> Result<ProfileConfigs, AiLlmError> {
    let api_key = must_var(lookup, "OPENAI_API_KEY")?;
    let endpoint = opt_var(lookup, "OPENAI_URL").unwrap_or_else(|| DEFAULT_OPENAI_URL.into());
    validate_http_endpoint("OPENAI_URL", &endpoint)?;

    let chat_model =
        opt_var(lookup, "OPENAI_CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.into());
    let embedding_model = opt_var(lookup, "OPENAI_EMBEDDING_MODEL")
        .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.into());

    Ok(ProfileConfigs {
        chat: LlmModelConfig {
            provider: LlmProvider::OpenAI,
            model: chat_model,
            endpoint: endpoint.clone(),
            api_key: Some(api_key.clone()),
            max_tokens: Some(common.max_tokens),
            temperature: Some(common.temperature),
            top_p: None,
            timeout_secs: Some(common.timeout_secs),
        },
        embedding: LlmModelConfig {
            provider: LlmProvider::OpenAI,
            model: embedding_model,
            endpoint,
            api_key: Some(api_key),
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(common.timeout_secs),
        },
    })
}

/// Resolves the Ollama endpoint.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
fn ollama_endpoint(lookup: EnvLookup<'_>) -> Result<String, AiLlmError> {
    if let Some(url) = opt_var(lookup, "OLLAMA_URL") {
        validate_http_endpoint("OLLAMA_URL", &url)?;
        return Ok(url);
    }
    if let Some(port) = opt_var(lookup, "OLLAMA_PORT") {
        port.parse::<u16>().map_err(|_| ConfigError::InvalidNumber {
            var: "OLLAMA_PORT",
            reason: "expected u16 (1..=65535)",
        })?;
        return Ok(format!("http://localhost:{port}"));
    }
    Err(ConfigError::MissingVar("OLLAMA_URL or OLLAMA_PORT").into())
}

fn ollama_configs(lookup: EnvLookup<'_>, common: &Common) -> Result<ProfileConfigs, AiLlmError> {
    let endpoint = ollama_endpoint(lookup)?;

    Ok(ProfileConfigs {
        chat: LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: must_var(lookup, "OLLAMA_MODEL")?,
            endpoint: endpoint.clone(),
            api_key: None,
            max_tokens: Some(common.max_tokens),
            temperature: Some(common.temperature),
            top_p: None,
            timeout_secs: Some(common.timeout_secs),
        },
        embedding: LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: must_var(lookup, "EMBEDDING_MODEL")?,
            endpoint,
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(common.timeout_secs),
        },
    })
}
