//! Health probes for chat/embedding backends (Ollama, OpenAI).
//!
//! - Ollama: `GET {endpoint}/api/tags` (best-effort model existence check)
//! - OpenAI: `GET {endpoint}/v1/models/{model}` with Bearer auth
//!
//! [`HealthService::check`] never fails: errors are folded into `ok = false`,
//! which is what a `/health` endpoint wants.

use std::time::{Duration, Instant};

use reqwest::{StatusCode, header};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{AiLlmError, HealthError, HttpError, make_snippet};

/// A serializable health snapshot for one provider/config.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Backend name (e.g. "OpenAI").
    pub provider: String,
    /// Endpoint base URL.
    pub endpoint: String,
    pub model: String,
    pub ok: bool,
    pub latency_ms: u128,
    /// Short human-readable detail.
    pub message: String,
}

impl HealthStatus {
    fn new(cfg: &LlmModelConfig, ok: bool, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            provider: cfg.provider.to_string(),
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            ok,
            latency_ms,
            message: message.into(),
        }
    }
}

/// Health checker reusing a single HTTP client.
pub struct HealthService {
    client: reqwest::Client,
    default_timeout: Duration,
}

impl HealthService {
    /// Creates a new health service with an optional client timeout (seconds, default 10).
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, AiLlmError> {
        let default_timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder()
            .timeout(default_timeout)
            .build()?;

        Ok(Self {
            client,
            default_timeout,
        })
    }

    /// Checks one config, routing to the provider-specific probe.
    pub async fn check(&self, cfg: &LlmModelConfig) -> HealthStatus {
        let start = Instant::now();
        let result = match cfg.provider {
            LlmProvider::Ollama => self.probe_ollama(cfg).await,
            LlmProvider::OpenAI => self.probe_openai(cfg).await,
        };

        let status = match result {
            Ok(status) => status,
            Err(err) => HealthStatus::new(cfg, false, start.elapsed().as_millis(), err.to_string()),
        };

        if status.ok {
            info!(
                provider = %status.provider,
                model = %status.model,
                latency_ms = status.latency_ms,
                "health probe completed"
            );
        } else {
            warn!(
                provider = %status.provider,
                model = %status.model,
                latency_ms = status.latency_ms,
                message = %status.message,
                "health probe failed"
            );
        }
        status
    }

    /// Checks several configs sequentially.
    pub async fn check_many(&self, configs: &[&LlmModelConfig]) -> Vec<HealthStatus> {
        debug!(count = configs.len(), "running health probes");
        let mut out = Vec::with_capacity(configs.len());
        for cfg in configs {
            out.push(self.check(cfg).await);
        }
        out
    }

    fn timeout_for(&self, cfg: &LlmModelConfig) -> Duration {
        cfg.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(self.default_timeout)
    }

    /// `GET /api/tags`, then look for the configured model among the tags.
    async fn probe_ollama(&self, cfg: &LlmModelConfig) -> Result<HealthStatus, AiLlmError> {
        #[derive(Deserialize)]
        struct Tag {
            name: String,
        }
        #[derive(Deserialize)]
        struct Tags {
            #[serde(default)]
            models: Vec<Tag>,
        }

        let url = format!("{}/api/tags", cfg.base_url());
        let timeout = self.timeout_for(cfg);
        let start = Instant::now();
        debug!(provider = "Ollama", "GET {}", url);

        let resp = self
            .client
            .get(&url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| AiLlmError::from_transport(e, timeout))?;
        let latency = start.elapsed().as_millis();
        let resp = ensure_success(resp, &url).await?;

        let msg = match resp.json::<Tags>().await {
            Ok(tags) if tags.models.iter().any(|m| m.name == cfg.model) => {
                return Ok(HealthStatus::new(cfg, true, latency, "model is available"));
            }
            Ok(_) => "Ollama is up, but model not found in /api/tags".to_string(),
            Err(e) => format!("Ollama is reachable; failed to decode /api/tags: {e}"),
        };
        Ok(HealthStatus::new(cfg, false, latency, msg))
    }

    /// `GET /v1/models/{model}` with the profile's bearer key.
    async fn probe_openai(&self, cfg: &LlmModelConfig) -> Result<HealthStatus, AiLlmError> {
        let url = format!("{}/v1/models/{}", cfg.base_url(), cfg.model);
        let timeout = self.timeout_for(cfg);

        let key = cfg
            .api_key
            .as_deref()
            .ok_or_else(|| HealthError::Misconfigured("missing OpenAI API key".into()))?;
        let mut auth = header::HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|_| HealthError::Misconfigured("API key is not a valid header value".into()))?;
        auth.set_sensitive(true);

        let start = Instant::now();
        debug!(provider = "OpenAI", "GET {}", url);

        let resp = self
            .client
            .get(&url)
            .timeout(timeout)
            .header(header::AUTHORIZATION, auth)
            .send()
            .await
            .map_err(|e| AiLlmError::from_transport(e, timeout))?;
        let latency = start.elapsed().as_millis();

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(HealthStatus::new(
                cfg,
                false,
                latency,
                "OpenAI is up, but model is not available for this key",
            ));
        }
        ensure_success(resp, &url).await?;
        Ok(HealthStatus::new(cfg, true, latency, "model is available"))
    }
}

async fn ensure_success(resp: reqwest::Response, url: &str) -> Result<reqwest::Response, AiLlmError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    Err(HealthError::HttpStatus(HttpError {
        status,
        url: url.to_string(),
        snippet: make_snippet(&text),
    })
    .into())
}
