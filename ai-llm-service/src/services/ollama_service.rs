//! Lightweight Ollama service for chat and embeddings.
//!
//! Thin client for the local Ollama API:
//! - `POST {endpoint}/api/chat`: non-streaming chat (`stream=false`)
//! - `POST {endpoint}/api/embed`: embeddings retrieval
//!
//! Uses the shared [`LlmModelConfig`] and requires [`LlmProvider::Ollama`].

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, HttpError, ProviderError, ProviderErrorKind, make_snippet},
};

/// Thin client for Ollama.
#[derive(Debug)]
pub struct OllamaService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    timeout: Duration,
    url_chat: String,
    url_embed: String,
}

impl OllamaService {
    /// Creates a new [`OllamaService`] from the given config.
    ///
    /// # Errors
    /// - `InvalidProvider` if `cfg.provider` is not Ollama
    /// - `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.provider != LlmProvider::Ollama {
            return Err(ollama_err(ProviderErrorKind::InvalidProvider));
        }

        let base = cfg.base_url();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ollama_err(ProviderErrorKind::InvalidEndpoint(
                cfg.endpoint.clone(),
            )));
        }

        let timeout = cfg.timeout();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .brotli(true)
            .build()?;

        let url_chat = format!("{base}/api/chat");
        let url_embed = format!("{base}/api/embed");

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = timeout.as_secs(),
            "OllamaService initialized"
        );

        Ok(Self {
            client,
            cfg,
            timeout,
            url_chat,
            url_embed,
        })
    }

    /// Non-streaming chat via `/api/chat`.
    ///
    /// Mapped options:
    /// - `temperature` ← `cfg.temperature`
    /// - `top_p`       ← `cfg.top_p`
    /// - `num_predict` ← `cfg.max_tokens`
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn chat(&self, system: Option<&str>, user: &str) -> Result<String, AiLlmError> {
        let started = Instant::now();

        let mut messages = Vec::with_capacity(2);
        if let Some(content) = system {
            messages.push(Message {
                role: "system",
                content,
            });
        }
        messages.push(Message {
            role: "user",
            content: user,
        });

        let body = ChatRequest {
            model: &self.cfg.model,
            messages,
            stream: false,
            options: Options {
                temperature: self.cfg.temperature,
                top_p: self.cfg.top_p,
                num_predict: self.cfg.max_tokens,
            },
        };

        debug!(prompt_len = user.len(), "POST {}", self.url_chat);
        let out: ChatResponse = self.post_json(&self.url_chat, &body, started).await?;

        let content = out
            .message
            .map(|m| m.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ollama_err(ProviderErrorKind::EmptyChoices))?;

        info!(latency_ms = started.elapsed().as_millis(), "chat completed");
        Ok(content)
    }

    /// Embeddings via `/api/embed` (first vector of `embeddings`).
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        let started = Instant::now();
        let body = EmbedRequest {
            model: &self.cfg.model,
            input,
        };

        debug!(input_len = input.len(), "POST {}", self.url_embed);
        let out: EmbedResponse = self.post_json(&self.url_embed, &body, started).await?;

        let vector = out
            .embeddings
            .into_iter()
            .next()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ollama_err(ProviderErrorKind::EmptyEmbedding))?;

        info!(
            latency_ms = started.elapsed().as_millis(),
            dim = vector.len(),
            "embeddings completed"
        );
        Ok(vector)
    }

    async fn post_json<B, T>(&self, url: &str, body: &B, started: Instant) -> Result<T, AiLlmError>
    where
        B: Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| AiLlmError::from_transport(e, self.timeout))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);
            error!(
                %status,
                %url,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "Ollama returned non-success status"
            );
            return Err(ollama_err(ProviderErrorKind::HttpStatus(HttpError {
                status,
                url: url.to_string(),
                snippet,
            })));
        }

        resp.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                AiLlmError::Timeout(self.timeout)
            } else {
                ollama_err(ProviderErrorKind::Decode(format!(
                    "{}; ensure `stream=false` is used",
                    e.without_url()
                )))
            }
        })
    }
}

fn ollama_err(kind: ProviderErrorKind) -> AiLlmError {
    ProviderError::new(LlmProvider::Ollama, kind).into()
}

/* ==========================
HTTP payloads & options
========================== */

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    stream: bool,
    options: Options,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

/// Subset of Ollama `options`.
#[derive(Debug, Default, Serialize)]
struct Options {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<MessageOut>,
}

#[derive(Debug, Deserialize)]
struct MessageOut {
    content: String,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embeddings: Vec<Vec<f32>>,
}
