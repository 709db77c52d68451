//! OpenAI service for chat completion and embeddings.
//!
//! Minimal, non-streaming client around the OpenAI REST API.
//! Endpoints are derived from `LlmModelConfig::endpoint`:
//! - POST {endpoint}/v1/chat/completions: chat completion
//! - POST {endpoint}/v1/embeddings: embeddings retrieval
//!
//! Constructor validation:
//! - `cfg.provider` must be `LlmProvider::OpenAI`
//! - `cfg.api_key` must be present
//! - `cfg.endpoint` must start with http:// or https://

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, HttpError, ProviderError, ProviderErrorKind, make_snippet},
};

/// Thin client for the OpenAI API.
///
/// Keeps a preconfigured `reqwest::Client` with the bearer header and the
/// profile timeout baked in.
#[derive(Debug)]
pub struct OpenAiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    timeout: Duration,
    url_chat: String,
    url_embeddings: String,
}

impl OpenAiService {
    /// Creates a new [`OpenAiService`] from the given config.
    ///
    /// # Errors
    /// - `InvalidProvider` if `cfg.provider` is not OpenAI
    /// - `MissingApiKey` if `cfg.api_key` is `None`
    /// - `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.provider != LlmProvider::OpenAI {
            return Err(openai_err(ProviderErrorKind::InvalidProvider));
        }

        let api_key = cfg
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| openai_err(ProviderErrorKind::MissingApiKey))?;

        let base = cfg.base_url();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(openai_err(ProviderErrorKind::InvalidEndpoint(
                cfg.endpoint.clone(),
            )));
        }

        let mut auth = header::HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| openai_err(ProviderErrorKind::Decode("API key is not a valid header value".into())))?;
        auth.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);

        let timeout = cfg.timeout();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let url_chat = format!("{base}/v1/chat/completions");
        let url_embeddings = format!("{base}/v1/embeddings");

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = timeout.as_secs(),
            "OpenAiService initialized"
        );

        Ok(Self {
            client,
            cfg,
            timeout,
            url_chat,
            url_embeddings,
        })
    }

    /// Performs a single non-streaming chat completion.
    ///
    /// Messages: optional `system`, then `user`. Mapped options from config:
    /// `model`, `temperature`, `top_p`, `max_tokens`.
    ///
    /// # Errors
    /// - `HttpStatus` for non-2xx responses
    /// - [`AiLlmError::Timeout`] / [`AiLlmError::HttpTransport`] for network failures
    /// - `Decode` / `EmptyChoices` for unusable payloads
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn chat(&self, system: Option<&str>, user: &str) -> Result<String, AiLlmError> {
        let started = Instant::now();
        let body = ChatCompletionRequest::from_cfg(&self.cfg, system, user);

        debug!(
            prompt_len = user.len(),
            has_system = system.is_some(),
            "POST {}", self.url_chat
        );

        let out: ChatCompletionResponse = self.post_json(&self.url_chat, &body, started).await?;

        let content = out
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| openai_err(ProviderErrorKind::EmptyChoices))?;

        info!(
            latency_ms = started.elapsed().as_millis(),
            answer_len = content.len(),
            "chat completion completed"
        );
        Ok(content)
    }

    /// Retrieves a single embeddings vector via `/v1/embeddings`.
    ///
    /// # Errors
    /// Same classes as [`OpenAiService::chat`]; `EmptyEmbedding` if `data` is empty.
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        let started = Instant::now();
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            input,
        };

        debug!(input_len = input.len(), "POST {}", self.url_embeddings);

        let out: EmbeddingsResponse =
            self.post_json(&self.url_embeddings, &body, started).await?;

        let vector = out
            .data
            .into_iter()
            .next()
            .map(|item| item.embedding)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| openai_err(ProviderErrorKind::EmptyEmbedding))?;

        info!(
            latency_ms = started.elapsed().as_millis(),
            dim = vector.len(),
            "embeddings completed"
        );
        Ok(vector)
    }

    /// Model served by this client.
    pub fn model(&self) -> &str {
        &self.cfg.model
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
                "OpenAI returned non-success status"
            );

            return Err(openai_err(ProviderErrorKind::HttpStatus(HttpError {
                status,
                url: url.to_string(),
                snippet,
            })));
        }

        resp.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                AiLlmError::Timeout(self.timeout)
            } else {
                error!(error = %e, %url, "failed to decode OpenAI response");
                openai_err(ProviderErrorKind::Decode(e.without_url().to_string()))
            }
        })
    }
}

fn openai_err(kind: ProviderErrorKind) -> AiLlmError {
    ProviderError::new(LlmProvider::OpenAI, kind).into()
}

/* ===========================================================================
HTTP payloads
======================================================================== */

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl<'a> ChatCompletionRequest<'a> {
    fn from_cfg(cfg: &'a LlmModelConfig, system: Option<&'a str>, user: &'a str) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(content) = system {
            messages.push(ChatMessage {
                role: "system",
                content,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: user,
        });

        Self {
            model: &cfg.model,
            messages,
            temperature: cfg.temperature,
            top_p: cfg.top_p,
            max_tokens: cfg.max_tokens,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    #[serde(default)]
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn cfg(endpoint: &str, model: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::OpenAI,
            model: model.into(),
            endpoint: endpoint.into(),
            api_key: Some("sk-test".into()),
            max_tokens: Some(500),
            temperature: Some(0.2),
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[tokio::test]
    async fn chat_sends_system_and_user_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-4o-mini",
                "max_tokens": 500,
                "messages": [
                    { "role": "system", "content": "be brief" },
                    { "role": "user", "content": "hello" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [ { "message": { "role": "assistant", "content": "  hi there  " } } ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let svc = OpenAiService::new(cfg(&server.uri(), "gpt-4o-mini")).unwrap();
        let out = svc.chat(Some("be brief"), "hello").await.unwrap();
        assert_eq!(out, "  hi there  ");
    }

    #[tokio::test]
    async fn chat_maps_unauthorized_to_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("{\"error\":\"bad key\"}"))
            .mount(&server)
            .await;

        let svc = OpenAiService::new(cfg(&server.uri(), "gpt-4o-mini")).unwrap();
        let err = svc.chat(None, "hello").await.unwrap_err();
        match err {
            AiLlmError::Provider(ProviderError {
                provider: LlmProvider::OpenAI,
                kind: ProviderErrorKind::HttpStatus(h),
            }) => {
                assert_eq!(h.status.as_u16(), 401);
                assert!(!h.snippet.contains("sk-test"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn chat_without_content_is_empty_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let svc = OpenAiService::new(cfg(&server.uri(), "gpt-4o-mini")).unwrap();
        let err = svc.chat(None, "hello").await.unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::EmptyChoices,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn slow_upstream_is_reported_as_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(3))
                    .set_body_json(json!({ "data": [ { "embedding": [0.1] } ] })),
            )
            .mount(&server)
            .await;

        let mut c = cfg(&server.uri(), "text-embedding-3-small");
        c.timeout_secs = Some(1);
        let svc = OpenAiService::new(c).unwrap();
        let err = svc.embeddings("vpn").await.unwrap_err();
        assert!(err.is_timeout(), "expected timeout, got {err:?}");
    }

    #[tokio::test]
    async fn embeddings_return_first_vector() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .and(body_partial_json(json!({
                "model": "text-embedding-3-small",
                "input": "VPN not connecting"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [ { "index": 0, "embedding": [0.25, -0.5, 1.0] } ]
            })))
            .mount(&server)
            .await;

        let svc = OpenAiService::new(cfg(&server.uri(), "text-embedding-3-small")).unwrap();
        let v = svc.embeddings("VPN not connecting").await.unwrap();
        assert_eq!(v, vec![0.25, -0.5, 1.0]);
    }

    #[test]
    fn constructor_requires_api_key() {
        let mut c = cfg("https://api.openai.com", "gpt-4o-mini");
        c.api_key = Some("  ".into());
        let err = OpenAiService::new(c).unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::MissingApiKey,
                ..
            })
        ));
    }

    #[test]
    fn constructor_rejects_other_providers() {
        let mut c = cfg("http://localhost:11434", "llama3");
        c.provider = LlmProvider::Ollama;
        assert!(OpenAiService::new(c).is_err());
    }
}
