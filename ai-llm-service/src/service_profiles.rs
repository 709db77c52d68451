//! Shared LLM service with two profiles: `chat` and `embedding`.
//!
//! - Construct once at start-up, wrap in `Arc`, and pass clones to dependents.
//! - Provider clients are built eagerly, so configuration problems surface at
//!   start-up instead of on the first request.
//! - Each call is a single request: no retries, no streaming.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::{LlmServiceProfiles, configs_from_env};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfgs = configs_from_env()?;
//! let svc = Arc::new(LlmServiceProfiles::new(cfgs.chat, cfgs.embedding, Some(10))?);
//!
//! let emb = svc.embed("VPN not connecting").await?;
//! println!("Embedding dim = {}", emb.len());
//!
//! let txt = svc.chat(Some("Be concise."), "Summarize: ...").await?;
//! println!("{txt}");
//! # Ok(()) }
//! ```

use tracing::info;

use crate::{
    config::{
        default_config::configs_from_env, llm_model_config::LlmModelConfig,
        llm_provider::LlmProvider,
    },
    error_handler::AiLlmError,
    health_service::{HealthService, HealthStatus},
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

/// Provider-specific client behind one profile.
enum ProviderClient {
    OpenAI(OpenAiService),
    Ollama(OllamaService),
}

impl ProviderClient {
    fn build(cfg: &LlmModelConfig) -> Result<Self, AiLlmError> {
        Ok(match cfg.provider {
            LlmProvider::OpenAI => Self::OpenAI(OpenAiService::new(cfg.clone())?),
            LlmProvider::Ollama => Self::Ollama(OllamaService::new(cfg.clone())?),
        })
    }
}

/// Chat + embedding profiles sharing one health checker.
pub struct LlmServiceProfiles {
    chat_cfg: LlmModelConfig,
    embedding_cfg: LlmModelConfig,
    chat: ProviderClient,
    embedding: ProviderClient,
    health: HealthService,
}

impl LlmServiceProfiles {
    /// Creates the service from explicit profile configs.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if a client cannot be constructed (wrong provider,
    /// missing key, bad endpoint).
    pub fn new(
        chat: LlmModelConfig,
        embedding: LlmModelConfig,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self, AiLlmError> {
        let chat_client = ProviderClient::build(&chat)?;
        let embedding_client = ProviderClient::build(&embedding)?;

        info!(
            chat_provider = %chat.provider,
            chat_model = %chat.model,
            embedding_provider = %embedding.provider,
            embedding_model = %embedding.model,
            "LLM profiles ready"
        );

        Ok(Self {
            chat_cfg: chat,
            embedding_cfg: embedding,
            chat: chat_client,
            embedding: embedding_client,
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Builds both profiles from environment variables.
    pub fn from_env() -> Result<Self, AiLlmError> {
        let cfgs = configs_from_env()?;
        Self::new(cfgs.chat, cfgs.embedding, None)
    }

    /// Runs one chat completion with the **chat** profile.
    pub async fn chat(&self, system: Option<&str>, user: &str) -> Result<String, AiLlmError> {
        match &self.chat {
            ProviderClient::OpenAI(c) => c.chat(system, user).await,
            ProviderClient::Ollama(c) => c.chat(system, user).await,
        }
    }

    /// Computes one embedding with the **embedding** profile.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        match &self.embedding {
            ProviderClient::OpenAI(c) => c.embeddings(input).await,
            ProviderClient::Ollama(c) => c.embeddings(input).await,
        }
    }

    /// Health snapshot for the distinct profiles (identical configs are probed once).
    pub async fn health_all(&self) -> Vec<HealthStatus> {
        let mut list = vec![&self.chat_cfg];
        if self.embedding_cfg != self.chat_cfg {
            list.push(&self.embedding_cfg);
        }
        self.health.check_many(&list).await
    }

    /// `(chat, embedding)` profile configs.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (&self.chat_cfg, &self.embedding_cfg)
    }
}
