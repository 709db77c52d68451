//! Shared chat-completion and embedding providers.
//!
//! The crate exposes one facade, [`service_profiles::LlmServiceProfiles`], that
//! owns two logical profiles:
//!
//! - **chat**      → answer synthesis via a chat-completion model
//! - **embedding** → question embeddings for vector search
//!
//! Each profile is backed by either OpenAI or Ollama. Provider clients are
//! built once at construction time and reused for every call.

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;

pub use config::{
    default_config::{ProfileConfigs, configs_from_env, configs_from_lookup},
    llm_model_config::LlmModelConfig,
    llm_provider::LlmProvider,
};
pub use error_handler::{
    AiLlmError, ConfigError, EnvLookup, HealthError, ProviderError, ProviderErrorKind, opt_var,
};
pub use health_service::{HealthService, HealthStatus};
pub use service_profiles::LlmServiceProfiles;
