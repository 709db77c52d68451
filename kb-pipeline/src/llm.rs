//! Provider seams for embeddings and chat completion.
//!
//! Both traits are object-safe so the pipeline holds `Arc<dyn ...>` and tests
//! can inject fakes. [`LlmServiceProfiles`] implements both.

use ai_llm_service::{AiLlmError, LlmServiceProfiles};
use async_trait::async_trait;

/// Free text → fixed-length vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Provider label for logs and errors (never a credential).
    fn provider(&self) -> String;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, AiLlmError>;
}

/// One non-streaming chat completion.
#[async_trait]
pub trait ChatModel: Send + Sync {
    fn provider(&self) -> String;

    async fn complete(&self, system: &str, user: &str) -> Result<String, AiLlmError>;
}

#[async_trait]
impl Embedder for LlmServiceProfiles {
    fn provider(&self) -> String {
        let (_, emb) = self.profiles();
        format!("{}/{}", emb.provider, emb.model)
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, AiLlmError> {
        LlmServiceProfiles::embed(self, text).await
    }
}

#[async_trait]
impl ChatModel for LlmServiceProfiles {
    fn provider(&self) -> String {
        let (chat, _) = self.profiles();
        format!("{}/{}", chat.provider, chat.model)
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, AiLlmError> {
        self.chat(Some(system), user).await
    }
}
