//! One chat completion over the retrieved tickets.

use std::sync::Arc;
use std::time::Instant;

use ticket_store::TicketMatch;
use tracing::{debug, info};

use crate::config::KbConfig;
use crate::error::{KbError, Stage};
use crate::llm::ChatModel;
use crate::prompt::{SYSTEM_PROMPT, build_user_prompt};

pub struct Synthesizer {
    chat: Arc<dyn ChatModel>,
}

impl Synthesizer {
    pub fn new(chat: Arc<dyn ChatModel>) -> Self {
        Self { chat }
    }

    /// Returns the trimmed summary. Must not be called with an empty match set.
    ///
    /// # Errors
    /// `KbError::Provider` (summarization) on provider failure or blank output.
    pub async fn summarize(
        &self,
        question: &str,
        matches: &[TicketMatch],
        cfg: &KbConfig,
    ) -> Result<String, KbError> {
        let user = build_user_prompt(question, matches, cfg);
        let provider = self.chat.provider();
        let started = Instant::now();
        debug!(%provider, prompt_chars = user.len(), records = matches.len(), "summarizing");

        let text = self
            .chat
            .complete(SYSTEM_PROMPT, &user)
            .await
            .map_err(|e| KbError::provider(Stage::Summarization, provider.as_str(), e))?;

        let summary = text.trim();
        if summary.is_empty() {
            return Err(KbError::provider(
                Stage::Summarization,
                provider,
                "model returned an empty summary",
            ));
        }

        info!(
            %provider,
            summary_chars = summary.len(),
            latency_ms = started.elapsed().as_millis(),
            "summary ready"
        );
        Ok(summary.to_string())
    }
}
