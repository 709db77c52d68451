//! Helpdesk knowledge-base question answering.
//!
//! Public API: [`HelpdeskKb::ask`]. It validates the question, embeds it,
//! retrieves similar tickets (optionally filtered on one metadata field),
//! asks a chat model for a short summary and renders the final text with the
//! referenced ticket identifiers.
//!
//! The stages run strictly in sequence and each external call happens at most
//! once per question. An empty match set short-circuits before the chat model.

mod api_types;
mod config;
mod error;
mod format;
mod llm;
mod prompt;
mod retrieve;
mod synthesize;
mod ticket;

use std::sync::Arc;
use std::time::Instant;

use ticket_store::VectorStore;
use tracing::{debug, info, instrument, warn};

pub use api_types::{KbAnswer, MatchSummary};
pub use config::KbConfig;
pub use error::{EMPTY_QUESTION_MESSAGE, KbError, Stage};
pub use format::{FOOTER, HEADER, NO_RESULTS_MESSAGE, format_response};
pub use llm::{ChatModel, Embedder};
pub use prompt::{SYSTEM_PROMPT, build_user_prompt};
pub use retrieve::Retriever;
pub use synthesize::Synthesizer;
pub use ticket::{UNKNOWN_TICKET_ID, ticket_id, unique_ticket_ids};

/// The assembled pipeline. Build once, share behind `Arc`.
pub struct HelpdeskKb {
    cfg: KbConfig,
    embedder: Arc<dyn Embedder>,
    retriever: Retriever,
    synthesizer: Synthesizer,
}

impl HelpdeskKb {
    /// Wires the three providers with the given configuration.
    ///
    /// # Errors
    /// `KbError::Config` if `cfg` does not validate.
    pub fn new(
        cfg: KbConfig,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        chat: Arc<dyn ChatModel>,
    ) -> Result<Self, KbError> {
        cfg.validate()?;
        let retriever = Retriever::new(
            store,
            cfg.filter_field.clone(),
            cfg.default_top_k,
            cfg.max_top_k,
        );
        Ok(Self {
            cfg,
            embedder,
            retriever,
            synthesizer: Synthesizer::new(chat),
        })
    }

    pub fn config(&self) -> &KbConfig {
        &self.cfg
    }

    /// Answers one question.
    ///
    /// - `filter`: optional value for the configured filter field; blank means none
    /// - `top_k`: optional result count, clamped to `1..=max_top_k`
    ///
    /// # Errors
    /// - `KbError::Validation` for a blank question (no provider is called)
    /// - `KbError::Provider` naming the failing stage
    ///
    /// # Example
    /// ```no_run
    /// # use kb_pipeline::HelpdeskKb;
    /// # async fn demo(kb: &HelpdeskKb) -> Result<(), kb_pipeline::KbError> {
    /// let answer = kb.ask("VPN not connecting", Some("Cisco AnyConnect"), None).await?;
    /// println!("{}", answer.response);
    /// # Ok(()) }
    /// ```
    #[instrument(skip_all, fields(filter = filter.unwrap_or(""), top_k = ?top_k))]
    pub async fn ask(
        &self,
        question: &str,
        filter: Option<&str>,
        top_k: Option<u64>,
    ) -> Result<KbAnswer, KbError> {
        let question = question.trim();
        if question.is_empty() {
            debug!("rejecting blank question");
            return Err(KbError::empty_question());
        }
        let started = Instant::now();

        // 1) Embed
        let vector = self.embed(question).await?;

        // 2) Retrieve
        let matches = self.retriever.query(vector, filter, top_k).await?;
        if matches.is_empty() {
            info!(
                latency_ms = started.elapsed().as_millis(),
                "no matching tickets"
            );
            return Ok(KbAnswer {
                response: format_response(None, &[]),
                ticket_ids: Vec::new(),
                matches: Vec::new(),
            });
        }

        // 3) Summarize
        let summary = self
            .synthesizer
            .summarize(question, &matches, &self.cfg)
            .await?;

        // 4) Format
        let ticket_ids = unique_ticket_ids(&matches, &self.cfg.id_fields);
        let response = format_response(Some(&summary), &ticket_ids);
        let matches = matches
            .iter()
            .map(|m| MatchSummary {
                ticket_id: ticket_id(m, &self.cfg.id_fields),
                score: m.score,
            })
            .collect();

        info!(
            tickets = ticket_ids.len(),
            latency_ms = started.elapsed().as_millis(),
            "question answered"
        );
        Ok(KbAnswer {
            response,
            ticket_ids,
            matches,
        })
    }

    async fn embed(&self, question: &str) -> Result<Vec<f32>, KbError> {
        let provider = self.embedder.provider();
        let started = Instant::now();

        let vector = self
            .embedder
            .embed(question)
            .await
            .map_err(|e| KbError::provider(Stage::Embedding, provider.as_str(), e))?;

        if vector.is_empty() {
            return Err(KbError::provider(Stage::Embedding, provider, "empty embedding vector"));
        }
        if let Some(want) = self.cfg.embedding_dim {
            if vector.len() != want {
                warn!(got = vector.len(), want, "embedding dimension mismatch");
                return Err(KbError::provider(
                    Stage::Embedding,
                    provider,
                    format!("embedding dimension mismatch: got {}, want {want}", vector.len()),
                ));
            }
        }

        debug!(
            %provider,
            dim = vector.len(),
            latency_ms = started.elapsed().as_millis(),
            "question embedded"
        );
        Ok(vector)
    }
}
