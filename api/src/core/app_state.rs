use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use kb_pipeline::HelpdeskKb;
use ticket_store::VectorStore;

/// Shared state for all HTTP handlers.
///
/// Everything is built once at start-up and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    /// The question-answering pipeline.
    pub kb: Arc<HelpdeskKb>,
    /// Chat + embedding profiles, probed by `/health`.
    pub llm: Arc<LlmServiceProfiles>,
    /// Vector store, probed by `/health`.
    pub store: Arc<dyn VectorStore>,
}
