//! The backend-agnostic search seam.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::StoreConfig;
use crate::errors::StoreError;
use crate::pinecone::PineconeStore;
use crate::qdrant_facade::QdrantFacade;
use crate::record::{MetadataFilter, StoreHealth, TicketMatch};

/// A hosted vector index holding helpdesk tickets.
///
/// Implementations always request metadata inline; a hit without metadata is
/// returned with an empty map, never dropped.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Short backend name used in logs and errors (e.g. `"qdrant"`).
    fn backend(&self) -> &'static str;

    /// Returns up to `top_k` nearest records, descending by similarity.
    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<TicketMatch>, StoreError>;

    /// Best-effort reachability probe; never fails.
    async fn health(&self) -> StoreHealth;
}

/// Builds the configured backend.
///
/// For Pinecone without an explicit host this performs one control-plane call
/// to resolve the index host.
pub async fn connect(cfg: &StoreConfig) -> Result<Arc<dyn VectorStore>, StoreError> {
    let store: Arc<dyn VectorStore> = match cfg {
        StoreConfig::Qdrant(c) => Arc::new(QdrantFacade::new(c)?),
        StoreConfig::Pinecone(c) => Arc::new(PineconeStore::connect(c).await?),
    };
    info!(backend = store.backend(), "vector store ready");
    Ok(store)
}
