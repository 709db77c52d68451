//! Filtered top-K retrieval on top of a [`VectorStore`].

use std::sync::Arc;
use std::time::Instant;

use ticket_store::{MetadataFilter, TicketMatch, VectorStore};
use tracing::{debug, info, warn};

use crate::error::{KbError, Stage};

/// Applies the result-count bounds and the optional equality filter.
pub struct Retriever {
    store: Arc<dyn VectorStore>,
    filter_field: String,
    default_top_k: u64,
    max_top_k: u64,
}

impl Retriever {
    pub fn new(
        store: Arc<dyn VectorStore>,
        filter_field: impl Into<String>,
        default_top_k: u64,
        max_top_k: u64,
    ) -> Self {
        let max_top_k = max_top_k.max(1);
        Self {
            store,
            filter_field: filter_field.into(),
            default_top_k: default_top_k.clamp(1, max_top_k),
            max_top_k,
        }
    }

    /// Effective result count: the default when `None`, otherwise clamped to `1..=max`.
    pub fn effective_top_k(&self, requested: Option<u64>) -> u64 {
        match requested {
            None => self.default_top_k,
            Some(k) => {
                let bounded = k.clamp(1, self.max_top_k);
                if bounded != k {
                    warn!(requested = k, used = bounded, max = self.max_top_k, "top_k clamped");
                }
                bounded
            }
        }
    }

    /// Returns at most `top_k` matches, best first.
    ///
    /// A blank or absent `filter_value` searches the whole index.
    pub async fn query(
        &self,
        vector: Vec<f32>,
        filter_value: Option<&str>,
        top_k: Option<u64>,
    ) -> Result<Vec<TicketMatch>, KbError> {
        let top_k = self.effective_top_k(top_k);
        let filter = MetadataFilter::from_input(self.filter_field.as_str(), filter_value);
        let started = Instant::now();

        debug!(
            top_k,
            filter = filter.as_ref().map(|f| f.value.as_str()).unwrap_or(""),
            field = %self.filter_field,
            "retrieving tickets"
        );

        let mut matches = self
            .store
            .query(vector, top_k, filter.as_ref())
            .await
            .map_err(|e| KbError::provider(Stage::Retrieval, self.store.backend(), e))?;

        if matches.len() as u64 > top_k {
            warn!(
                returned = matches.len(),
                top_k, "store returned more matches than requested; truncating"
            );
            matches.truncate(top_k as usize);
        }

        info!(
            hits = matches.len(),
            top_k,
            latency_ms = started.elapsed().as_millis(),
            "retrieval completed"
        );
        for m in &matches {
            debug!(id = m.id.as_deref().unwrap_or(""), score = m.score, "match");
        }
        Ok(matches)
    }
}
