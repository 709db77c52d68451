//! Unified error types for the crate.

use std::time::Duration;

use thiserror::Error;

/// Top-level error for ticket-store operations.
///
/// Messages never carry API keys; credentials travel in request headers only.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Qdrant client errors (wrapped).
    #[error("qdrant error: {0}")]
    Qdrant(String),

    /// Non-success HTTP status from a REST backend.
    #[error("{backend} returned HTTP {status} for {url}: {snippet}")]
    HttpStatus {
        backend: &'static str,
        status: u16,
        url: String,
        snippet: String,
    },

    /// Network-level failure (DNS, TLS, connection reset).
    #[error("{backend} transport error: {source}")]
    Transport {
        backend: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The backend did not answer within the configured timeout.
    #[error("{backend} request timed out after {timeout:?}")]
    Timeout {
        backend: &'static str,
        timeout: Duration,
    },

    /// Response body could not be decoded.
    #[error("{backend} returned an undecodable response: {reason}")]
    Decode {
        backend: &'static str,
        reason: String,
    },
}

impl StoreError {
    /// Maps a `reqwest` send/decode failure, separating timeouts from other transport errors.
    pub(crate) fn from_reqwest(backend: &'static str, err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout { backend, timeout }
        } else if err.is_decode() {
            Self::Decode {
                backend,
                reason: err.without_url().to_string(),
            }
        } else {
            Self::Transport {
                backend,
                source: err.without_url(),
            }
        }
    }

    /// True when the failure was a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Compacts a response body into a short single-line snippet.
pub(crate) fn make_snippet(body: &str) -> String {
    const MAX: usize = 240;
    let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= MAX {
        flat
    } else {
        let mut s: String = flat.chars().take(MAX).collect();
        s.push('…');
        s
    }
}
