//! Typed error for the kb-pipeline crate.

use std::fmt;

use thiserror::Error;

/// Text shown when the question is empty after trimming.
pub const EMPTY_QUESTION_MESSAGE: &str = "Please enter a question.";

/// Pipeline stage that talks to an external provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Embedding,
    Retrieval,
    Summarization,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Embedding => "embedding",
            Self::Retrieval => "retrieval",
            Self::Summarization => "summarization",
        })
    }
}

/// Every failure is terminal for the request; nothing is retried.
#[derive(Debug, Error)]
pub enum KbError {
    /// User input rejected before any external call.
    #[error("{0}")]
    Validation(String),

    /// An external provider failed, timed out, or answered with something unusable.
    #[error("{stage} failed ({provider}): {message}")]
    Provider {
        stage: Stage,
        provider: String,
        message: String,
    },

    /// Invalid pipeline configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl KbError {
    pub fn empty_question() -> Self {
        Self::Validation(EMPTY_QUESTION_MESSAGE.to_string())
    }

    pub fn provider(stage: Stage, provider: impl Into<String>, message: impl ToString) -> Self {
        Self::Provider {
            stage,
            provider: provider.into(),
            message: message.to_string(),
        }
    }

    /// Stage of a provider failure, if this is one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Provider { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
