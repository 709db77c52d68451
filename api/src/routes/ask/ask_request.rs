use serde::Deserialize;

/// Request payload for `POST /ask`.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Natural language question.
    pub question: String,
    /// Optional tool name matched against the filter field (e.g. `CF_VMS`).
    #[serde(default)]
    pub filter: Option<String>,
    /// Optional result count; clamped to the configured bounds.
    #[serde(default)]
    pub top_k: Option<u64>,
}
