//! Public API types re-used by external crates (e.g., the HTTP API layer).

use serde::Serialize;

/// One retrieved ticket as reported to callers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchSummary {
    pub ticket_id: String,
    /// Similarity score; kept for logs, never sent to clients.
    #[serde(skip_serializing)]
    pub score: f32,
}

/// Final rendered answer plus the structured parts it was built from.
///
/// # Example
/// ```
/// use kb_pipeline::KbAnswer;
/// let a = KbAnswer {
///     response: "No relevant tickets found. Please try refining your question or filter.".into(),
///     ticket_ids: vec![],
///     matches: vec![],
/// };
/// assert!(a.ticket_ids.is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KbAnswer {
    /// Text shown to the user.
    pub response: String,
    /// De-duplicated identifiers, first-seen order.
    pub ticket_ids: Vec<String>,
    /// Matches in ranking order, duplicates included.
    pub matches: Vec<MatchSummary>,
}
