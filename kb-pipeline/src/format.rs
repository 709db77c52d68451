//! Final response text. Pure functions, no I/O.

pub const HEADER: &str = "=== Helpdesk KB Response ===";
pub const FOOTER: &str = "============================";
pub const NO_RESULTS_MESSAGE: &str =
    "No relevant tickets found. Please try refining your question or filter.";

/// Renders the response for a summary and its (already de-duplicated) ticket ids.
///
/// `None` means the match set was empty; only the no-results message is returned.
pub fn format_response(summary: Option<&str>, ticket_ids: &[String]) -> String {
    match summary {
        None => NO_RESULTS_MESSAGE.to_string(),
        Some(summary) => format!(
            "{HEADER}\n\n{}\n\nReferenced Ticket IDs: {}\n\n{FOOTER}",
            summary.trim(),
            ticket_ids.join(", ")
        ),
    }
}
