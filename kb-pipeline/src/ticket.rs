//! Ticket identifier extraction.

use ticket_store::TicketMatch;

/// Placeholder used when a record carries none of the identifier fields.
pub const UNKNOWN_TICKET_ID: &str = "Unknown";

/// First non-empty candidate field, otherwise [`UNKNOWN_TICKET_ID`].
pub fn ticket_id(m: &TicketMatch, id_fields: &[String]) -> String {
    id_fields
        .iter()
        .find_map(|f| m.text_field(f))
        .unwrap_or_else(|| UNKNOWN_TICKET_ID.to_string())
}

/// Identifiers of all matches, de-duplicated in first-seen order.
pub fn unique_ticket_ids(matches: &[TicketMatch], id_fields: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(matches.len());
    for m in matches {
        let id = ticket_id(m, id_fields);
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}
