//! Prompt builder: short system message + labelled ticket section.

use ticket_store::TicketMatch;

use crate::config::KbConfig;
use crate::ticket::ticket_id;

/// System instructions for the summarizer.
pub const SYSTEM_PROMPT: &str = "You are a helpful and concise assistant.";

const INSTRUCTIONS: &str = "You are a helpful support assistant. \
Summarize the following relevant ticket information briefly and clearly.";

const CLOSING: &str = "Provide a clear summary that addresses the user's question. \
After the summary, list the referenced ticket IDs.";

/// Builds the user message: question, then every ticket in ranking order.
///
/// Each ticket is labelled with its identifier, followed by the configured
/// detail fields and the free-text field. The ticket bodies share
/// `cfg.max_context_chars` (counted in chars): every ticket gets an equal share
/// of what is left, so a short ticket passes its unused share on. A body over
/// its share is cut and marked with `…`; the label is never cut.
pub fn build_user_prompt(question: &str, matches: &[TicketMatch], cfg: &KbConfig) -> String {
    let mut out = String::new();
    out.push_str(INSTRUCTIONS);
    out.push_str("\n\nUser question:\n");
    out.push_str(question.trim());
    out.push_str("\n\nRelevant tickets:\n\n");

    let mut budget = cfg.max_context_chars;
    for (i, m) in matches.iter().enumerate() {
        let share = budget / (matches.len() - i);
        let body = ticket_body(m, cfg);
        let (kept, cut) = truncate_chars(&body, share);

        out.push_str(&format!("[{}]\n", ticket_id(m, &cfg.id_fields)));
        out.push_str(kept);
        if cut {
            out.push('…');
        }
        out.push_str("\n\n");
        budget -= kept.chars().count();
    }

    out.push_str(CLOSING);
    out.push('\n');
    out
}

fn ticket_body(m: &TicketMatch, cfg: &KbConfig) -> String {
    let mut body = String::new();
    for field in &cfg.detail_fields {
        if let Some(v) = m.text_field(field) {
            body.push_str(&format!("{field}: {v}\n"));
        }
    }
    body.push_str(&m.text_field(&cfg.text_field).unwrap_or_default());
    body
}

/// First `max` chars of `s`, and whether anything was dropped.
fn truncate_chars(s: &str, max: usize) -> (&str, bool) {
    match s.char_indices().nth(max) {
        Some((end, _)) => (&s[..end], true),
        None => (s, false),
    }
}
