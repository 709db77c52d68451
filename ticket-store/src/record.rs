//! Core data models shared by the store backends.

use serde::Serialize;
use serde_json::{Map, Value};

/// Equality constraint on one metadata field, e.g. `CF_VMS == "Zoom"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataFilter {
    pub field: String,
    pub value: String,
}

impl MetadataFilter {
    /// Builds a filter from raw user input.
    ///
    /// The value is trimmed; `None` is returned when it is absent or blank,
    /// meaning "no filter".
    pub fn from_input(field: impl Into<String>, value: Option<&str>) -> Option<Self> {
        let value = value.map(str::trim).filter(|v| !v.is_empty())?;
        Some(Self {
            field: field.into(),
            value: value.to_string(),
        })
    }
}

/// A single similarity hit with its inline metadata.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TicketMatch {
    /// Backend point/vector id, if the backend reports one.
    pub id: Option<String>,
    pub score: f32,
    pub metadata: Map<String, Value>,
}

impl TicketMatch {
    /// Returns a metadata field as text; numbers are rendered, blanks are `None`.
    pub fn text_field(&self, key: &str) -> Option<String> {
        match self.metadata.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Health snapshot of a vector store backend.
#[derive(Clone, Debug, Serialize)]
pub struct StoreHealth {
    pub backend: String,
    /// Collection or index name.
    pub target: String,
    pub ok: bool,
    pub latency_ms: u128,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn blank_filter_input_means_no_filter() {
        assert_eq!(MetadataFilter::from_input("CF_VMS", None), None);
        assert_eq!(MetadataFilter::from_input("CF_VMS", Some("   ")), None);
    }

    #[test]
    fn filter_value_is_trimmed() {
        let f = MetadataFilter::from_input("CF_VMS", Some("  Zoom ")).unwrap();
        assert_eq!(f.field, "CF_VMS");
        assert_eq!(f.value, "Zoom");
    }

    #[test]
    fn text_field_skips_blank_and_non_scalar_values() {
        let m = TicketMatch {
            metadata: json!({ "a": " ", "b": 42, "c": ["x"], "d": " KB-1 " })
                .as_object()
                .cloned()
                .unwrap(),
            ..Default::default()
        };
        assert_eq!(m.text_field("a"), None);
        assert_eq!(m.text_field("b").as_deref(), Some("42"));
        assert_eq!(m.text_field("c"), None);
        assert_eq!(m.text_field("d").as_deref(), Some("KB-1"));
        assert_eq!(m.text_field("missing"), None);
    }
}
