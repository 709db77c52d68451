//! Filter conversion to backend-native representations.
//!
//! Only exact equality on a single keyword field is supported.

use qdrant_client::qdrant::{Condition, Filter};
use serde_json::{Value, json};
use tracing::debug;

use crate::record::MetadataFilter;

/// Converts [`MetadataFilter`] to a Qdrant [`Filter`] with one `must` keyword match.
pub fn to_qdrant_filter(f: &MetadataFilter) -> Filter {
    debug!(field = %f.field, value = %f.value, "filters::to_qdrant_filter");
    Filter::must([Condition::matches(f.field.clone(), f.value.clone())])
}

/// Converts [`MetadataFilter`] to Pinecone's `{"<field>": {"$eq": "<value>"}}`.
pub fn to_pinecone_filter(f: &MetadataFilter) -> Value {
    debug!(field = %f.field, value = %f.value, "filters::to_pinecone_filter");
    let mut obj = serde_json::Map::with_capacity(1);
    obj.insert(f.field.clone(), json!({ "$eq": f.value }));
    Value::Object(obj)
}
