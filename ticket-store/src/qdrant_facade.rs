//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! All Qdrant interactions live behind this facade so the rest of the
//! workspace only sees [`VectorStore`].

use std::collections::HashMap;
use std::time::Instant;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    PointId, SearchParamsBuilder, SearchPointsBuilder, Value as QValue, point_id::PointIdOptions,
    value::Kind,
};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::QdrantConfig;
use crate::errors::StoreError;
use crate::filters::to_qdrant_filter;
use crate::record::{MetadataFilter, StoreHealth, TicketMatch};
use crate::store::VectorStore;

/// A facade over the Qdrant client bound to one collection.
pub struct QdrantFacade {
    client: Qdrant,
    collection: String,
    exact: bool,
}

impl QdrantFacade {
    /// Creates a new facade from the given configuration.
    ///
    /// Supports optional API key authentication; the per-request timeout comes
    /// from the config.
    pub fn new(cfg: &QdrantConfig) -> Result<Self, StoreError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.url).timeout(cfg.timeout());
        if let Some(key) = &cfg.api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;

        info!(
            url = %cfg.url,
            collection = %cfg.collection,
            exact = cfg.exact_search,
            "QdrantFacade initialized"
        );

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
            exact: cfg.exact_search,
        })
    }
}

#[async_trait]
impl VectorStore for QdrantFacade {
    fn backend(&self) -> &'static str {
        "qdrant"
    }

    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<TicketMatch>, StoreError> {
        let started = Instant::now();
        debug!(
            collection = %self.collection,
            top_k,
            filtered = filter.is_some(),
            exact = self.exact,
            "qdrant search"
        );

        let mut builder =
            SearchPointsBuilder::new(&self.collection, vector, top_k).with_payload(true);
        if let Some(f) = filter {
            builder = builder.filter(to_qdrant_filter(f));
        }
        if self.exact {
            builder = builder.params(SearchParamsBuilder::default().exact(true));
        }

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;

        let out: Vec<TicketMatch> = res
            .result
            .into_iter()
            .map(|p| TicketMatch {
                id: p.id.and_then(point_id_to_string),
                score: p.score,
                metadata: qpayload_to_json(p.payload),
            })
            .collect();

        info!(
            hits = out.len(),
            latency_ms = started.elapsed().as_millis(),
            "qdrant search completed"
        );
        Ok(out)
    }

    async fn health(&self) -> StoreHealth {
        let started = Instant::now();
        let (ok, message) = match self.client.health_check().await {
            Ok(reply) => (true, format!("qdrant {}", reply.version)),
            Err(e) => {
                warn!(error = %e, "qdrant health check failed");
                (false, e.to_string())
            }
        };
        StoreHealth {
            backend: self.backend().into(),
            target: self.collection.clone(),
            ok,
            latency_ms: started.elapsed().as_millis(),
            message,
        }
    }
}

fn point_id_to_string(id: PointId) -> Option<String> {
    match id.point_id_options? {
        PointIdOptions::Num(n) => Some(n.to_string()),
        PointIdOptions::Uuid(s) => Some(s),
    }
}

/// Converts a Qdrant payload into a JSON object, nested lists and structs included.
fn qpayload_to_json(payload: HashMap<String, QValue>) -> Map<String, Value> {
    payload
        .into_iter()
        .map(|(k, v)| (k, qvalue_to_json(v)))
        .collect()
}

fn qvalue_to_json(v: QValue) -> Value {
    match v.kind {
        Some(Kind::StringValue(s)) => Value::String(s),
        Some(Kind::IntegerValue(i)) => Value::Number(i.into()),
        Some(Kind::DoubleValue(f)) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Some(Kind::BoolValue(b)) => Value::Bool(b),
        Some(Kind::ListValue(list)) => {
            Value::Array(list.values.into_iter().map(qvalue_to_json).collect())
        }
        Some(Kind::StructValue(s)) => Value::Object(qpayload_to_json(s.fields)),
        Some(Kind::NullValue(_)) | None => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use qdrant_client::qdrant::{ListValue, Struct};
    use serde_json::json;

    use super::*;

    fn q(kind: Kind) -> QValue {
        QValue { kind: Some(kind) }
    }

    #[test]
    fn payload_conversion_keeps_nested_values() {
        let mut inner = HashMap::new();
        inner.insert("Title".to_string(), q(Kind::StringValue("VPN drops".into())));

        let mut payload = HashMap::new();
        payload.insert("IssueKey".to_string(), q(Kind::StringValue("TICKET-1".into())));
        payload.insert("Priority".to_string(), q(Kind::IntegerValue(2)));
        payload.insert("Resolved".to_string(), q(Kind::BoolValue(true)));
        payload.insert(
            "Labels".to_string(),
            q(Kind::ListValue(ListValue {
                values: vec![q(Kind::StringValue("vpn".into()))],
            })),
        );
        payload.insert("Details".to_string(), q(Kind::StructValue(Struct { fields: inner })));
        payload.insert("Empty".to_string(), QValue { kind: None });

        let json = Value::Object(qpayload_to_json(payload));
        assert_eq!(
            json,
            json!({
                "IssueKey": "TICKET-1",
                "Priority": 2,
                "Resolved": true,
                "Labels": ["vpn"],
                "Details": { "Title": "VPN drops" },
                "Empty": null
            })
        );
    }

    #[test]
    fn non_finite_doubles_become_null() {
        assert_eq!(qvalue_to_json(q(Kind::DoubleValue(f64::NAN))), Value::Null);
        assert_eq!(qvalue_to_json(q(Kind::DoubleValue(0.5))), json!(0.5));
    }

    #[test]
    fn point_ids_are_rendered_as_text() {
        let num = PointId {
            point_id_options: Some(PointIdOptions::Num(7)),
        };
        assert_eq!(point_id_to_string(num).as_deref(), Some("7"));
        assert_eq!(point_id_to_string(PointId { point_id_options: None }), None);
    }
}
