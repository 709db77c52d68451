//! Pinecone backend over the REST data plane.
//!
//! - `GET  {controller}/indexes/{name}` resolves the index host (once, at connect)
//! - `POST {host}/query`                 similarity search with inline metadata
//! - `POST {host}/describe_index_stats`  health probe
//!
//! Authentication is the `Api-Key` header, marked sensitive.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error, info, instrument, warn};

use crate::config::PineconeConfig;
use crate::errors::{StoreError, make_snippet};
use crate::filters::to_pinecone_filter;
use crate::record::{MetadataFilter, StoreHealth, TicketMatch};
use crate::store::VectorStore;

const BACKEND: &str = "pinecone";
const API_VERSION: &str = "2024-07";

/// Pinecone client bound to one index (and optionally one namespace).
#[derive(Debug)]
pub struct PineconeStore {
    client: reqwest::Client,
    index_name: String,
    namespace: Option<String>,
    timeout: Duration,
    url_query: String,
    url_stats: String,
}

impl PineconeStore {
    /// Builds the client and resolves the index host when it is not configured.
    ///
    /// # Errors
    /// - `Config` for an invalid config or unusable API key
    /// - HTTP/transport errors from the control-plane lookup
    pub async fn connect(cfg: &PineconeConfig) -> Result<Self, StoreError> {
        cfg.validate()?;
        let timeout = cfg.timeout();

        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(cfg.api_key.trim())
            .map_err(|_| StoreError::Config("PINECONE_API_KEY is not a valid header value".into()))?;
        key.set_sensitive(true);
        headers.insert("Api-Key", key);
        headers.insert("X-Pinecone-API-Version", HeaderValue::from_static(API_VERSION));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError::from_reqwest(BACKEND, e, timeout))?;

        let host = match &cfg.index_host {
            Some(h) => h.clone(),
            None => describe_index_host(&client, cfg, timeout).await?,
        };
        let base = normalize_host(&host);

        info!(
            index = %cfg.index_name,
            host = %base,
            namespace = cfg.namespace.as_deref().unwrap_or(""),
            "PineconeStore initialized"
        );

        Ok(Self {
            client,
            index_name: cfg.index_name.clone(),
            namespace: cfg.namespace.clone(),
            timeout,
            url_query: format!("{base}/query"),
            url_stats: format!("{base}/describe_index_stats"),
        })
    }

    async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T, StoreError>
    where
        B: Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::from_reqwest(BACKEND, e, self.timeout))?;
        let resp = ensure_success(resp, url).await?;
        resp.json::<T>()
            .await
            .map_err(|e| StoreError::from_reqwest(BACKEND, e, self.timeout))
    }
}

#[async_trait]
impl VectorStore for PineconeStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    #[instrument(skip_all, fields(index = %self.index_name, top_k = top_k))]
    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<TicketMatch>, StoreError> {
        let started = Instant::now();
        let body = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            include_values: false,
            filter: filter.map(to_pinecone_filter),
            namespace: self.namespace.as_deref(),
        };

        debug!(filtered = body.filter.is_some(), "POST {}", self.url_query);
        let out: QueryResponse = self.post_json(&self.url_query, &body).await?;

        let matches: Vec<TicketMatch> = out
            .matches
            .into_iter()
            .map(|m| TicketMatch {
                id: Some(m.id),
                score: m.score.unwrap_or_default(),
                metadata: m.metadata.unwrap_or_default(),
            })
            .collect();

        info!(
            hits = matches.len(),
            latency_ms = started.elapsed().as_millis(),
            "pinecone query completed"
        );
        Ok(matches)
    }

    async fn health(&self) -> StoreHealth {
        let started = Instant::now();
        let res: Result<IndexStats, StoreError> =
            self.post_json(&self.url_stats, &serde_json::json!({})).await;
        let (ok, message) = match res {
            Ok(stats) => (
                true,
                format!(
                    "{} vectors, dimension {}",
                    stats.total_vector_count.unwrap_or_default(),
                    stats.dimension.unwrap_or_default()
                ),
            ),
            Err(e) => {
                warn!(error = %e, "pinecone health check failed");
                (false, e.to_string())
            }
        };
        StoreHealth {
            backend: BACKEND.into(),
            target: self.index_name.clone(),
            ok,
            latency_ms: started.elapsed().as_millis(),
            message,
        }
    }
}

async fn describe_index_host(
    client: &reqwest::Client,
    cfg: &PineconeConfig,
    timeout: Duration,
) -> Result<String, StoreError> {
    let url = format!(
        "{}/indexes/{}",
        cfg.controller_url.trim().trim_end_matches('/'),
        cfg.index_name
    );
    debug!("GET {}", url);

    let resp = client
        .get(&url)
        .send()
        .await
        .map_err(|e| StoreError::from_reqwest(BACKEND, e, timeout))?;
    let resp = ensure_success(resp, &url).await?;
    let desc: IndexDescription = resp
        .json()
        .await
        .map_err(|e| StoreError::from_reqwest(BACKEND, e, timeout))?;

    desc.host
        .filter(|h| !h.trim().is_empty())
        .ok_or_else(|| StoreError::Decode {
            backend: BACKEND,
            reason: format!("index '{}' has no host", cfg.index_name),
        })
}

async fn ensure_success(resp: reqwest::Response, url: &str) -> Result<reqwest::Response, StoreError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let snippet = make_snippet(&resp.text().await.unwrap_or_default());
    error!(%status, %url, %snippet, "Pinecone returned non-success status");
    Err(StoreError::HttpStatus {
        backend: BACKEND,
        status: status.as_u16(),
        url: url.to_string(),
        snippet,
    })
}

/// The control plane reports hosts without a scheme.
fn normalize_host(host: &str) -> String {
    let h = host.trim().trim_end_matches('/');
    if h.starts_with("http://") || h.starts_with("https://") {
        h.to_string()
    } else {
        format!("https://{h}")
    }
}

/* ==========================
HTTP payloads
========================== */

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: Vec<f32>,
    top_k: u64,
    include_metadata: bool,
    include_values: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    id: String,
    score: Option<f32>,
    metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct IndexDescription {
    host: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexStats {
    dimension: Option<u64>,
    total_vector_count: Option<u64>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn cfg(host: Option<String>, controller: &str) -> PineconeConfig {
        PineconeConfig {
            api_key: "pc-secret".into(),
            index_name: "helpdesk".into(),
            index_host: host,
            controller_url: controller.into(),
            namespace: None,
            timeout_secs: 2,
        }
    }

    #[test]
    fn bare_hosts_get_https() {
        assert_eq!(normalize_host("idx.svc.pinecone.io"), "https://idx.svc.pinecone.io");
        assert_eq!(normalize_host("http://127.0.0.1:9/"), "http://127.0.0.1:9");
    }

    #[tokio::test]
    async fn query_sends_filter_and_requests_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .and(header("Api-Key", "pc-secret"))
            .and(body_json(json!({
                "vector": [0.5, 0.25],
                "topK": 10,
                "includeMetadata": true,
                "includeValues": false,
                "filter": { "CF_VMS": { "$eq": "Zoom" } }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "matches": [
                    { "id": "v1", "score": 0.91, "metadata": { "IssueKey": "TICKET-1", "Comments": "Reinstall" } },
                    { "id": "v2", "score": 0.80 }
                ],
                "namespace": ""
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = PineconeStore::connect(&cfg(Some(server.uri()), "http://unused"))
            .await
            .unwrap();
        let filter = MetadataFilter {
            field: "CF_VMS".into(),
            value: "Zoom".into(),
        };
        let hits = store.query(vec![0.5, 0.25], 10, Some(&filter)).await.unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].text_field("IssueKey").as_deref(), Some("TICKET-1"));
        assert!(hits[1].metadata.is_empty());
    }

    #[tokio::test]
    async fn host_is_resolved_from_the_control_plane() {
        let data = MockServer::start().await;
        let control = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/indexes/helpdesk"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "helpdesk",
                "host": data.uri(),
            })))
            .expect(1)
            .mount(&control)
            .await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "matches": [] })))
            .expect(1)
            .mount(&data)
            .await;

        let store = PineconeStore::connect(&cfg(None, &control.uri())).await.unwrap();
        assert!(store.query(vec![1.0], 5, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn http_errors_do_not_leak_the_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let store = PineconeStore::connect(&cfg(Some(server.uri()), "http://unused"))
            .await
            .unwrap();
        let err = store.query(vec![1.0], 1, None).await.unwrap_err();
        assert!(matches!(err, StoreError::HttpStatus { status: 401, .. }));
        assert!(!err.to_string().contains("pc-secret"));
    }

    #[tokio::test]
    async fn slow_query_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "matches": [] }))
                    .set_delay(Duration::from_secs(4)),
            )
            .mount(&server)
            .await;

        let store = PineconeStore::connect(&cfg(Some(server.uri()), "http://unused"))
            .await
            .unwrap();
        let err = store.query(vec![1.0], 1, None).await.unwrap_err();
        assert!(err.is_timeout(), "{err}");
    }

    #[tokio::test]
    async fn health_reports_index_stats() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/describe_index_stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "dimension": 1536,
                "totalVectorCount": 42
            })))
            .mount(&server)
            .await;

        let store = PineconeStore::connect(&cfg(Some(server.uri()), "http://unused"))
            .await
            .unwrap();
        let h = store.health().await;
        assert!(h.ok);
        assert_eq!(h.message, "42 vectors, dimension 1536");
    }
}
