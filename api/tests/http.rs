//! Router-level tests: envelope shape, status codes and health aggregation.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use ai_llm_service::{AiLlmError, LlmModelConfig, LlmProvider, LlmServiceProfiles};
use api::AppState;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use kb_pipeline::{ChatModel, Embedder, HelpdeskKb, KbConfig};
use serde_json::{Value, json};
use ticket_store::{MetadataFilter, StoreError, StoreHealth, TicketMatch, VectorStore};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct StaticEmbedder {
    fail: bool,
}

#[async_trait]
impl Embedder for StaticEmbedder {
    fn provider(&self) -> String {
        "OpenAI/text-embedding-3-small".into()
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>, AiLlmError> {
        if self.fail {
            Err(AiLlmError::Timeout(Duration::from_secs(30)))
        } else {
            Ok(vec![0.3, 0.4])
        }
    }
}

struct StaticStore {
    matches: Vec<TicketMatch>,
    ok: bool,
}

#[async_trait]
impl VectorStore for StaticStore {
    fn backend(&self) -> &'static str {
        "static"
    }

    async fn query(
        &self,
        _vector: Vec<f32>,
        top_k: u64,
        _filter: Option<&MetadataFilter>,
    ) -> Result<Vec<TicketMatch>, StoreError> {
        Ok(self.matches.iter().take(top_k as usize).cloned().collect())
    }

    async fn health(&self) -> StoreHealth {
        StoreHealth {
            backend: "static".into(),
            target: "tickets".into(),
            ok: self.ok,
            latency_ms: 1,
            message: if self.ok { "ok" } else { "down" }.into(),
        }
    }
}

struct CountingChat {
    calls: AtomicUsize,
}

#[async_trait]
impl ChatModel for CountingChat {
    fn provider(&self) -> String {
        "OpenAI/gpt-4o-mini".into()
    }

    async fn complete(&self, _system: &str, _user: &str) -> Result<String, AiLlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("Reinstall the VPN client.".into())
    }
}

fn openai_cfg(endpoint: &str, model: &str) -> LlmModelConfig {
    LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model: model.into(),
        endpoint: endpoint.into(),
        api_key: Some("sk-test".into()),
        max_tokens: Some(500),
        temperature: Some(0.2),
        top_p: None,
        timeout_secs: Some(2),
    }
}

fn profiles(endpoint: &str) -> Arc<LlmServiceProfiles> {
    Arc::new(
        LlmServiceProfiles::new(
            openai_cfg(endpoint, "gpt-4o-mini"),
            openai_cfg(endpoint, "text-embedding-3-small"),
            Some(2),
        )
        .unwrap(),
    )
}

fn vpn_tickets() -> Vec<TicketMatch> {
    [("TICKET-1", 0.9), ("TICKET-2", 0.8)]
        .into_iter()
        .map(|(id, score)| TicketMatch {
            id: None,
            score,
            metadata: json!({ "IssueKey": id, "Comments": "Reinstalled the client." })
                .as_object()
                .cloned()
                .unwrap(),
        })
        .collect()
}

fn app(embed_fails: bool, store: StaticStore, llm_endpoint: &str) -> (axum::Router, Arc<CountingChat>) {
    let chat = Arc::new(CountingChat {
        calls: AtomicUsize::new(0),
    });
    let store: Arc<dyn VectorStore> = Arc::new(store);
    let kb = HelpdeskKb::new(
        KbConfig::default(),
        Arc::new(StaticEmbedder { fail: embed_fails }),
        store.clone(),
        chat.clone(),
    )
    .unwrap();
    let state = AppState {
        kb: Arc::new(kb),
        llm: profiles(llm_endpoint),
        store,
    };
    (api::router(Arc::new(state)), chat)
}

fn post_ask(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/ask")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn ask_returns_the_formatted_answer_in_the_envelope() {
    let (router, chat) = app(
        false,
        StaticStore {
            matches: vpn_tickets(),
            ok: true,
        },
        "http://127.0.0.1:9",
    );

    let resp = router
        .oneshot(post_ask(r#"{"question":"VPN not connecting","filter":""}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["ticket_ids"], json!(["TICKET-1", "TICKET-2"]));
    let text = body["data"]["response"].as_str().unwrap();
    assert!(text.contains("Referenced Ticket IDs: TICKET-1, TICKET-2"));
    assert_eq!(body["data"]["matches"][0], json!({ "ticket_id": "TICKET-1" }));
    assert_eq!(chat.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn blank_question_is_a_validation_error() {
    let (router, chat) = app(
        false,
        StaticStore {
            matches: vpn_tickets(),
            ok: true,
        },
        "http://127.0.0.1:9",
    );

    let resp = router.oneshot(post_ask(r#"{"question":"   "}"#)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = json_body(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["message"], "Please enter a question.");
    assert_eq!(chat.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn provider_failure_maps_to_bad_gateway() {
    let (router, _) = app(
        true,
        StaticStore {
            matches: vpn_tickets(),
            ok: true,
        },
        "http://127.0.0.1:9",
    );

    let resp = router
        .oneshot(post_ask(r#"{"question":"VPN not connecting"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let body = json_body(resp).await;
    assert_eq!(body["error"]["code"], "PROVIDER_ERROR");
    let msg = body["error"]["message"].as_str().unwrap();
    assert!(msg.starts_with("embedding failed (OpenAI"), "{msg}");
    assert!(!msg.contains("sk-test"));
}

#[tokio::test]
async fn malformed_body_is_wrapped_in_the_envelope() {
    let (router, _) = app(
        false,
        StaticStore {
            matches: vec![],
            ok: true,
        },
        "http://127.0.0.1:9",
    );

    let resp = router.oneshot(post_ask(r#"{"filter":"Zoom"}"#)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNPROCESSABLE_ENTITY");
    assert_eq!(body["error"]["details"][0]["path"], "question");
}

#[tokio::test]
async fn health_aggregates_llm_and_store_probes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models/gpt-4o-mini"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "gpt-4o-mini" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/models/text-embedding-3-small"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "text-embedding-3-small" })))
        .mount(&server)
        .await;

    let (router, _) = app(
        false,
        StaticStore {
            matches: vec![],
            ok: false,
        },
        &server.uri(),
    );

    let resp = router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["data"]["llm"].as_array().unwrap().len(), 2);
    assert!(body["data"]["llm"][0]["ok"].as_bool().unwrap());
    assert_eq!(body["data"]["vector_store"]["ok"], false);
    assert_eq!(body["data"]["ok"], false);
}
