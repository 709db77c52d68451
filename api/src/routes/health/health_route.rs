//! GET /health: provider and vector store reachability.

use std::sync::Arc;

use ai_llm_service::HealthStatus;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use ticket_store::StoreHealth;

use crate::core::{app_state::AppState, http::response_envelope::ApiResponse};

#[derive(Serialize)]
pub struct HealthReport {
    /// True when every probe succeeded.
    pub ok: bool,
    pub llm: Vec<HealthStatus>,
    pub vector_store: StoreHealth,
}

/// Always answers 200; failures are reported per probe.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let llm = state.llm.health_all().await;
    let vector_store = state.store.health().await;
    let ok = vector_store.ok && llm.iter().all(|s| s.ok);

    ApiResponse::success(HealthReport {
        ok,
        llm,
        vector_store,
    })
    .into_response()
}
