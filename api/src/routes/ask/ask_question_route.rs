//! POST /ask: answers a helpdesk question from similar past tickets.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use tracing::info;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
    routes::ask::ask_request::AskRequest,
};

/// Handler: POST /ask
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/ask \
///   -H 'content-type: application/json' \
///   -d '{"question":"VPN not connecting","filter":"Cisco AnyConnect"}'
/// ```
pub async fn ask_question(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AskRequest>,
) -> AppResult<Response> {
    info!(
        question_chars = body.question.len(),
        filter = body.filter.as_deref().unwrap_or(""),
        top_k = ?body.top_k,
        "POST /ask"
    );

    let answer = state
        .kb
        .ask(&body.question, body.filter.as_deref(), body.top_k)
        .await?;

    Ok(ApiResponse::success(answer).into_response())
}
