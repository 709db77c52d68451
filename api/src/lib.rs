use std::{env, net::SocketAddr, sync::Arc};

pub mod core;
pub mod error_handler;
mod middleware_layer;
mod routes;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tracing::{error, info};

pub use crate::core::app_state::AppState;
pub use crate::error_handler::AppError;
use crate::{
    middleware_layer::json_extractor::json_error_mapper,
    routes::{ask::ask_question_route::ask_question, health::health_route::health},
};

pub const DEFAULT_API_ADDRESS: &str = "127.0.0.1:8080";

/// Builds the HTTP router: `POST /ask`, `GET /health`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ask", post(ask_question))
        .route("/health", get(health))
        .layer(middleware::from_fn(json_error_mapper))
        .with_state(state)
}

/// Serves the router on `API_ADDRESS` (default `127.0.0.1:8080`) until Ctrl+C.
pub async fn start(state: Arc<AppState>) -> Result<(), AppError> {
    let host_url = env::var("API_ADDRESS").unwrap_or_else(|_| DEFAULT_API_ADDRESS.into());
    let addr: SocketAddr = host_url
        .parse()
        .map_err(|_| AppError::InvalidAddress(host_url.clone()))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(AppError::Bind)?;
    info!(%addr, "HTTP API listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("HTTP API stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
