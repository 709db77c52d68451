use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kb_pipeline::KbError;
use thiserror::Error;
use tracing::{error, warn};

use crate::core::http::response_envelope::{ApiErrorDetail, ApiResponse, ErrorCode};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / server ---
    #[error("invalid API_ADDRESS '{0}'")]
    InvalidAddress(String),

    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    /// User input rejected by the pipeline.
    #[error("{0}")]
    Validation(String),

    /// An upstream provider failed; the message names stage and provider.
    #[error("{0}")]
    Provider(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Provider(_) => StatusCode::BAD_GATEWAY,
            AppError::InvalidAddress(_)
            | AppError::Bind(_)
            | AppError::Server(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> ErrorCode {
        match self {
            AppError::InvalidAddress(_) => ErrorCode::ConfigError,
            AppError::Bind(_) => ErrorCode::BindError,
            AppError::Server(_) => ErrorCode::ServerError,
            AppError::Validation(_) => ErrorCode::ValidationError,
            AppError::Provider(_) => ErrorCode::ProviderError,
            AppError::Internal(_) => ErrorCode::InternalError,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = self.error_code().as_str(), error = %self, "request failed");
        } else {
            warn!(code = self.error_code().as_str(), error = %self, "request rejected");
        }

        let details = match &self {
            AppError::Validation(_) => vec![ApiErrorDetail::field(
                "question",
                "Provide a non-empty question.",
            )],
            _ => Vec::new(),
        };
        ApiResponse::error(self.error_code(), self.to_string(), details)
            .into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<KbError> for AppError {
    fn from(err: KbError) -> Self {
        match err {
            KbError::Validation(msg) => AppError::Validation(msg),
            e @ KbError::Provider { .. } => AppError::Provider(e.to_string()),
            KbError::Config(msg) => AppError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use kb_pipeline::Stage;

    use super::*;

    #[test]
    fn pipeline_errors_map_to_stable_codes() {
        let v: AppError = KbError::empty_question().into();
        assert_eq!(v.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(v.error_code(), ErrorCode::ValidationError);
        assert_eq!(v.to_string(), "Please enter a question.");

        let p: AppError = KbError::provider(Stage::Retrieval, "pinecone", "HTTP 503").into();
        assert_eq!(p.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(p.error_code().as_str(), "PROVIDER_ERROR");
        assert_eq!(p.to_string(), "retrieval failed (pinecone): HTTP 503");
    }
}
