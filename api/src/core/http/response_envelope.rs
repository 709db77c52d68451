//! JSON envelope shared by every route: `{ success, data?, error? }`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Machine-readable error codes clients can match on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    BadRequest,
    UnprocessableEntity,
    UnsupportedMediaType,
    ValidationError,
    ProviderError,
    ConfigError,
    BindError,
    ServerError,
    InternalError,
}

impl ErrorCode {
    /// Code for a body-extractor rejection, `None` for statuses axum's
    /// extractors do not produce.
    pub fn for_rejection(status: StatusCode) -> Option<Self> {
        match status {
            StatusCode::BAD_REQUEST => Some(Self::BadRequest),
            StatusCode::UNPROCESSABLE_ENTITY => Some(Self::UnprocessableEntity),
            StatusCode::UNSUPPORTED_MEDIA_TYPE => Some(Self::UnsupportedMediaType),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::UnprocessableEntity => "UNPROCESSABLE_ENTITY",
            Self::UnsupportedMediaType => "UNSUPPORTED_MEDIA_TYPE",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::ProviderError => "PROVIDER_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::BindError => "BIND_ERROR",
            Self::ServerError => "SERVER_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

#[derive(Serialize)]
pub struct ApiError {
    pub code: ErrorCode,
    /// Safe to show; never carries credentials.
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ApiErrorDetail>,
}

/// Points at the offending request field, e.g. `question` or `top_k`.
#[derive(Serialize, Default)]
pub struct ApiErrorDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ApiErrorDetail {
    pub fn field(path: &str, hint: impl Into<String>) -> Self {
        Self {
            path: Some(path.to_string()),
            hint: Some(hint.into()),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn error(code: ErrorCode, message: impl Into<String>, details: Vec<ApiErrorDetail>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
                details,
            }),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn extractor_rejections_have_their_own_codes() {
        assert_eq!(
            ErrorCode::for_rejection(StatusCode::UNPROCESSABLE_ENTITY),
            Some(ErrorCode::UnprocessableEntity)
        );
        assert_eq!(
            ErrorCode::for_rejection(StatusCode::UNSUPPORTED_MEDIA_TYPE).map(ErrorCode::as_str),
            Some("UNSUPPORTED_MEDIA_TYPE")
        );
        assert_eq!(ErrorCode::for_rejection(StatusCode::BAD_GATEWAY), None);
    }

    #[test]
    fn error_envelope_serializes_code_as_screaming_snake() {
        let env = ApiResponse::error(
            ErrorCode::ValidationError,
            "Please enter a question.",
            vec![ApiErrorDetail::field("question", "Provide a non-empty question.")],
        );
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(
            v,
            json!({
                "success": false,
                "error": {
                    "code": "VALIDATION_ERROR",
                    "message": "Please enter a question.",
                    "details": [{ "path": "question", "hint": "Provide a non-empty question." }]
                }
            })
        );
    }
}
