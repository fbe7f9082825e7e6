//! Application error type mapping to HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use nirvana_core::chat::service::ChatError;
use nirvana_types::error::BackendError;
use nirvana_types::llm::RemoteServiceError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or blank input.
    Validation(String),
    /// The hosted chat-completion service failed.
    Remote(RemoteServiceError),
    /// The retrieval backend failed.
    Backend(BackendError),
}

impl From<RemoteServiceError> for AppError {
    fn from(e: RemoteServiceError) -> Self {
        AppError::Remote(e)
    }
}

impl From<BackendError> for AppError {
    fn from(e: BackendError) -> Self {
        AppError::Backend(e)
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::Remote(e) => AppError::Remote(e),
            ChatError::Backend(e) => AppError::Backend(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Backend(BackendError::InvalidMetadata(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Backend(e) => {
                tracing::error!(error = %e, "Retrieval backend failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "RETRIEVAL_ERROR", e.to_string())
            }
            AppError::Remote(e @ RemoteServiceError::RateLimited { .. }) => {
                tracing::warn!(error = %e, "Upstream rate limit");
                (StatusCode::SERVICE_UNAVAILABLE, "RATE_LIMITED", e.to_string())
            }
            AppError::Remote(e) => {
                tracing::error!(error = %e, "Upstream completion failure");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", e.to_string())
            }
        };

        let body = json!({
            "errors": [{
                "code": code,
                "message": message,
            }],
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::Validation("blank".into()), StatusCode::BAD_REQUEST),
            (
                AppError::Backend(BackendError::InvalidMetadata("empty key".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Backend(BackendError::Embedding("down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Remote(RemoteServiceError::RateLimited {
                    retry_after_ms: None,
                }),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::Remote(RemoteServiceError::AuthenticationFailed),
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_chat_error_conversion() {
        let err: AppError = ChatError::Remote(RemoteServiceError::EmptyResponse).into();
        assert!(matches!(err, AppError::Remote(RemoteServiceError::EmptyResponse)));

        let err: AppError = ChatError::Backend(BackendError::Index("x".into())).into();
        assert!(matches!(err, AppError::Backend(BackendError::Index(_))));
    }
}
