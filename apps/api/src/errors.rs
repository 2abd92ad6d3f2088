use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extract::ExtractError;
use crate::fetch::FetchError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("File too large (limit {limit} bytes)")]
    PayloadTooLarge { limit: usize },

    #[error("Cannot parse file: {0}")]
    UnparsableDocument(String),

    #[error("Empty CV text")]
    EmptyDocument,

    #[error("Only http/https URLs are allowed, got '{0}'")]
    UnsupportedScheme(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("URL host is not allowed: {0}")]
    ForbiddenHost(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Job page seems empty or unreadable")]
    EmptyJobPage,

    #[error("AI call failed: {0}")]
    AiCallFailed(String),

    #[error("Empty AI response")]
    EmptyAiResponse,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::PayloadTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            AppError::UnparsableDocument(_) => (StatusCode::BAD_REQUEST, "UNPARSABLE_DOCUMENT"),
            AppError::EmptyDocument => (StatusCode::BAD_REQUEST, "EMPTY_DOCUMENT"),
            AppError::UnsupportedScheme(_) => (StatusCode::BAD_REQUEST, "UNSUPPORTED_SCHEME"),
            AppError::InvalidUrl(_) => (StatusCode::BAD_REQUEST, "INVALID_URL"),
            AppError::ForbiddenHost(_) => (StatusCode::BAD_REQUEST, "FORBIDDEN_HOST"),
            AppError::Fetch(_) => (StatusCode::BAD_GATEWAY, "FETCH_ERROR"),
            AppError::EmptyJobPage => (StatusCode::BAD_REQUEST, "EMPTY_JOB_PAGE"),
            AppError::AiCallFailed(_) => (StatusCode::BAD_GATEWAY, "AI_CALL_FAILED"),
            AppError::EmptyAiResponse => (StatusCode::BAD_GATEWAY, "EMPTY_AI_RESPONSE"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
            other if status.is_server_error() => {
                tracing::error!("Upstream error: {other}");
                other.to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::TooLarge { limit, .. } => AppError::PayloadTooLarge { limit },
            ExtractError::Unparsable(cause) => AppError::UnparsableDocument(cause),
        }
    }
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::UnsupportedScheme(scheme) => AppError::UnsupportedScheme(scheme),
            FetchError::InvalidUrl(msg) => AppError::InvalidUrl(msg),
            FetchError::ForbiddenHost(host) => AppError::ForbiddenHost(host),
            other @ (FetchError::Http(_) | FetchError::Status { .. } | FetchError::TimedOut(_)) => {
                AppError::Fetch(other.to_string())
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::AiCallFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_400() {
        for err in [
            AppError::EmptyDocument,
            AppError::EmptyJobPage,
            AppError::UnsupportedScheme("ftp".into()),
            AppError::ForbiddenHost("localhost".into()),
            AppError::UnparsableDocument("bad zip".into()),
        ] {
            assert_eq!(err.status_and_code().0, StatusCode::BAD_REQUEST, "{err}");
        }
    }

    #[test]
    fn test_upstream_errors_map_to_502() {
        for err in [
            AppError::Fetch("connection refused".into()),
            AppError::AiCallFailed("timeout".into()),
            AppError::EmptyAiResponse,
        ] {
            assert_eq!(err.status_and_code().0, StatusCode::BAD_GATEWAY, "{err}");
        }
    }

    #[test]
    fn test_fetch_timeout_is_fetch_error() {
        let err = AppError::from(FetchError::TimedOut("https://example.com/job".into()));
        assert_eq!(err.status_and_code(), (StatusCode::BAD_GATEWAY, "FETCH_ERROR"));
    }

    #[test]
    fn test_too_large_maps_to_413() {
        let err = AppError::from(ExtractError::TooLarge {
            size: 9,
            limit: 8,
        });
        assert_eq!(err.status_and_code(), (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"));
    }

    #[test]
    fn test_llm_error_keeps_cause() {
        let err = AppError::from(LlmError::EmptyContent);
        assert!(matches!(&err, AppError::AiCallFailed(msg) if msg.contains("empty content")));
    }
}
