//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Every error renders as `{ "error": { "code", "message", "details"? } }`.
//! Internal error messages are logged, never returned.

use adgm_agent::ReviewError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. "NOT_FOUND", "CHECKLIST_INCOMPLETE").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional context. Carries the checklist status on 409.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid bearer token (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Required documents are missing and the caller did not ask to
    /// proceed (409). `details` is the checklist status.
    #[error("required documents are missing: {missing}")]
    ChecklistIncomplete {
        missing: String,
        details: serde_json::Value,
    },

    /// The review pipeline is not configured (503).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::ChecklistIncomplete { .. } => (StatusCode::CONFLICT, "CHECKLIST_INCOMPLETE"),
            Self::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let details = match self {
            Self::ChecklistIncomplete { details, .. } => Some(details),
            _ => None,
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::NoDocuments
            | ReviewError::UnsupportedFile(_)
            | ReviewError::DuplicateDocument(_) => Self::Validation(err.to_string()),
            ReviewError::Llm(_) | ReviewError::Rag(_) => Self::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn not_found_status_code() {
        let (status, code) = AppError::NotFound("review".into()).status_and_code();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "NOT_FOUND");
    }

    #[test]
    fn validation_status_code() {
        let (status, code) = AppError::Validation("bad".into()).status_and_code();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "VALIDATION_ERROR");
    }

    #[test]
    fn unavailable_status_code() {
        let (status, _) = AppError::ServiceUnavailable("no model".into()).status_and_code();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn review_validation_errors_map_to_422() {
        let err: AppError = ReviewError::UnsupportedFile("id.pdf".into()).into();
        assert!(matches!(err, AppError::Validation(_)));
        let err: AppError = ReviewError::NoDocuments.into();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn internal_message_is_hidden() {
        let (status, body) = body_json(AppError::Internal("db password wrong".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "An internal error occurred");
        assert!(body["error"].get("details").is_none());
    }

    #[tokio::test]
    async fn checklist_incomplete_carries_details() {
        let err = AppError::ChecklistIncomplete {
            missing: "UBO Declaration Form".into(),
            details: serde_json::json!({ "complete": false }),
        };
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CHECKLIST_INCOMPLETE");
        assert_eq!(body["error"]["details"]["complete"], false);
    }
}
