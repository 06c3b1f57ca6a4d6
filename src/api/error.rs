//! Mapping from [`Error`] to HTTP responses.

use crate::errors::{Error, FieldErrors};
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
    /// Stable machine-readable code
    pub code: String,
    /// Per-field messages, present on validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl Error {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::AuthenticationRequired => (StatusCode::UNAUTHORIZED, "NOT_AUTHENTICATED"),
            Self::AuthorizationDenied => (StatusCode::FORBIDDEN, "PERMISSION_DENIED"),
            Self::Validation { .. } => (StatusCode::BAD_REQUEST, "INVALID"),
            Self::NotFound { .. } | Self::InvalidId { .. } => {
                (StatusCode::NOT_FOUND, "NOT_FOUND")
            }
            Self::NoActiveIteration => (StatusCode::NOT_FOUND, "NO_ACTIVE_ITERATION"),
            Self::BrokenOwnership { .. }
            | Self::Config { .. }
            | Self::PasswordHash { .. }
            | Self::Database(_)
            | Self::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = if status.is_server_error() {
            error!(error = %self, "Request failed");
            ErrorResponse {
                error: "Internal server error".to_string(),
                code: code.to_string(),
                fields: None,
            }
        } else {
            let message = self.to_string();
            let fields = match self {
                Self::Validation { errors } => Some(errors),
                _ => None,
            };
            ErrorResponse {
                error: message,
                code: code.to_string(),
                fields,
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::field("non_field_errors", rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidId {
            message: rejection.body_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    async fn render(error: Error) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_validation_carries_fields() {
        let (status, body) = render(Error::field("name", "This field is required.")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID");
        assert_eq!(body["fields"]["name"][0], "This field is required.");
    }

    #[tokio::test]
    async fn test_status_mapping() {
        assert_eq!(render(Error::AuthenticationRequired).await.0, StatusCode::UNAUTHORIZED);
        assert_eq!(render(Error::AuthorizationDenied).await.0, StatusCode::FORBIDDEN);
        assert_eq!(
            render(Error::NotFound { entity: "goal", id: 3 }).await.0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(render(Error::NoActiveIteration).await.0, StatusCode::NOT_FOUND);
        let (status, body) = render(Error::InvalidId {
            message: "Cannot parse `abc` to a `i64`".to_string(),
        })
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_internal_errors_hide_details() {
        let (status, body) = render(Error::BrokenOwnership {
            entity: "step",
            id: 9,
            parent: "goal",
        })
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert!(body.get("fields").is_none());
    }
}
