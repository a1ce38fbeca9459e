//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.
//! Backend causes are logged here, once, and never echoed to the client.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{BoxError, Json};
use serde_json::json;

use crate::db::{DbError, PoolError};
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Bad path id or body (400)
    Validation(ValidationError),

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Query failed or timed out (500, logged)
    Database(DbError),

    /// Pool liveness probe failed (500, logged)
    Unavailable(PoolError),

    /// Whole request exceeded the server deadline (504)
    RequestTimeout { after: Duration },

    /// Middleware failure (500, logged)
    Internal { message: String },
}

impl ApiError {
    /// Map an error raised by the request-timeout middleware.
    pub fn from_middleware(err: BoxError, deadline: Duration) -> Self {
        if err.is::<tower::timeout::error::Elapsed>() {
            Self::RequestTimeout { after: deadline }
        } else {
            Self::Internal {
                message: err.to_string(),
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(e) => {
                match e {
                    ValidationError::InvalidId { raw } => {
                        tracing::debug!(raw = %raw, "Rejected path id");
                    }
                    ValidationError::MalformedBody { reason } => {
                        tracing::debug!(reason = %reason, "Rejected request body");
                    }
                }
                (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "error": "validation_error",
                        "message": e.to_string()
                    }),
                )
            }
            Self::NotFound { resource, id } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "not_found",
                    "message": format!("{} '{}' not found", resource, id)
                }),
            ),
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!(error = %e, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    }),
                )
            }
            Self::Unavailable(e) => {
                tracing::error!(error = %e, "Health check failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "unavailable",
                        "message": "database unreachable"
                    }),
                )
            }
            Self::RequestTimeout { after } => {
                tracing::error!(deadline = ?after, "Request timed out");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    json!({
                        "error": "timeout",
                        "message": "request timed out"
                    }),
                )
            }
            Self::Internal { message } => {
                tracing::error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            _ => Self::Database(e),
        }
    }
}

impl From<PoolError> for ApiError {
    fn from(e: PoolError) -> Self {
        Self::Unavailable(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_is_400() {
        let err = ApiError::Validation(ValidationError::InvalidId { raw: "abc".into() });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["message"], "invalid id");
    }

    #[tokio::test]
    async fn not_found_db_error_is_404() {
        let err = ApiError::from(DbError::NotFound {
            resource: "todo",
            id: "7".into(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["error"], "not_found");
        assert_eq!(body["message"], "todo '7' not found");
    }

    #[tokio::test]
    async fn database_error_is_generic_500() {
        let err = ApiError::from(DbError::Sqlx(sqlx::Error::Protocol(
            "relation \"todos\" does not exist".into(),
        )));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "internal_error");
        assert_eq!(body["message"], "an internal error occurred");
        assert!(!body.to_string().contains("relation"));
    }

    #[tokio::test]
    async fn elapsed_deadline_is_504() {
        let err = ApiError::from_middleware(
            Box::new(tower::timeout::error::Elapsed::new()),
            Duration::from_secs(30),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);

        let body = body_json(response).await;
        assert_eq!(body["error"], "timeout");
        assert_eq!(body["message"], "request timed out");
    }

    #[tokio::test]
    async fn other_middleware_error_is_generic_500() {
        let err = ApiError::from_middleware("overloaded".into(), Duration::from_secs(30));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "internal_error");
        assert!(!body.to_string().contains("overloaded"));
    }

    #[tokio::test]
    async fn timeout_is_500() {
        let err = ApiError::from(DbError::Timeout {
            operation: "list_all",
            timeout: crate::db::repos::QUERY_TIMEOUT,
        });
        assert!(matches!(err, ApiError::Database(_)));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
