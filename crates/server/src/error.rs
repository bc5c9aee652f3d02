// crates/server/src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use taskmarket_core::TransitionError;
use taskmarket_db::DbError;
use thiserror::Error;
use ts_rs::TS;

/// Structured JSON error response for API errors
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../../bindings/")]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// API error types that map to HTTP status codes
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Bid not found: {0}")]
    BidNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(#[from] TransitionError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            ApiError::JobNotFound(id) => {
                tracing::warn!(job_id = %id, "Job not found");
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::with_details("Job not found", format!("Job ID: {}", id)),
                )
            }
            ApiError::BidNotFound(id) => {
                tracing::warn!(bid_id = %id, "Bid not found");
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::with_details("Bid not found", format!("Bid ID: {}", id)),
                )
            }
            ApiError::UserNotFound(id) => {
                tracing::warn!(user_id = %id, "User not found");
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::with_details("User not found", format!("User ID: {}", id)),
                )
            }
            ApiError::Forbidden(reason) => {
                tracing::warn!(reason = %reason, "Forbidden transition");
                (
                    StatusCode::FORBIDDEN,
                    ErrorResponse::with_details("Forbidden", reason.to_string()),
                )
            }
            ApiError::Database(db_err) => {
                tracing::error!(error = %db_err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_details("Database error", db_err.to_string()),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!(message = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Internal server error"),
                )
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!(message = %msg, "Bad request");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::with_details("Bad request", msg.clone()),
                )
            }
            ApiError::Conflict(msg) => {
                tracing::warn!(message = %msg, "Conflict");
                (
                    StatusCode::CONFLICT,
                    ErrorResponse::with_details("Conflict", msg.clone()),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use taskmarket_core::JobStatus;

    /// Helper to extract status code and body from a response
    async fn extract_response(response: Response) -> (StatusCode, ErrorResponse) {
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();
        (status, error_response)
    }

    #[tokio::test]
    async fn test_job_not_found_returns_404() {
        let error = ApiError::JobNotFound("job-abc".to_string());
        let (status, body) = extract_response(error.into_response()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Job not found");
        assert!(body.details.unwrap().contains("job-abc"));
    }

    #[tokio::test]
    async fn test_bid_not_found_returns_404() {
        let error = ApiError::BidNotFound("bid-9".to_string());
        let (status, body) = extract_response(error.into_response()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Bid not found");
        assert!(body.details.unwrap().contains("bid-9"));
    }

    #[tokio::test]
    async fn test_transition_error_returns_403() {
        let error = ApiError::Forbidden(TransitionError::NotOpen {
            status: JobStatus::Booked,
        });
        let (status, body) = extract_response(error.into_response()).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body.error, "Forbidden");
        assert!(body.details.unwrap().contains("BOOKED"));
    }

    #[tokio::test]
    async fn test_bad_request_returns_400() {
        let error = ApiError::BadRequest("score must be 1..=5".to_string());
        let (status, body) = extract_response(error.into_response()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Bad request");
        assert!(body.details.unwrap().contains("score"));
    }

    #[tokio::test]
    async fn test_conflict_returns_409() {
        let error = ApiError::Conflict("Already rated".to_string());
        let (status, body) = extract_response(error.into_response()).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.error, "Conflict");
    }

    #[tokio::test]
    async fn test_internal_error_returns_500_without_details() {
        let error = ApiError::Internal("Something went wrong".to_string());
        let (status, body) = extract_response(error.into_response()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Internal server error");
        // Internal errors should NOT expose details to clients
        assert!(body.details.is_none());
    }

    #[test]
    fn test_error_response_serialization() {
        let response = ErrorResponse::new("Test error");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"error\":\"Test error\""));
        assert!(!json.contains("details")); // None should be skipped

        let response = ErrorResponse::with_details("Test error", "More info");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"details\":\"More info\""));
    }

    #[test]
    fn test_api_error_from_transition_error() {
        let api_err: ApiError = TransitionError::WindowClosed.into();
        assert!(matches!(api_err, ApiError::Forbidden(_)));
        assert_eq!(api_err.to_string(), "Forbidden: accept window has closed");
    }
}
