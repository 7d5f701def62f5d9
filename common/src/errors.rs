//! Application error types.
//!
//! Every error that reaches the HTTP layer is serialized as
//! `{"error": <message>}`, the wire shape the console and any other
//! client of `/query` expect.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Convenient result alias used across services.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body is missing, malformed, or has empty fields.
    #[error("invalid request")]
    InvalidRequest,

    /// Could not establish a connection to the selected provider.
    #[error("database connection failed: {0}")]
    DatabaseConnection(String),

    /// The statement was rejected or failed during execution.
    #[error("query execution failed: {0}")]
    DatabaseQuery(String),

    /// Configuration could not be interpreted.
    #[error("configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// HTTP status code this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest => StatusCode::BAD_REQUEST,
            AppError::DatabaseConnection(_)
            | AppError::DatabaseQuery(_)
            | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_request_maps_to_400() {
        assert_eq!(AppError::InvalidRequest.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_query_failure_maps_to_500() {
        let err = AppError::DatabaseQuery("boom".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_request_message_is_stable() {
        // Clients match on this exact body.
        assert_eq!(AppError::InvalidRequest.to_string(), "invalid request");
    }
}
