//! Error types for the API server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use database::{DatabaseError, ValidationError};

/// Errors that can occur while handling a request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Database or workflow error.
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// Malformed request (bad query string, unreadable body).
    #[error("{0}")]
    BadRequest(String),

    /// Unknown route.
    #[error("Path not found: {0}")]
    PathNotFound(String),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Database(DatabaseError::Validation(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Database(err) => match err {
                DatabaseError::NotFound { .. } => StatusCode::NOT_FOUND,
                DatabaseError::Validation(_)
                | DatabaseError::InvalidStatusTransition { .. }
                | DatabaseError::AlreadySeated { .. }
                | DatabaseError::TableOccupied { .. }
                | DatabaseError::InsufficientCapacity { .. }
                | DatabaseError::TableNotOccupied { .. } => StatusCode::BAD_REQUEST,
                DatabaseError::Sqlx(_) | DatabaseError::Migration(_) => {
                    tracing::error!("Database error: {}", err);
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PathNotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = serde_json::json!({
            "error": self.to_string()
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for request handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
