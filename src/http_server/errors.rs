//! # HTTP API Errors
//!
//! Maps repository outcomes to status codes and `{"error": ...}` bodies.
//! Store faults are logged in full but answered with a fixed message so
//! internal error text never reaches the caller.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::repository::RepoError;

/// Body returned for faults
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Result type for item handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP API errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// No item matches the requested id
    #[error("Item not found")]
    ItemNotFound,

    /// Request body could not be decoded into the expected shape
    #[error(transparent)]
    InvalidBody(#[from] JsonRejection),

    /// The repository call failed
    #[error(transparent)]
    Repository(#[from] RepoError),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ItemNotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidBody(rejection) => rejection.status(),
            ApiError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to the caller
    pub fn public_message(&self) -> String {
        match self {
            ApiError::ItemNotFound => self.to_string(),
            ApiError::InvalidBody(rejection) => rejection.body_text(),
            ApiError::Repository(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Repository(ref source) = self {
            error!(error = %source, "item operation failed");
        }

        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.public_message(),
        });
        (status, body).into_response()
    }
}
