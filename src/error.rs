//! Crate-wide error type and its mapping onto the HTTP error body shape
//! `{error, code}` documented in the external interface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Every failure mode the core can surface, synchronous precondition
/// failures as well as I/O failures discovered after validation passed.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("topic not found: {0}")]
    TopicNotFound(String),

    #[error("topic already exists: {0}")]
    TopicAlreadyExists(String),

    #[error("no schema registered for {topic}/{event_type}")]
    SchemaNotFound { topic: String, event_type: String },

    #[error("payload rejected by schema: {0}")]
    SchemaValidation(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("consumer not found: {0}")]
    ConsumerNotFound(String),

    #[error("invalid consumer registration: {0}")]
    InvalidConsumerRegistration(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("internal error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// PascalCase identifier used as the `code` field of the error body.
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::TopicNotFound(_) => "TopicNotFound",
            StoreError::TopicAlreadyExists(_) => "TopicAlreadyExists",
            StoreError::SchemaNotFound { .. } => "SchemaNotFound",
            StoreError::SchemaValidation(_) => "SchemaValidation",
            StoreError::InvalidRequest(_) => "InvalidRequest",
            StoreError::ConsumerNotFound(_) => "ConsumerNotFound",
            StoreError::InvalidConsumerRegistration(_) => "InvalidConsumerRegistration",
            StoreError::Internal(_) | StoreError::Io(_) => "Internal",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            StoreError::TopicNotFound(_) | StoreError::ConsumerNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            StoreError::TopicAlreadyExists(_)
            | StoreError::SchemaNotFound { .. }
            | StoreError::SchemaValidation(_)
            | StoreError::InvalidRequest(_)
            | StoreError::InvalidConsumerRegistration(_) => StatusCode::BAD_REQUEST,
            StoreError::Internal(_) | StoreError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        if matches!(self, StoreError::Internal(_) | StoreError::Io(_)) {
            tracing::error!(error = %self, "internal error");
        }
        let status = self.status();
        let body = ErrorBody {
            error: self.to_string(),
            code: self.code(),
        };
        (status, Json(body)).into_response()
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
