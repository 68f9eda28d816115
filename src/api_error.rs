//! HTTP-facing error type shared by every handler.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::errors::DataStoreError;
use crate::occupancy::OccupancyError;
use crate::validate::ValidationErrors;

/// Every way a request can fail, mapped onto a status code and a JSON body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// One or more fields failed validation.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    /// The request body could not be parsed as the expected JSON shape.
    #[error("invalid request body: {0}")]
    BadRequest(String),
    /// A requested row or collection does not exist.
    #[error("{0}")]
    NotFound(String),
    /// A parking with the same address already exists.
    #[error("such address already exists")]
    DuplicateAddress,
    /// An entrance or exit transition was refused.
    #[error(transparent)]
    Occupancy(#[from] OccupancyError),
    /// The store failed in a way the caller cannot fix.
    #[error("storage error: {0}")]
    Store(#[from] DataStoreError),
}

impl ApiError {
    /// Status code returned for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) | ApiError::DuplicateAddress => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Occupancy(e) => match e {
                OccupancyError::NotFound(_) | OccupancyError::NoPaymentMethod => {
                    StatusCode::NOT_FOUND
                }
                OccupancyError::NoCapacity
                | OccupancyError::AlreadyParked
                | OccupancyError::AlreadyExited => StatusCode::BAD_REQUEST,
                OccupancyError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable name of the error.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "ValidationError",
            ApiError::BadRequest(_) => "BadRequest",
            ApiError::NotFound(_) => "NotFound",
            ApiError::DuplicateAddress => "DuplicateAddress",
            ApiError::Occupancy(e) => e.kind(),
            ApiError::Store(_) => "StorageError",
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Store(DataStoreError::from(e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        } else {
            tracing::warn!("request rejected: {}", self);
        }

        let mut body = json!({
            "error": self.to_string(),
            "kind": self.kind(),
            "status": status.as_u16(),
        });
        if let ApiError::Validation(errors) = &self {
            body["error"] = json!("validation failed");
            body["fields"] = json!(errors);
        }

        (status, Json(body)).into_response()
    }
}
