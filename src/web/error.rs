//! API error handling for the upload endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use super::dto::{ErrorBody, MessageBody};

/// Errors returned by the upload endpoint.
///
/// Client input errors map to 400, everything else to 500. Each variant has a
/// fixed JSON body shape.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request carried no `photo` file.
    #[error("No file uploaded.")]
    NoFileUploaded,

    /// The file is larger than the configured limit.
    #[error("File size exceeds limit of {limit_mb}MB")]
    FileTooLarge {
        /// Configured limit in megabytes.
        limit_mb: u64,
    },

    /// Multipart parsing or disk write failed.
    #[error("{0}")]
    Storage(String),
}

impl ApiError {
    /// Create a storage error from any displayable error.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NoFileUploaded | ApiError::FileTooLarge { .. } => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ApiError::NoFileUploaded => (
                status,
                Json(MessageBody {
                    message: self.to_string(),
                }),
            )
                .into_response(),
            ApiError::FileTooLarge { .. } => (
                status,
                Json(ErrorBody {
                    error: self.to_string(),
                }),
            )
                .into_response(),
            ApiError::Storage(ref msg) => {
                tracing::error!("Upload failed: {}", msg);
                (
                    status,
                    Json(ErrorBody {
                        error: self.to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

impl From<crate::PhotocastError> for ApiError {
    fn from(err: crate::PhotocastError) -> Self {
        ApiError::storage(err)
    }
}
