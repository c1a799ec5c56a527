//! Response DTOs for the upload API.

use serde::Serialize;

/// Successful upload response.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Public URL of the stored image.
    pub filepath: String,
}

/// Body for failures reported under an `error` key.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable error text.
    pub error: String,
}

/// Body for failures reported under a `message` key.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    /// Human-readable message.
    pub message: String,
}
