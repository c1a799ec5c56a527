//! Metadata describing a stored upload.

use std::path::PathBuf;

/// An uploaded image that has been written to storage.
///
/// Created once the bytes are fully on disk; never modified or removed
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Filename supplied by the client. Untrusted, kept for logging only.
    pub original_name: String,
    /// Generated storage filename (`imageFile-<unix-millis><ext>`).
    pub stored_name: String,
    /// File size in bytes.
    pub size: u64,
    /// Location of the file on disk.
    pub path: PathBuf,
}

impl UploadedFile {
    /// Create a new UploadedFile.
    pub fn new(
        original_name: impl Into<String>,
        stored_name: impl Into<String>,
        size: u64,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            stored_name: stored_name.into(),
            size,
            path: path.into(),
        }
    }
}
