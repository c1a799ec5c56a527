//! File storage for uploaded images.
//!
//! This module provides physical file storage functionality:
//! - Timestamp-based file naming (`imageFile-<unix-millis><ext>`)
//! - A monotonic per-storage clock so names never repeat
//! - Non-blocking writes through `tokio::fs`
//!
//! Files are stored flat in the base directory so the directory itself can be
//! served under `/uploads`:
//! ```text
//! {base_path}/
//! ├── imageFile-1700000000000.png
//! ├── imageFile-1700000000001.jpg
//! └── ...
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use super::UploadedFile;
use crate::{PhotocastError, Result};

/// Prefix of every generated storage filename.
pub const STORED_NAME_PREFIX: &str = "imageFile-";

/// How many fresh names `store` tries before giving up.
const MAX_NAME_ATTEMPTS: usize = 16;

/// File storage service for uploaded images.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Base directory for file storage.
    base_path: PathBuf,
    /// Last millisecond stamp handed out by this storage.
    last_stamp: Arc<AtomicI64>,
}

impl FileStorage {
    /// Create a new FileStorage with the given base path.
    ///
    /// The base directory will be created if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path)?;

        Ok(Self {
            base_path,
            last_stamp: Arc::new(AtomicI64::new(0)),
        })
    }

    /// Get the base path of this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Write `content` under a freshly generated name.
    ///
    /// The file is opened with `create_new`, so an existing file is never
    /// overwritten; on a name clash a new name is generated and the write is
    /// retried. A failure part-way through the write may leave a partial file.
    pub async fn store(&self, content: &[u8], original_name: &str) -> Result<UploadedFile> {
        for _ in 0..MAX_NAME_ATTEMPTS {
            let stored_name = self.generate_stored_name(original_name);
            let path = self.get_file_path(&stored_name);

            let mut file = match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    tracing::debug!("Stored name {} already taken, retrying", stored_name);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            file.write_all(content).await?;
            file.flush().await?;

            return Ok(UploadedFile::new(
                original_name,
                stored_name,
                content.len() as u64,
                path,
            ));
        }

        Err(PhotocastError::Storage(format!(
            "no free filename after {MAX_NAME_ATTEMPTS} attempts"
        )))
    }

    /// Get the full file path for a stored name.
    pub fn get_file_path(&self, stored_name: &str) -> PathBuf {
        self.base_path.join(stored_name)
    }

    /// Generate a new stored name preserving the original extension.
    pub fn generate_stored_name(&self, original_name: &str) -> String {
        let stamp = self.next_stamp(Utc::now().timestamp_millis());
        let ext = Self::extract_extension(original_name);
        format!("{STORED_NAME_PREFIX}{stamp}{ext}")
    }

    /// Hand out `now`, or one past the previous stamp if the clock has not
    /// moved on (or went backwards).
    fn next_stamp(&self, now: i64) -> i64 {
        let mut prev = self.last_stamp.load(Ordering::Acquire);
        loop {
            let next = now.max(prev + 1);
            match self.last_stamp.compare_exchange_weak(
                prev,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }

    /// Extract the extension of a client-supplied filename, dot included.
    ///
    /// Directory components (either separator) are ignored. Returns `""` when
    /// there is no extension or it contains anything but ASCII alphanumerics.
    fn extract_extension(original_name: &str) -> String {
        let file_name = original_name
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or(original_name);

        Path::new(file_name)
            .extension()
            .and_then(|s| s.to_str())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default()
    }
}
