//! API handlers for the upload relay.

pub mod upload;

pub use upload::*;

use std::sync::Arc;

use crate::broadcast::BroadcastHub;
use crate::file::FileStorage;

/// Application state shared across handlers.
pub struct AppState {
    /// Storage uploaded images are written to.
    pub storage: FileStorage,
    /// Hub of connected viewers.
    pub hub: Arc<BroadcastHub>,
    /// Maximum upload size in megabytes.
    pub max_upload_size_mb: u64,
    /// Port advertised in image URLs.
    pub public_port: u16,
}

impl AppState {
    /// Create a new application state with a fresh hub.
    pub fn new(storage: FileStorage, max_upload_size_mb: u64, public_port: u16) -> Self {
        Self {
            storage,
            hub: Arc::new(BroadcastHub::new()),
            max_upload_size_mb,
            public_port,
        }
    }

    /// Use an existing hub.
    pub fn with_hub(mut self, hub: Arc<BroadcastHub>) -> Self {
        self.hub = hub;
        self
    }

    /// Maximum upload size in bytes.
    pub fn max_upload_size_bytes(&self) -> u64 {
        self.max_upload_size_mb * 1024 * 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_app_state_with_hub() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path()).unwrap();
        let hub = Arc::new(BroadcastHub::new());
        let (_id, _rx) = hub.connect().await;

        let state = AppState::new(storage, 5, 5000).with_hub(hub.clone());

        assert!(Arc::ptr_eq(&state.hub, &hub));
        assert_eq!(state.hub.client_count().await, 1);
        assert_eq!(state.max_upload_size_bytes(), 5 * 1024 * 1024);
    }
}
