//! Web server for photocast.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::broadcast::BroadcastHub;
use crate::config::Config;
use crate::file::FileStorage;
use crate::Result;

use super::handlers::AppState;
use super::router::create_router;

/// Web server for the upload relay.
pub struct WebServer {
    /// Host address to bind.
    host: String,
    /// Port to bind (0 picks a free port).
    port: u16,
    /// Storage for uploaded images.
    storage: FileStorage,
    /// Maximum upload size in megabytes.
    max_upload_size_mb: u64,
    /// Hub of connected viewers.
    hub: Arc<BroadcastHub>,
}

impl WebServer {
    /// Create a new web server, preparing the storage directory.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let storage = FileStorage::new(&config.files.storage_path)?;
        tracing::info!("File storage initialized at: {}", config.files.storage_path);

        Ok(Self {
            host: config.server.host.clone(),
            port: config.server.port,
            storage,
            max_upload_size_mb: config.files.max_upload_size_mb,
            hub: Arc::new(BroadcastHub::new()),
        })
    }

    /// Get the broadcast hub shared with the router.
    pub fn hub(&self) -> Arc<BroadcastHub> {
        self.hub.clone()
    }

    /// Bind the listener and build the router advertising the bound port.
    async fn bind(self) -> std::io::Result<(TcpListener, Router, SocketAddr)> {
        let listener = TcpListener::bind((self.host.as_str(), self.port)).await?;
        let local_addr = listener.local_addr()?;

        let app_state = AppState::new(self.storage, self.max_upload_size_mb, local_addr.port())
            .with_hub(self.hub);
        let router = create_router(Arc::new(app_state));

        tracing::info!("Server running on http://{}", local_addr);
        Ok((listener, router, local_addr))
    }

    /// Run the web server until Ctrl+C or SIGTERM.
    pub async fn run(self) -> std::io::Result<()> {
        let (listener, router, _) = self.bind().await?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::io::Result<SocketAddr> {
        let (listener, router, local_addr) = self.bind().await?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_config(storage: &TempDir) -> Config {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        config.files.storage_path = storage.path().join("uploads").display().to_string();
        config
    }

    #[test]
    fn test_web_server_new_creates_storage() {
        let temp_dir = TempDir::new().unwrap();
        let config = create_test_config(&temp_dir);

        let server = WebServer::new(&config).unwrap();

        assert!(temp_dir.path().join("uploads").is_dir());
        assert_eq!(server.host, "127.0.0.1");
        assert_eq!(server.max_upload_size_mb, 5);
    }

    #[test]
    fn test_web_server_new_rejects_invalid_config() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = create_test_config(&temp_dir);
        config.files.max_upload_size_mb = 0;

        assert!(WebServer::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_web_server_run() {
        let temp_dir = TempDir::new().unwrap();
        let config = create_test_config(&temp_dir);

        let server = WebServer::new(&config).unwrap();
        let addr = server.run_with_addr().await.unwrap();
        assert_ne!(addr.port(), 0);

        let client = reqwest::Client::new();
        let resp = client
            .get(format!("http://{}/health", addr))
            .send()
            .await
            .unwrap();

        assert!(resp.status().is_success());
        assert_eq!(resp.text().await.unwrap(), "OK");
    }
}
