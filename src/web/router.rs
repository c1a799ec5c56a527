//! Router configuration for the Web API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{upload_image, AppState, UPLOADS_ROUTE};
use super::middleware::create_cors_layer;
use super::ws::feed_ws_handler;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

/// Create the main router.
///
/// - `POST /upload` - store an image and broadcast its URL
/// - `GET /uploads/<name>` - stored images
/// - `GET /ws` - image feed WebSocket
/// - `GET /health` - liveness check
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let body_limit = app_state.max_upload_size_bytes() + MULTIPART_OVERHEAD_BYTES;
    let uploads = ServeDir::new(app_state.storage.base_path());

    Router::new()
        .route(
            "/upload",
            post(upload_image).layer(DefaultBodyLimit::max(body_limit as usize)),
        )
        .route("/ws", get(feed_ws_handler))
        .nest_service(UPLOADS_ROUTE, uploads)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer()),
        )
        .with_state(app_state)
        .merge(create_health_router())
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
