//! Test helpers for the upload API tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::http::header::HOST;
use axum::http::HeaderValue;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use tempfile::TempDir;

use photocast::file::FileStorage;
use photocast::web::create_router;
use photocast::web::handlers::AppState;

/// Host header sent with every test upload.
pub const TEST_HOST: &str = "localhost:5000";

/// Port advertised in image URLs by the test app.
pub const TEST_PORT: u16 = 5000;

/// A router under test together with its storage directory and state.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    /// Keeps the storage directory alive for the test's duration.
    pub temp_dir: TempDir,
}

impl TestApp {
    /// Create an app with the given upload limit in megabytes.
    pub fn new(max_upload_size_mb: u64) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let storage = FileStorage::new(temp_dir.path().join("uploads"))
            .expect("Failed to create storage");
        let state = Arc::new(AppState::new(storage, max_upload_size_mb, TEST_PORT));
        let server =
            TestServer::new(create_router(state.clone())).expect("Failed to create test server");

        Self {
            server,
            state,
            temp_dir,
        }
    }

    /// POST a multipart form to /upload.
    pub async fn upload(&self, form: MultipartForm) -> TestResponse {
        self.server
            .post("/upload")
            .add_header(HOST, HeaderValue::from_static(TEST_HOST))
            .multipart(form)
            .await
    }

    /// Names of every file currently in storage.
    pub fn stored_files(&self) -> Vec<String> {
        list_dir(self.state.storage.base_path())
    }
}

/// Form with a single `photo` file part.
pub fn photo_form(file_name: &str, content: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        "photo",
        Part::bytes(content)
            .file_name(file_name.to_string())
            .mime_type("image/png"),
    )
}

/// Deterministic, non-trivial test bytes.
pub fn image_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

fn list_dir(path: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(path)
        .expect("Failed to read storage dir")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
