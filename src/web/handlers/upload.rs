//! Upload handler for the Web API.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::{header, HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;
use url::Url;

use crate::broadcast::BroadcastEvent;
use crate::web::dto::UploadResponse;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Multipart field carrying the image.
pub const PHOTO_FIELD: &str = "photo";

/// Route prefix stored images are served under.
pub const UPLOADS_ROUTE: &str = "/uploads";

/// Host used in image URLs when the request carries no usable `Host` header.
pub const DEFAULT_PUBLIC_HOST: &str = "localhost";

/// The `photo` part of an upload, read fully into memory.
#[derive(Debug)]
struct PhotoPart {
    file_name: String,
    content: Vec<u8>,
}

/// POST /upload - Store an image and notify connected viewers.
///
/// Request body: multipart/form-data with a single `photo` file field.
/// The file is fully written before the broadcast, and the response is sent
/// only after the broadcast.
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) if is_multipart_request(&headers) => {
            tracing::debug!("Malformed multipart upload: {}", rejection);
            return Err(ApiError::storage(rejection.body_text()));
        }
        Err(rejection) => {
            tracing::debug!("Upload without multipart body: {}", rejection);
            return Err(ApiError::NoFileUploaded);
        }
    };

    let photo = read_photo(
        &mut multipart,
        state.max_upload_size_bytes(),
        state.max_upload_size_mb,
    )
    .await?
    .ok_or(ApiError::NoFileUploaded)?;

    let file = state.storage.store(&photo.content, &photo.file_name).await?;
    tracing::info!(
        stored_name = %file.stored_name,
        size = file.size,
        "Stored upload {:?}",
        file.original_name
    );

    let url = image_url(request_host(&headers), state.public_port, &file.stored_name)?;
    state.hub.publish(BroadcastEvent::new_image(url.clone())).await;

    Ok(Json(UploadResponse {
        filepath: url.to_string(),
    }))
}

/// Whether the request claims a `multipart/form-data` body, boundary or not.
fn is_multipart_request(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case("multipart/form-data"))
        .unwrap_or(false)
}

/// Read the first `photo` file field, enforcing `limit` bytes while reading.
///
/// Text fields named `photo` are skipped. Returns `Ok(None)` when the form
/// has no `photo` file.
async fn read_photo(
    multipart: &mut Multipart,
    limit: u64,
    limit_mb: u64,
) -> Result<Option<PhotoPart>, ApiError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit_mb))?
    {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            tracing::debug!("Skipping text field named {:?}", PHOTO_FIELD);
            continue;
        };
        let mut content = Vec::new();

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_error(e, limit_mb))?
        {
            if (content.len() + chunk.len()) as u64 > limit {
                tracing::debug!("Rejected upload {:?}: over {} bytes", file_name, limit);
                return Err(ApiError::FileTooLarge { limit_mb });
            }
            content.extend_from_slice(&chunk);
        }

        return Ok(Some(PhotoPart { file_name, content }));
    }

    Ok(None)
}

/// Map a multipart read failure; hitting the body length limit counts as an
/// oversized file.
fn multipart_error(err: MultipartError, limit_mb: u64) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::FileTooLarge { limit_mb }
    } else {
        ApiError::storage(err.body_text())
    }
}

fn request_host(headers: &HeaderMap) -> &str {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .unwrap_or(DEFAULT_PUBLIC_HOST)
}

/// Host part of a `Host` header value, without port. `None` if the value is
/// anything more than `host[:port]`.
fn bare_host(raw: &str) -> Option<String> {
    let parsed = Url::parse(&format!("http://{raw}")).ok()?;
    if !parsed.username().is_empty()
        || parsed.password().is_some()
        || parsed.path() != "/"
        || parsed.query().is_some()
        || parsed.fragment().is_some()
    {
        return None;
    }
    parsed.host_str().map(str::to_string)
}

/// Build the public URL of a stored image:
/// `http://<host>:<port>/uploads/<stored_name>`.
pub fn image_url(host: &str, port: u16, stored_name: &str) -> Result<Url, ApiError> {
    let host = bare_host(host).unwrap_or_else(|| DEFAULT_PUBLIC_HOST.to_string());
    let base = Url::parse(&format!("http://{host}:{port}/")).map_err(ApiError::storage)?;
    base.join(&format!(
        "{}/{}",
        UPLOADS_ROUTE.trim_start_matches('/'),
        stored_name
    ))
    .map_err(ApiError::storage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_image_url_basic() {
        let url = image_url("localhost:5000", 5000, "imageFile-1700000000000.png").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/uploads/imageFile-1700000000000.png"
        );
    }

    #[test]
    fn test_image_url_replaces_request_port() {
        let url = image_url("example.com:8080", 5000, "imageFile-1.jpg").unwrap();
        assert_eq!(url.as_str(), "http://example.com:5000/uploads/imageFile-1.jpg");
    }

    #[test]
    fn test_image_url_host_without_port() {
        let url = image_url("photos.local", 5000, "imageFile-1.gif").unwrap();
        assert_eq!(url.as_str(), "http://photos.local:5000/uploads/imageFile-1.gif");
    }

    #[test]
    fn test_image_url_ipv6_host() {
        let url = image_url("[::1]:5000", 5000, "imageFile-1.png").unwrap();
        assert_eq!(url.as_str(), "http://[::1]:5000/uploads/imageFile-1.png");
    }

    #[test]
    fn test_image_url_rejects_smuggled_components() {
        let url = image_url("evil.com/path?q=1", 5000, "imageFile-1.png").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/uploads/imageFile-1.png");

        let url = image_url("user@evil.com", 5000, "imageFile-1.png").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/uploads/imageFile-1.png");
    }

    #[test]
    fn test_request_host() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_host(&headers), DEFAULT_PUBLIC_HOST);

        headers.insert(header::HOST, HeaderValue::from_static("10.0.0.5:5000"));
        assert_eq!(request_host(&headers), "10.0.0.5:5000");
    }

    #[test]
    fn test_is_multipart_request() {
        let mut headers = HeaderMap::new();
        assert!(!is_multipart_request(&headers));

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        assert!(!is_multipart_request(&headers));

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("multipart/form-data"));
        assert!(is_multipart_request(&headers));

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("Multipart/Form-Data; boundary=abc"),
        );
        assert!(is_multipart_request(&headers));
    }

    #[test]
    fn test_bare_host() {
        assert_eq!(bare_host("localhost:5000").as_deref(), Some("localhost"));
        assert_eq!(bare_host("Example.COM").as_deref(), Some("example.com"));
        assert_eq!(bare_host("a b"), None);
    }
}
