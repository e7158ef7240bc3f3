//! HTTP client for the check-in image-processing endpoint.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;

use crate::capture::CapturedImage;
use crate::MediaError;

/// Default timeout for upload requests. Image processing is slow.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Uploads a captured image and returns its persisted remote URL.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(&self, image: &CapturedImage) -> Result<String, MediaError>;
}

/// Raw JSON response from the image endpoint.
///
/// The API contract: `POST <base-url>` with multipart field `file`
/// returns `{"result": "<url>"}`.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    result: String,
}

/// Posts images to the configured endpoint as multipart form data.
pub struct HttpImageUploader {
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
    endpoint_url: String,
}

impl HttpImageUploader {
    pub fn new(endpoint_url: impl Into<String>) -> Result<Self, MediaError> {
        Self::with_timeout(endpoint_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        endpoint_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, MediaError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| MediaError::UploadFailed(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http_client,
            endpoint_url: endpoint_url.into(),
        })
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    async fn read_image(image: &CapturedImage) -> Result<Vec<u8>, MediaError> {
        let path = image.local_path().ok_or_else(|| MediaError::FileRead {
            path: image.uri.clone(),
            reason: "not a local file".to_string(),
        })?;
        tokio::fs::read(&path).await.map_err(|e| MediaError::FileRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl ImageUploader for HttpImageUploader {
    async fn upload(&self, image: &CapturedImage) -> Result<String, MediaError> {
        let bytes = Self::read_image(image).await?;
        let size = bytes.len();

        let part = Part::bytes(bytes)
            .file_name(image.file_name())
            .mime_str("image/jpeg")
            .map_err(|e| MediaError::UploadFailed(e.to_string()))?;
        let form = Form::new().part("file", part);

        tracing::debug!(url = %self.endpoint_url, size, "uploading check-in image");

        let response = self
            .http_client
            .post(&self.endpoint_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MediaError::Unreachable(format!("request timed out: {e}"))
                } else if e.is_connect() {
                    MediaError::Unreachable(format!("connection failed: {e}"))
                } else {
                    MediaError::UploadFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(MediaError::UploadFailed(format!(
                "HTTP status {}",
                response.status()
            )));
        }

        let body: UploadResponse = response.json().await.map_err(|e| {
            MediaError::InvalidResponse(format!("failed to parse upload response: {e}"))
        })?;

        parse_result(body)
    }
}

fn parse_result(body: UploadResponse) -> Result<String, MediaError> {
    let url = body.result.trim();
    if url.is_empty() {
        return Err(MediaError::InvalidResponse(
            "empty result URL".to_string(),
        ));
    }
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn upload_response_deserialization() {
        let json = r#"{"result": "https://res.cloudinary.com/demo/selfie.jpg"}"#;
        let resp: UploadResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            parse_result(resp).unwrap(),
            "https://res.cloudinary.com/demo/selfie.jpg"
        );
    }

    #[test]
    fn missing_result_field_is_rejected() {
        let json = r#"{"url": "https://x"}"#;
        assert!(serde_json::from_str::<UploadResponse>(json).is_err());
    }

    #[test]
    fn empty_result_is_invalid() {
        let resp = UploadResponse {
            result: "  ".into(),
        };
        assert!(matches!(
            parse_result(resp),
            Err(MediaError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn read_image_from_temp_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\xff\xd8\xff jpeg").unwrap();
        let image = CapturedImage::from_path(file.path());
        let bytes = HttpImageUploader::read_image(&image).await.unwrap();
        assert_eq!(&bytes[..3], b"\xff\xd8\xff");
    }

    #[tokio::test]
    async fn missing_file_fails_before_any_request() {
        let uploader = HttpImageUploader::new("http://127.0.0.1:9/upload").unwrap();
        let image = CapturedImage::from_path("/nonexistent/selfie.jpg");
        let err = uploader.upload(&image).await.unwrap_err();
        assert!(matches!(err, MediaError::FileRead { .. }));
    }
}
