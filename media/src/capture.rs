//! Camera capture interface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::MediaError;

/// An image captured on the device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedImage {
    /// Local URI as reported by the camera (e.g. `file:///.../selfie.jpg`).
    pub uri: String,
    /// Filesystem path of a temporary file holding the image, if any.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl CapturedImage {
    pub fn from_uri(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            path: None,
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            uri: format!("file://{}", path.display()),
            path: Some(path),
        }
    }

    /// Where the image bytes can be read from: the explicit path, or the
    /// `file://` URI stripped of its scheme.
    pub fn local_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.path {
            return Some(path.clone());
        }
        self.uri.strip_prefix("file://").map(PathBuf::from)
    }

    /// File name used for the multipart upload.
    pub fn file_name(&self) -> String {
        self.local_path()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "selfie.jpg".to_string())
    }
}

/// Opens the device camera and returns the captured image.
#[async_trait]
pub trait MediaCapture: Send + Sync {
    async fn capture(&self) -> Result<CapturedImage, MediaError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_path_from_file_uri() {
        let image = CapturedImage::from_uri("file:///tmp/cam/IMG_1.jpg");
        assert_eq!(image.local_path(), Some(PathBuf::from("/tmp/cam/IMG_1.jpg")));
        assert_eq!(image.file_name(), "IMG_1.jpg");
    }

    #[test]
    fn content_uri_has_no_local_path() {
        let image = CapturedImage::from_uri("content://media/external/images/1");
        assert_eq!(image.local_path(), None);
        assert_eq!(image.file_name(), "selfie.jpg");
    }

    #[test]
    fn explicit_path_wins() {
        let image = CapturedImage::from_path("/data/selfie.jpg");
        assert_eq!(image.uri, "file:///data/selfie.jpg");
        assert_eq!(image.local_path(), Some(PathBuf::from("/data/selfie.jpg")));
    }
}
