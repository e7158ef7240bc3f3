//! Headless stand-ins for the phone's GPS and camera.

use async_trait::async_trait;
use std::path::PathBuf;

use tickity_geo::{Accuracy, LocationError, LocationProvider};
use tickity_media::{CapturedImage, MediaCapture, MediaError};
use tickity_types::Coordinates;

/// Reports a position given on the command line.
pub struct FixedLocation {
    position: Coordinates,
}

impl FixedLocation {
    pub fn new(position: Coordinates) -> Self {
        Self { position }
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn request_permission(&self) -> Result<bool, LocationError> {
        Ok(true)
    }

    async fn current_position(&self, _accuracy: Accuracy) -> Result<Coordinates, LocationError> {
        Ok(self.position)
    }
}

/// "Captures" an existing image file.
pub struct FileCamera {
    path: PathBuf,
}

impl FileCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MediaCapture for FileCamera {
    async fn capture(&self) -> Result<CapturedImage, MediaError> {
        let meta = tokio::fs::metadata(&self.path)
            .await
            .map_err(|e| MediaError::FileRead {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })?;
        if !meta.is_file() {
            return Err(MediaError::FileRead {
                path: self.path.display().to_string(),
                reason: "not a regular file".into(),
            });
        }
        Ok(CapturedImage::from_path(&self.path))
    }
}
