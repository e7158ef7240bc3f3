//! Nullable camera and uploader.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tickity_media::{CapturedImage, ImageUploader, MediaCapture, MediaError};

/// A camera that returns scripted results in order, repeating the last one.
pub struct NullCamera {
    results: Mutex<VecDeque<Result<CapturedImage, MediaError>>>,
    captures: AtomicUsize,
}

impl NullCamera {
    pub fn returning(uri: &str) -> Self {
        Self::scripted(vec![Ok(CapturedImage::from_uri(uri))])
    }

    pub fn scripted(results: Vec<Result<CapturedImage, MediaError>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            captures: AtomicUsize::new(0),
        }
    }

    pub fn capture_count(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }
}

fn clone_media_result(r: &Result<CapturedImage, MediaError>) -> Result<CapturedImage, MediaError> {
    match r {
        Ok(image) => Ok(image.clone()),
        Err(MediaError::PermissionDenied) => Err(MediaError::PermissionDenied),
        Err(MediaError::Cancelled) => Err(MediaError::Cancelled),
        Err(other) => Err(MediaError::Capture(other.to_string())),
    }
}

#[async_trait]
impl MediaCapture for NullCamera {
    async fn capture(&self) -> Result<CapturedImage, MediaError> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        let mut results = self.results.lock().unwrap();
        if results.len() > 1 {
            results
                .pop_front()
                .unwrap_or(Err(MediaError::Capture("no scripted result".into())))
        } else {
            results
                .front()
                .map(clone_media_result)
                .unwrap_or(Err(MediaError::Capture("no scripted result".into())))
        }
    }
}

/// An uploader that answers with a fixed URL or failure after an optional delay.
pub struct NullUploader {
    url: Mutex<Option<String>>,
    delay: Duration,
    uploads: Mutex<Vec<CapturedImage>>,
    calls: AtomicUsize,
}

impl NullUploader {
    pub fn returning(url: &str) -> Self {
        Self {
            url: Mutex::new(Some(url.to_string())),
            delay: Duration::ZERO,
            uploads: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Every upload fails with an HTTP 500.
    pub fn failing() -> Self {
        let null = Self::returning("");
        *null.url.lock().unwrap() = None;
        null
    }

    /// Suspend for `delay` (tokio time) before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn uploaded(&self) -> Vec<CapturedImage> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageUploader for NullUploader {
    async fn upload(&self, image: &CapturedImage) -> Result<String, MediaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.uploads.lock().unwrap().push(image.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        } else {
            tokio::task::yield_now().await;
        }
        let url = self.url.lock().unwrap().clone();
        url.ok_or_else(|| MediaError::UploadFailed("HTTP status 500 Internal Server Error".into()))
    }
}
