use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("camera permission denied")]
    PermissionDenied,

    #[error("capture cancelled by user")]
    Cancelled,

    #[error("capture failed: {0}")]
    Capture(String),

    #[error("failed to read image {path}: {reason}")]
    FileRead { path: String, reason: String },

    #[error("upload endpoint unreachable: {0}")]
    Unreachable(String),

    #[error("upload failed: {0}")]
    UploadFailed(String),

    #[error("invalid response from upload endpoint: {0}")]
    InvalidResponse(String),
}
