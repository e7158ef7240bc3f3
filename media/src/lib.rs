//! Selfie capture interface and check-in image upload client.
//!
//! The camera is an external collaborator reached through [`MediaCapture`].
//! Captured images are posted as multipart form data to an image-processing
//! endpoint which answers `{"result": "<url>"}` with the persisted URL.

pub mod capture;
pub mod error;
pub mod upload;

pub use capture::{CapturedImage, MediaCapture};
pub use error::MediaError;
pub use upload::{HttpImageUploader, ImageUploader};
