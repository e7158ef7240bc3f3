//! Device location services.

use async_trait::async_trait;
use thiserror::Error;
use tickity_types::Coordinates;

/// Requested fix accuracy. Check-in reads at [`Accuracy::Balanced`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Accuracy {
    Low,
    #[default]
    Balanced,
    High,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("location unavailable: {0}")]
    Unavailable(String),
}

/// Foreground location access on the device.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Ask for foreground location permission. `Ok(false)` means denied.
    async fn request_permission(&self) -> Result<bool, LocationError>;

    /// Read the current position.
    async fn current_position(&self, accuracy: Accuracy) -> Result<Coordinates, LocationError>;
}
