use thiserror::Error;

use tickity_geo::LocationError;
use tickity_media::MediaError;
use tickity_relay::RelayError;
use tickity_store::StoreError;
use tickity_types::{EventId, TxHash};

use crate::cancel::Cancelled;
use crate::steps::CheckInStep;

/// Failure of a single check-in step. The step stays where it was.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("expected step {expected:?}, machine is at {actual:?}")]
    OutOfOrder {
        expected: CheckInStep,
        actual: CheckInStep,
    },

    #[error("sign in with a wallet to check in")]
    SignInRequired,

    #[error("already checked in to event {0}")]
    AlreadyCheckedIn(EventId),

    #[error("location permission is required to verify you are at the event")]
    LocationPermissionDenied,

    #[error("could not read your location: {0}")]
    Location(LocationError),

    #[error("you are {distance_m:.0} m from the event; check-in opens within {radius_m:.0} m")]
    OutsideGeofence { distance_m: f64, radius_m: f64 },

    #[error("camera permission is required to take a check-in selfie")]
    CameraPermissionDenied,

    #[error("could not take a selfie: {0}")]
    Capture(MediaError),

    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

impl StepError {
    /// Whether re-invoking the same step can succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            StepError::OutOfOrder { .. }
                | StepError::SignInRequired
                | StepError::AlreadyCheckedIn(_)
                | StepError::Cancelled(_)
        )
    }
}

/// Failure of a redemption attempt.
#[derive(Debug, Error)]
pub enum RedemptionError {
    #[error("image upload failed: {0}")]
    Upload(MediaError),

    #[error("no ticket found for event {0}")]
    NoTicket(EventId),

    #[error("{0}")]
    Relay(RelayError),

    #[error("could not confirm check-in from event logs: {0}")]
    LogScan(RelayError),

    #[error("could not confirm check-in: no TicketUsed log found")]
    NoTicketUsedLog,

    #[error("checked in on-chain ({hash}) but saving locally failed: {source}")]
    Persist {
        hash: TxHash,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

impl RedemptionError {
    /// A transaction hash learned before the attempt failed, if any.
    pub fn known_hash(&self) -> Option<TxHash> {
        match self {
            RedemptionError::Persist { hash, .. } => Some(*hash),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(String),

    #[error("invalid config value: {0}")]
    Invalid(String),
}
