//! The check-in step machine.
//!
//! Steps run strictly forward: email, location, selfie, ready. Each step
//! operation is only accepted at its own step, and the machine moves past a
//! step only after that step's flag has been set. Failed steps change nothing
//! except the recorded distance, so the same operation can simply be retried.

use serde::Serialize;

use tickity_geo::{Accuracy, Geofence, GeofenceDecision, LocationError, LocationProvider};
use tickity_media::{CapturedImage, MediaCapture, MediaError};

use crate::cancel::CancelToken;
use crate::error::StepError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckInStep {
    #[default]
    Email,
    Location,
    Selfie,
    Ready,
}

impl CheckInStep {
    fn next(self) -> Self {
        match self {
            CheckInStep::Email => CheckInStep::Location,
            CheckInStep::Location => CheckInStep::Selfie,
            CheckInStep::Selfie | CheckInStep::Ready => CheckInStep::Ready,
        }
    }
}

/// Per-screen step state.
#[derive(Clone, Debug, Default)]
pub struct CheckInSteps {
    email_verified: bool,
    location_verified: bool,
    selfie_taken: bool,
    current: CheckInStep,
    distance_to_event_m: Option<f64>,
    selfie: Option<CapturedImage>,
}

impl CheckInSteps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> CheckInStep {
        self.current
    }

    pub fn email_verified(&self) -> bool {
        self.email_verified
    }

    pub fn location_verified(&self) -> bool {
        self.location_verified
    }

    pub fn selfie_taken(&self) -> bool {
        self.selfie_taken
    }

    /// Last computed distance to the venue, kept after verification.
    pub fn distance_to_event_m(&self) -> Option<f64> {
        self.distance_to_event_m
    }

    pub fn selfie(&self) -> Option<&CapturedImage> {
        self.selfie.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.current == CheckInStep::Ready
    }

    fn expect(&self, step: CheckInStep) -> Result<(), StepError> {
        if self.current != step {
            return Err(StepError::OutOfOrder {
                expected: step,
                actual: self.current,
            });
        }
        Ok(())
    }

    fn step_done(&self, step: CheckInStep) -> bool {
        match step {
            CheckInStep::Email => self.email_verified,
            CheckInStep::Location => self.location_verified,
            CheckInStep::Selfie => self.selfie_taken,
            CheckInStep::Ready => true,
        }
    }

    fn advance(&mut self) {
        if self.step_done(self.current) {
            let from = self.current;
            self.current = from.next();
            tracing::info!(?from, to = ?self.current, "check-in step advanced");
        }
    }

    /// Email verification is simulated and completes immediately.
    pub fn verify_email(&mut self) -> Result<(), StepError> {
        self.expect(CheckInStep::Email)?;
        self.email_verified = true;
        self.advance();
        Ok(())
    }

    /// Read the device position and evaluate it against `fence`.
    ///
    /// The distance is recorded whether or not the fence admits the position.
    pub async fn verify_location(
        &mut self,
        provider: &dyn LocationProvider,
        fence: &Geofence,
        cancel: &CancelToken,
    ) -> Result<GeofenceDecision, StepError> {
        self.expect(CheckInStep::Location)?;

        let granted = cancel
            .guard(provider.request_permission())
            .await?
            .map_err(location_error)?;
        if !granted {
            tracing::warn!("location permission denied");
            return Err(StepError::LocationPermissionDenied);
        }

        let position = cancel
            .guard(provider.current_position(Accuracy::Balanced))
            .await?
            .map_err(location_error)?;

        let decision = fence.evaluate(position);
        self.distance_to_event_m = Some(decision.distance_m);
        tracing::info!(
            %position,
            distance_m = decision.distance_m,
            within_radius = decision.within_radius,
            enforced = fence.enforce,
            "location evaluated"
        );

        if !decision.admitted {
            return Err(StepError::OutsideGeofence {
                distance_m: decision.distance_m,
                radius_m: fence.radius_m,
            });
        }

        self.location_verified = true;
        self.advance();
        Ok(decision)
    }

    /// Open the camera and keep the captured image for redemption.
    pub async fn take_selfie(
        &mut self,
        camera: &dyn MediaCapture,
        cancel: &CancelToken,
    ) -> Result<&CapturedImage, StepError> {
        self.expect(CheckInStep::Selfie)?;

        let image = cancel.guard(camera.capture()).await?.map_err(|e| match e {
            MediaError::PermissionDenied => StepError::CameraPermissionDenied,
            other => StepError::Capture(other),
        })?;

        tracing::debug!(uri = %image.uri, "selfie captured");
        self.selfie_taken = true;
        self.advance();
        Ok(self.selfie.insert(image))
    }
}

fn location_error(e: LocationError) -> StepError {
    match e {
        LocationError::PermissionDenied => StepError::LocationPermissionDenied,
        other => StepError::Location(other),
    }
}
