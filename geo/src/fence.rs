//! Geofence policy around an event location.

use serde::{Deserialize, Serialize};
use tickity_types::Coordinates;

use crate::distance::haversine_distance;

/// Default check-in radius around the venue.
pub const DEFAULT_RADIUS_M: f64 = 100.0;

/// A circular fence around the event location.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Geofence {
    pub center: Coordinates,
    pub radius_m: f64,
    /// When false, positions outside the radius are still admitted.
    pub enforce: bool,
}

/// Outcome of evaluating a device position against a [`Geofence`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeofenceDecision {
    pub distance_m: f64,
    pub within_radius: bool,
    pub admitted: bool,
}

impl Geofence {
    /// A telemetry-only fence with the default radius.
    pub fn new(center: Coordinates) -> Self {
        Self {
            center,
            radius_m: DEFAULT_RADIUS_M,
            enforce: false,
        }
    }

    pub fn with_radius(mut self, radius_m: f64) -> Self {
        self.radius_m = radius_m;
        self
    }

    pub fn enforcing(mut self, enforce: bool) -> Self {
        self.enforce = enforce;
        self
    }

    pub fn evaluate(&self, device: Coordinates) -> GeofenceDecision {
        let distance_m = haversine_distance(device, self.center);
        let within_radius = distance_m <= self.radius_m;
        let admitted = if self.enforce { within_radius } else { true };
        GeofenceDecision {
            distance_m,
            within_radius,
            admitted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VENUE: Coordinates = Coordinates::new(37.7749, -122.4194);

    fn about_km_north() -> Coordinates {
        Coordinates::new(VENUE.latitude + 0.009, VENUE.longitude)
    }

    #[test]
    fn unenforced_fence_admits_far_positions() {
        let fence = Geofence::new(VENUE);
        let decision = fence.evaluate(about_km_north());
        assert!(!decision.within_radius);
        assert!(decision.admitted);
        assert!(decision.distance_m > 900.0);
    }

    #[test]
    fn enforced_fence_rejects_far_positions() {
        let fence = Geofence::new(VENUE).enforcing(true);
        let decision = fence.evaluate(about_km_north());
        assert!(!decision.admitted);
    }

    #[test]
    fn enforced_fence_admits_inside_radius() {
        let fence = Geofence::new(VENUE).enforcing(true);
        let decision = fence.evaluate(VENUE);
        assert!(decision.within_radius);
        assert!(decision.admitted);
        assert_eq!(decision.distance_m, 0.0);
    }

    #[test]
    fn custom_radius() {
        let fence = Geofence::new(VENUE).with_radius(2_000.0).enforcing(true);
        assert!(fence.evaluate(about_km_north()).admitted);
    }
}
