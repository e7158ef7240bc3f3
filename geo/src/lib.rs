//! Great-circle distance, geofence policy and device location interface.
//!
//! The distance is always computed. Whether it gates check-in is a policy
//! decision carried by [`Geofence::enforce`], off by default: the distance is
//! collected for display and telemetry while every position is admitted.

pub mod distance;
pub mod fence;
pub mod location;

pub use distance::{haversine_distance, EARTH_RADIUS_M};
pub use fence::{Geofence, GeofenceDecision, DEFAULT_RADIUS_M};
pub use location::{Accuracy, LocationError, LocationProvider};
