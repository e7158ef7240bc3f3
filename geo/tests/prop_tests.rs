use proptest::prelude::*;

use tickity_geo::{haversine_distance, Geofence, EARTH_RADIUS_M};
use tickity_types::Coordinates;

fn coordinates() -> impl Strategy<Value = Coordinates> {
    (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| Coordinates::new(lat, lon))
}

proptest! {
    /// Distance is never negative and never exceeds half the circumference.
    #[test]
    fn distance_is_bounded(a in coordinates(), b in coordinates()) {
        let d = haversine_distance(a, b);
        prop_assert!(d >= 0.0);
        prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_M + 1e-6);
    }

    /// Distance from a point to itself is zero.
    #[test]
    fn self_distance_is_zero(a in coordinates()) {
        prop_assert!(haversine_distance(a, a).abs() < 1e-6);
    }

    /// Moving further north along a meridian never gets closer.
    #[test]
    fn monotonic_along_meridian(
        lat in -80.0f64..80.0,
        lon in -180.0f64..180.0,
        step in 0.0001f64..5.0,
        extra in 0.0001f64..5.0,
    ) {
        let origin = Coordinates::new(lat, lon);
        let near = Coordinates::new(lat + step, lon);
        let far = Coordinates::new(lat + step + extra, lon);
        prop_assert!(haversine_distance(origin, near) < haversine_distance(origin, far));
    }

    /// An unenforced fence admits every position.
    #[test]
    fn unenforced_fence_always_admits(center in coordinates(), device in coordinates()) {
        let decision = Geofence::new(center).evaluate(device);
        prop_assert!(decision.admitted);
    }

    /// An enforced fence admits exactly the positions within its radius.
    #[test]
    fn enforced_fence_matches_radius(center in coordinates(), device in coordinates()) {
        let decision = Geofence::new(center).enforcing(true).evaluate(device);
        prop_assert_eq!(decision.admitted, decision.within_radius);
        prop_assert_eq!(decision.within_radius, decision.distance_m <= 100.0);
    }
}
