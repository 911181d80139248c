use hidayah::prelude::*;
use hidayah::{BearingDegrees, HeadingDegrees, compute_bearing, qibla_bearing};
use proptest::prelude::*;

fn any_point() -> impl Strategy<Value = GeoPoint> {
    (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lng)| GeoPoint::new(lat, lng).unwrap())
}

proptest! {
    /// Invariant: every bearing lands in [0, 360).
    #[test]
    fn bearing_in_range(origin in any_point(), target in any_point()) {
        let b = compute_bearing(origin, target).degrees();
        prop_assert!((0.0..360.0).contains(&b), "bearing {} for {} -> {}", b, origin, target);
    }

    /// Invariant: the needle angle is in range for any sample, finite or not.
    #[test]
    fn needle_in_range(origin in any_point(), raw in any::<f64>()) {
        let engine = QiblaEngine::new(QiblaConfig::default());
        engine.set_origin(origin);
        let angle = engine.on_heading_sample(raw).degrees();
        prop_assert!((0.0..360.0).contains(&angle), "angle {} for sample {}", angle, raw);
    }

    /// Invariant: bearing minus heading, wrapped, is the needle.
    #[test]
    fn needle_is_bearing_minus_heading(origin in any_point(), heading in 0.0f64..360.0) {
        let engine = QiblaEngine::new(QiblaConfig::default());
        let bearing = engine.set_origin(origin);
        let angle = engine.on_heading_sample(heading);
        prop_assert_eq!(angle, DisplayAngle::between(bearing, HeadingDegrees::new(heading)));
    }

    /// Invariant: headings arriving before a fix behave as if the bearing were 0.
    #[test]
    fn before_fix_uses_zero_bearing(heading in 0.0f64..360.0) {
        let engine = QiblaEngine::new(QiblaConfig::default());
        let angle = engine.on_heading_sample(heading);
        let bearing = BearingDegrees::default();
        prop_assert_eq!(angle, DisplayAngle::between(bearing, HeadingDegrees::new(heading)));
    }

    /// Invariant: same input, same bearing, bit for bit.
    #[test]
    fn bearing_is_deterministic(origin in any_point()) {
        let first = qibla_bearing(origin).degrees().to_bits();
        prop_assert_eq!(first, qibla_bearing(origin).degrees().to_bits());
    }
}
