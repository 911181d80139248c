use std::sync::Arc;
use std::time::Duration;

use hidayah::{
    EnginePhase, GeoPoint, KAABA, LocationError, LocationProvider, LocationStatus,
    MagnetometerSource, OrientationSource, PermissionStatus, Platform, QiblaConfig, QiblaEngine,
    QiblaSession, UnresolvedBearing, qibla_bearing, select_heading_source,
};

struct Gps(GeoPoint);

impl LocationProvider for Gps {
    async fn request_permission(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    async fn current_position(&self) -> Result<GeoPoint, LocationError> {
        Ok(self.0)
    }
}

#[test]
fn test_reference_bearings() {
    let cases = [
        ((40.7128, -74.0060), 58.48),  // New York
        ((51.5074, -0.1278), 118.99),  // London
        ((-6.2088, 106.8456), 295.15), // Jakarta
    ];
    for ((lat, lng), expected) in cases {
        let b = qibla_bearing(GeoPoint::new(lat, lng).unwrap()).degrees();
        assert!((b - expected).abs() < 0.05, "({}, {}) gave {}", lat, lng, b);
    }
}

#[test]
fn test_standing_on_the_kaaba() {
    assert_eq!(qibla_bearing(KAABA).degrees(), 0.0);
}

#[test]
fn test_suppress_policy_hides_needle_until_fix() {
    let config = QiblaConfig::default().unresolved_bearing(UnresolvedBearing::Suppress);
    let engine = QiblaEngine::new(config);
    engine.on_heading_sample(45.0);
    assert_eq!(engine.visible_angle(), None);

    engine.set_origin(GeoPoint::new(51.5074, -0.1278).unwrap());
    let shown = engine.visible_angle().unwrap().degrees();
    assert!((shown - 73.99).abs() < 0.05);
}

#[tokio::test]
async fn test_session_over_orientation_events() {
    let source = Arc::new(OrientationSource::new(Duration::ZERO));
    let session = QiblaSession::start(
        QiblaConfig::default(),
        source.clone(),
        Gps(GeoPoint::new(-6.2088, 106.8456).unwrap()),
    )
    .unwrap();

    let mut needle = session.watch_needle();
    assert!(matches!(session.wait_for_fix().await, LocationStatus::Resolved(_)));
    assert_eq!(session.engine().phase(), EnginePhase::BearingKnown);

    // Browser reports null alpha before the sensor settles.
    source.publish_event(None);
    needle.changed().await.unwrap();
    let shown = needle.borrow().expect("needle shown");
    assert!((shown.angle.degrees() - 295.15).abs() < 0.05);
}

#[tokio::test]
async fn test_platform_selection_feeds_session() {
    let source = select_heading_source(Platform::Native, Duration::ZERO);
    let session = QiblaSession::start(QiblaConfig::default(), source, Gps(KAABA)).unwrap();
    assert!(session.is_running());
    assert!(matches!(session.wait_for_fix().await, LocationStatus::Resolved(p) if p == KAABA));
    let bearing = session.needle().and_then(|n| n.bearing);
    assert_eq!(bearing.map(|b| b.degrees()), Some(0.0));
}

#[tokio::test]
async fn test_session_without_compass_hardware() {
    let session = QiblaSession::start(
        QiblaConfig::default(),
        Arc::new(MagnetometerSource::unavailable()),
        Gps(GeoPoint::new(40.7128, -74.0060).unwrap()),
    )
    .unwrap();
    assert_eq!(session.sensor(), hidayah::SensorStatus::Unavailable);
}
