use std::time::Duration;

use hidayah_types::{HeadingDegrees, HidayahError};

use super::{
    HeadingCallback, HeadingSource, HeadingSourceKind, ListenerRegistry, RawHeading, SubscriptionId,
};

/// Heading from a native magnetometer.
///
/// The platform sensor callback forwards each `{x, y}` reading through
/// [`publish_reading`](Self::publish_reading); heading is `atan2(y, x)`.
#[derive(Debug)]
pub struct MagnetometerSource {
    registry: ListenerRegistry,
}

impl MagnetometerSource {
    pub fn new(interval: Duration) -> Self {
        Self { registry: ListenerRegistry::new(interval) }
    }

    /// A device without magnetometer hardware.
    pub fn unavailable() -> Self {
        Self { registry: ListenerRegistry::unavailable() }
    }

    /// Feeds one sensor reading. Returns the number of listeners reached.
    pub fn publish_reading(&self, x: f64, y: f64) -> usize {
        self.registry.publish(RawHeading::Vector { x, y })
    }

    pub fn registry(&self) -> &ListenerRegistry {
        &self.registry
    }

    pub fn listener_count(&self) -> usize {
        self.registry.listener_count()
    }
}

impl HeadingSource for MagnetometerSource {
    fn kind(&self) -> HeadingSourceKind {
        HeadingSourceKind::Magnetometer
    }

    fn normalize(&self, sample: &RawHeading) -> HeadingDegrees {
        sample.to_heading()
    }

    fn subscribe(&self, callback: HeadingCallback) -> Result<SubscriptionId, HidayahError> {
        self.registry.subscribe(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.registry.unsubscribe(id);
    }

    fn set_update_interval(&self, interval: Duration) {
        self.registry.set_interval(interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_vector() {
        let source = MagnetometerSource::new(Duration::ZERO);
        let h = source.normalize(&RawHeading::Vector { x: -1.0, y: 0.0 });
        assert!((h.degrees() - 180.0).abs() < 1e-9);

        let nan = source.normalize(&RawHeading::Vector { x: f64::NAN, y: f64::NAN });
        assert_eq!(nan.degrees(), 0.0);
    }

    #[test]
    fn test_update_interval_applies() {
        let source = MagnetometerSource::new(Duration::from_millis(400));
        source.set_update_interval(Duration::from_millis(100));
        assert_eq!(source.registry().interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_unavailable_hardware() {
        let source = MagnetometerSource::unavailable();
        assert!(source.subscribe(Box::new(|_: RawHeading| {})).is_err());
        assert_eq!(source.publish_reading(1.0, 1.0), 0);
    }
}
