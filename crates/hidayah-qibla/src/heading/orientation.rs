use std::time::Duration;

use hidayah_types::{HeadingDegrees, HidayahError};

use super::{
    HeadingCallback, HeadingSource, HeadingSourceKind, ListenerRegistry, RawHeading, SubscriptionId,
};

/// Heading from browser `deviceorientation` events.
///
/// Browsers report `alpha` already in degrees, and may report `null` before
/// the sensor settles; that is treated as 0.
#[derive(Debug)]
pub struct OrientationSource {
    registry: ListenerRegistry,
}

impl OrientationSource {
    pub fn new(interval: Duration) -> Self {
        Self { registry: ListenerRegistry::new(interval) }
    }

    pub fn unavailable() -> Self {
        Self { registry: ListenerRegistry::unavailable() }
    }

    /// Feeds one orientation event's `alpha`.
    pub fn publish_event(&self, alpha: Option<f64>) -> usize {
        self.registry.publish(RawHeading::Angle(alpha))
    }

    pub fn listener_count(&self) -> usize {
        self.registry.listener_count()
    }
}

impl HeadingSource for OrientationSource {
    fn kind(&self) -> HeadingSourceKind {
        HeadingSourceKind::Orientation
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
    fn test_null_alpha_is_north() {
        let source = OrientationSource::new(Duration::ZERO);
        assert_eq!(source.normalize(&RawHeading::Angle(None)).degrees(), 0.0);
        assert_eq!(source.normalize(&RawHeading::Angle(Some(725.0))).degrees(), 5.0);
    }
}
