//! Heading source abstraction.
//!
//! Platforms disagree on what a compass sample is: native devices expose a raw
//! magnetometer vector, browsers a pre-computed orientation angle. Both sit
//! behind [`HeadingSource`], chosen once at startup with
//! [`select_heading_source`]; nothing downstream branches on the platform.
//!
//! ```text
//!  platform callback ──publish──▶ ListenerRegistry ──▶ HeadingSubscription callback
//!                                   (throttle)            │ source.normalize()
//!                                                         ▼
//!                                                QiblaEngine::on_heading
//! ```

mod magnetometer;
mod orientation;
mod registry;

use std::sync::Arc;
use std::time::Duration;

use hidayah_types::{HeadingDegrees, HidayahError};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use magnetometer::MagnetometerSource;
pub use orientation::OrientationSource;
pub use registry::ListenerRegistry;

/// One sample as delivered by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RawHeading {
    /// Planar magnetometer field components.
    Vector { x: f64, y: f64 },
    /// Pre-computed orientation in degrees; `None` when the platform sent no value.
    Angle(Option<f64>),
}

impl RawHeading {
    /// Heading in `[0, 360)`. Missing or non-finite values become 0.
    pub fn to_heading(self) -> HeadingDegrees {
        match self {
            RawHeading::Vector { x, y } => HeadingDegrees::from_vector(x, y),
            RawHeading::Angle(deg) => HeadingDegrees::new(deg.unwrap_or(0.0)),
        }
    }
}

/// Which platform implementation backs a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeadingSourceKind {
    /// Native magnetometer, raw `{x, y}` vectors.
    Magnetometer,
    /// Web `deviceorientation` events, `alpha` angle.
    Orientation,
}

/// Target platform, used to pick a heading source at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Native,
    Web,
}

impl Platform {
    /// Platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_arch = "wasm32") {
            Platform::Web
        } else {
            Platform::Native
        }
    }
}

/// Listener invoked once per delivered sample.
pub type HeadingCallback = Box<dyn FnMut(RawHeading) + Send>;

/// Opaque listener id issued by a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

/// A stream of device orientation samples.
pub trait HeadingSource: Send + Sync {
    fn kind(&self) -> HeadingSourceKind;

    /// Converts a platform sample into a heading in `[0, 360)`.
    fn normalize(&self, sample: &RawHeading) -> HeadingDegrees;

    /// Registers a listener.
    ///
    /// # Errors
    /// `SensorUnavailable` if the device has no compass.
    fn subscribe(&self, callback: HeadingCallback) -> Result<SubscriptionId, HidayahError>;

    /// Releases a listener. Safe to call any number of times.
    fn unsubscribe(&self, id: SubscriptionId);

    /// Minimum spacing between delivered samples.
    fn set_update_interval(&self, interval: Duration);
}

/// Picks the heading source implementation for `platform`.
pub fn select_heading_source(platform: Platform, interval: Duration) -> Arc<dyn HeadingSource> {
    debug!(?platform, ?interval, "selecting heading source");
    match platform {
        Platform::Native => Arc::new(MagnetometerSource::new(interval)),
        Platform::Web => Arc::new(OrientationSource::new(interval)),
    }
}

/// Live listener registration, released on drop.
///
/// The owning screen controller holds this for as long as it is visible.
/// Dropping it (or calling [`unsubscribe`](Self::unsubscribe)) detaches the
/// listener, so the sensor stops feeding a torn-down screen.
pub struct HeadingSubscription {
    source: Arc<dyn HeadingSource>,
    id: Option<SubscriptionId>,
}

impl HeadingSubscription {
    /// Subscribes `callback` to `source`, receiving normalized headings.
    pub fn attach<F>(source: Arc<dyn HeadingSource>, mut callback: F) -> Result<Self, HidayahError>
    where
        F: FnMut(HeadingDegrees) + Send + 'static,
    {
        let normalizer = Arc::clone(&source);
        let id = source.subscribe(Box::new(move |raw: RawHeading| {
            callback(normalizer.normalize(&raw))
        }))?;
        Ok(Self { source, id: Some(id) })
    }

    pub fn id(&self) -> Option<SubscriptionId> {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    pub fn source_kind(&self) -> HeadingSourceKind {
        self.source.kind()
    }

    /// Detaches the listener. Later calls do nothing.
    pub fn unsubscribe(&mut self) {
        if let Some(id) = self.id.take() {
            self.source.unsubscribe(id);
        }
    }
}

impl Drop for HeadingSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for HeadingSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadingSubscription")
            .field("kind", &self.source.kind())
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_raw_heading_missing_angle_is_zero() {
        assert_eq!(RawHeading::Angle(None).to_heading().degrees(), 0.0);
        assert_eq!(RawHeading::Angle(Some(f64::NAN)).to_heading().degrees(), 0.0);
        assert_eq!(RawHeading::Angle(Some(-90.0)).to_heading().degrees(), 270.0);
    }

    #[test]
    fn test_select_by_platform() {
        let native = select_heading_source(Platform::Native, Duration::ZERO);
        let web = select_heading_source(Platform::Web, Duration::ZERO);
        assert_eq!(native.kind(), HeadingSourceKind::Magnetometer);
        assert_eq!(web.kind(), HeadingSourceKind::Orientation);
    }

    #[test]
    fn test_subscription_drop_releases_listener() {
        let source = Arc::new(MagnetometerSource::new(Duration::ZERO));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let sub = HeadingSubscription::attach(source.clone(), move |h| {
            sink.lock().unwrap().push(h.degrees());
        })
        .unwrap();
        assert!(sub.is_active());

        source.publish_reading(0.0, 1.0);
        drop(sub);
        source.publish_reading(1.0, 0.0);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!((seen[0] - 90.0).abs() < 1e-9);
        assert_eq!(source.listener_count(), 0);
    }

    #[test]
    fn test_subscription_unsubscribe_twice() {
        let source = Arc::new(OrientationSource::new(Duration::ZERO));
        let mut sub = HeadingSubscription::attach(source.clone(), |_| {}).unwrap();
        sub.unsubscribe();
        sub.unsubscribe();
        assert!(!sub.is_active());
        assert_eq!(source.publish_event(Some(10.0)), 0);
    }
}
