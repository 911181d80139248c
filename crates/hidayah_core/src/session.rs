//! Qibla screen controller.
//!
//! A [`QiblaSession`] owns everything the compass screen needs while it is
//! visible: the engine, the heading subscription and the one-shot location
//! task. Dropping the session tears all of it down.

use std::sync::Arc;

use hidayah_qibla::{
    HeadingSource, HeadingSourceKind, HeadingSubscription, NeedleReading, QiblaConfig, QiblaEngine,
};
use hidayah_types::{GeoPoint, HidayahError, LocationError, LocationProvider, locate};
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Progress of the location fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LocationStatus {
    Pending,
    Resolved(GeoPoint),
    /// The user refused location access. The needle keeps a bearing of 0.
    Denied,
    Unavailable(String),
}

impl LocationStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, LocationStatus::Pending)
    }
}

impl From<Result<GeoPoint, LocationError>> for LocationStatus {
    fn from(result: Result<GeoPoint, LocationError>) -> Self {
        match result {
            Ok(point) => LocationStatus::Resolved(point),
            Err(LocationError::PermissionDenied) => LocationStatus::Denied,
            Err(LocationError::PositionUnavailable(reason)) => LocationStatus::Unavailable(reason),
        }
    }
}

/// Whether headings are flowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorStatus {
    Active(HeadingSourceKind),
    /// The device has no usable compass; the needle stays where it is.
    Unavailable,
    Stopped,
}

/// Live compass screen.
///
/// Headings feed the engine from the moment the session starts. The location
/// fix runs on the tokio runtime and may land at any time; until it does the
/// needle uses a bearing of 0.
///
/// # Example
/// ```rust,no_run
/// use std::sync::Arc;
/// use hidayah_core::{QiblaSession, QiblaConfig, MagnetometerSource};
/// # use hidayah_types::{GeoPoint, LocationError, LocationProvider, PermissionStatus};
/// # struct Gps;
/// # impl LocationProvider for Gps {
/// #     async fn request_permission(&self) -> PermissionStatus { PermissionStatus::Granted }
/// #     async fn current_position(&self) -> Result<GeoPoint, LocationError> {
/// #         Ok(GeoPoint::new(51.5, -0.12).unwrap())
/// #     }
/// # }
///
/// # #[tokio::main] async fn main() -> Result<(), hidayah_types::HidayahError> {
/// let compass = Arc::new(MagnetometerSource::new(QiblaConfig::default().interval()));
/// let session = QiblaSession::start(QiblaConfig::default(), compass.clone(), Gps)?;
/// compass.publish_reading(0.0, 1.0);
/// if let Some(needle) = session.needle() {
///     println!("needle at {}", needle.angle);
/// }
/// # Ok(()) }
/// ```
pub struct QiblaSession {
    engine: Arc<QiblaEngine>,
    subscription: Option<HeadingSubscription>,
    sensor: SensorStatus,
    location_rx: watch::Receiver<LocationStatus>,
    locate_task: Option<JoinHandle<()>>,
}

impl QiblaSession {
    /// Starts sampling `source` and requests a location fix from `locator`.
    ///
    /// A missing compass is not an error; it shows up as
    /// [`SensorStatus::Unavailable`].
    ///
    /// # Errors
    /// `InvalidConfiguration` for a bad config, or when called outside a
    /// tokio runtime.
    pub fn start<L>(
        config: QiblaConfig,
        source: Arc<dyn HeadingSource>,
        locator: L,
    ) -> Result<Self, HidayahError>
    where
        L: LocationProvider + 'static,
    {
        let runtime = Handle::try_current().map_err(|e| {
            HidayahError::invalid_config(format!("QiblaSession needs a tokio runtime: {}", e))
        })?;
        let engine = Arc::new(QiblaEngine::try_new(config)?);

        source.set_update_interval(engine.config().interval());
        let sink = Arc::clone(&engine);
        let (subscription, sensor) = match HeadingSubscription::attach(source, move |heading| {
            sink.on_heading(heading);
        }) {
            Ok(sub) => {
                let kind = sub.source_kind();
                (Some(sub), SensorStatus::Active(kind))
            }
            Err(e) => {
                warn!(error = %e, "compass unavailable, needle will not follow the device");
                (None, SensorStatus::Unavailable)
            }
        };

        let (location_tx, location_rx) = watch::channel(LocationStatus::Pending);
        let fix_engine = Arc::clone(&engine);
        let locate_task = runtime.spawn(async move {
            let result = locate(&locator).await;
            if let Ok(origin) = result {
                fix_engine.set_origin(origin);
            }
            let status = LocationStatus::from(result);
            match &status {
                LocationStatus::Resolved(origin) => debug!(%origin, "location fix resolved"),
                other => warn!(status = ?other, "no location fix, bearing stays at 0"),
            }
            location_tx.send_replace(status);
        });

        info!(?sensor, target = %engine.target(), "qibla session started");
        Ok(Self {
            engine,
            subscription,
            sensor,
            location_rx,
            locate_task: Some(locate_task),
        })
    }

    pub fn engine(&self) -> &Arc<QiblaEngine> {
        &self.engine
    }

    /// What the needle should show. `None` while the bearing is unknown
    /// and the config asks for
    /// [`UnresolvedBearing::Suppress`](hidayah_qibla::UnresolvedBearing::Suppress).
    pub fn needle(&self) -> Option<NeedleReading> {
        self.engine.visible_reading()
    }

    /// Receiver for [`needle`](Self::needle) updates.
    pub fn watch_needle(&self) -> watch::Receiver<Option<NeedleReading>> {
        self.engine.watch_visible()
    }

    pub fn sensor(&self) -> SensorStatus {
        self.sensor
    }

    pub fn location(&self) -> LocationStatus {
        self.location_rx.borrow().clone()
    }

    pub fn watch_location(&self) -> watch::Receiver<LocationStatus> {
        self.location_rx.clone()
    }

    /// Waits for the location task to finish and returns its outcome.
    pub async fn wait_for_fix(&self) -> LocationStatus {
        let mut rx = self.location_rx.clone();
        match rx.wait_for(|s| !s.is_pending()).await {
            Ok(status) => status.clone(),
            // Sender gone before resolving: the task was aborted.
            Err(_) => self.location(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.sensor != SensorStatus::Stopped
    }

    /// Detaches the compass and abandons a pending location fix. Safe to
    /// call more than once.
    pub fn stop(&mut self) {
        if let Some(task) = self.locate_task.take() {
            task.abort();
        }
        if let Some(mut sub) = self.subscription.take() {
            sub.unsubscribe();
        }
        if self.sensor != SensorStatus::Stopped {
            self.sensor = SensorStatus::Stopped;
            info!("qibla session stopped");
        }
    }
}

impl Drop for QiblaSession {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for QiblaSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QiblaSession")
            .field("engine", &self.engine)
            .field("sensor", &self.sensor)
            .field("location", &*self.location_rx.borrow())
            .finish()
    }
}
