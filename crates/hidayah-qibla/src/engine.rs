//! Bearing engine: combines the Qibla bearing with the live device heading.

use std::sync::{Mutex, MutexGuard, PoisonError};

use hidayah_types::{BearingDegrees, DisplayAngle, GeoPoint, HeadingDegrees, HidayahError};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, trace};

use crate::bearing::compute_bearing;
use crate::config::QiblaConfig;

/// Lifecycle of an engine. There is no terminal state; the engine lives as
/// long as the screen that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnginePhase {
    /// No location fix yet. Headings are still accepted against a bearing of 0.
    Uninitialized,
    /// A fix resolved and the bearing is known.
    BearingKnown,
}

/// Snapshot pushed to the presentation layer after every update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NeedleReading {
    pub angle: DisplayAngle,
    pub heading: HeadingDegrees,
    pub bearing: Option<BearingDegrees>,
}

impl NeedleReading {
    pub fn bearing_known(&self) -> bool {
        self.bearing.is_some()
    }
}

#[derive(Debug, Default)]
struct EngineState {
    origin: Option<GeoPoint>,
    bearing: Option<BearingDegrees>,
    heading: HeadingDegrees,
    display: DisplayAngle,
}

impl EngineState {
    fn refresh(&mut self) -> NeedleReading {
        self.display = DisplayAngle::between(self.bearing.unwrap_or_default(), self.heading);
        NeedleReading {
            angle: self.display,
            heading: self.heading,
            bearing: self.bearing,
        }
    }
}

/// Maintains the needle angle as headings and location fixes arrive.
///
/// The engine is the single writer of the display angle. Every update takes
/// one lock across read-bearing, compute and write, so a heading sample never
/// pairs with a bearing torn by a concurrent [`set_origin`](Self::set_origin).
/// Share it as `Arc<QiblaEngine>` between the sensor callback and the
/// location task.
///
/// # Example
/// ```rust
/// use hidayah_qibla::{QiblaConfig, QiblaEngine, EnginePhase};
/// use hidayah_types::GeoPoint;
///
/// let engine = QiblaEngine::new(QiblaConfig::default());
/// assert_eq!(engine.phase(), EnginePhase::Uninitialized);
///
/// engine.set_origin(GeoPoint::new(40.7128, -74.0060).unwrap());
/// let angle = engine.on_heading_sample(30.0);
/// assert!((angle.degrees() - 28.48).abs() < 0.05);
/// ```
pub struct QiblaEngine {
    config: QiblaConfig,
    state: Mutex<EngineState>,
    needle_tx: watch::Sender<NeedleReading>,
    visible_tx: watch::Sender<Option<NeedleReading>>,
}

impl QiblaEngine {
    pub fn new(config: QiblaConfig) -> Self {
        let (needle_tx, _) = watch::channel(NeedleReading::default());
        let initial = config.unresolved_bearing.present(NeedleReading::default());
        let (visible_tx, _) = watch::channel(initial);
        Self {
            config,
            state: Mutex::new(EngineState::default()),
            needle_tx,
            visible_tx,
        }
    }

    /// Like [`new`](Self::new), but rejects an invalid configuration.
    pub fn try_new(config: QiblaConfig) -> Result<Self, HidayahError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn config(&self) -> &QiblaConfig {
        &self.config
    }

    pub fn target(&self) -> GeoPoint {
        self.config.target
    }

    pub fn phase(&self) -> EnginePhase {
        if self.lock().bearing.is_some() {
            EnginePhase::BearingKnown
        } else {
            EnginePhase::Uninitialized
        }
    }

    pub fn origin(&self) -> Option<GeoPoint> {
        self.lock().origin
    }

    pub fn bearing(&self) -> Option<BearingDegrees> {
        self.lock().bearing
    }

    pub fn heading(&self) -> HeadingDegrees {
        self.lock().heading
    }

    /// Current needle angle. Uses a bearing of 0 before the first fix.
    pub fn display_angle(&self) -> DisplayAngle {
        self.lock().display
    }

    /// Needle angle as the presentation layer should show it.
    ///
    /// `None` only when no bearing is known and the config says
    /// [`UnresolvedBearing::Suppress`](crate::UnresolvedBearing::Suppress).
    pub fn visible_angle(&self) -> Option<DisplayAngle> {
        self.visible_reading().map(|r| r.angle)
    }

    /// Raw snapshot, always carrying an angle.
    pub fn reading(&self) -> NeedleReading {
        *self.needle_tx.borrow()
    }

    /// Snapshot as the presentation layer should show it; see
    /// [`visible_angle`](Self::visible_angle).
    pub fn visible_reading(&self) -> Option<NeedleReading> {
        *self.visible_tx.borrow()
    }

    /// Receiver notified after every update.
    pub fn watch(&self) -> watch::Receiver<NeedleReading> {
        self.needle_tx.subscribe()
    }

    /// Like [`watch`](Self::watch), with the unresolved-bearing policy applied.
    pub fn watch_visible(&self) -> watch::Receiver<Option<NeedleReading>> {
        self.visible_tx.subscribe()
    }

    fn publish(&self, reading: NeedleReading) {
        self.needle_tx.send_replace(reading);
        self.visible_tx.send_replace(self.config.unresolved_bearing.present(reading));
    }

    /// Applies a location fix: recomputes the bearing to the target and
    /// re-derives the needle against the last known heading.
    pub fn set_origin(&self, origin: GeoPoint) -> BearingDegrees {
        let bearing = compute_bearing(origin, self.config.target);
        let mut state = self.lock();
        let first_fix = state.bearing.is_none();
        state.origin = Some(origin);
        state.bearing = Some(bearing);
        let reading = state.refresh();
        self.publish(reading);
        debug!(%origin, %bearing, first_fix, "qibla bearing computed");
        bearing
    }

    /// Accepts a raw heading in degrees. Out-of-range values are wrapped and
    /// NaN is treated as 0.
    pub fn on_heading_sample(&self, raw: f64) -> DisplayAngle {
        self.on_heading(HeadingDegrees::new(raw))
    }

    /// Accepts an already-normalized heading.
    pub fn on_heading(&self, heading: HeadingDegrees) -> DisplayAngle {
        let mut state = self.lock();
        state.heading = heading;
        let reading = state.refresh();
        self.publish(reading);
        trace!(%heading, angle = %reading.angle, "needle updated");
        reading.angle
    }
}

impl std::fmt::Debug for QiblaEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("QiblaEngine")
            .field("target", &self.config.target)
            .field("bearing", &state.bearing)
            .field("heading", &state.heading)
            .field("display", &state.display)
            .finish()
    }
}
