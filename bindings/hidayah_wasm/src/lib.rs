//! WASM bindings for Hidayah - Qibla compass engine
//!
//! The page owns the `deviceorientation` listener and forwards each event's
//! `alpha` into a [`QiblaCompass`]; the geolocation callback forwards the fix.

use hidayah_core::{
    DisplayAngle, GeoPoint, HeadingDegrees, NeedleReading, QiblaConfig, QiblaEngine, RawHeading,
    UnresolvedBearing,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Qibla bearing in degrees from `(lat, lng)`.
///
/// # Example (JavaScript)
/// ```js
/// qiblaBearing(40.7128, -74.0060); // ≈ 58.48
/// ```
#[wasm_bindgen(js_name = qiblaBearing)]
pub fn qibla_bearing(lat: f64, lng: f64) -> Result<f64, JsValue> {
    let origin = GeoPoint::new(lat, lng).map_err(js_err)?;
    Ok(hidayah_core::qibla_bearing(origin).degrees())
}

/// Class-based compass state for one page.
///
/// # Example (JavaScript)
/// ```js
/// const compass = new QiblaCompass();
/// navigator.geolocation.getCurrentPosition(p =>
///   compass.setLocation(p.coords.latitude, p.coords.longitude));
/// window.addEventListener("deviceorientation", e => {
///   needle.style.transform = `rotate(${compass.onOrientation(e.alpha)}deg)`;
/// });
/// ```
#[wasm_bindgen]
pub struct QiblaCompass {
    engine: QiblaEngine,
}

#[wasm_bindgen]
impl QiblaCompass {
    /// `hideUntilFix` makes [`visibleAngle`](Self::visible_angle) return
    /// `undefined` until a location is known.
    #[wasm_bindgen(constructor)]
    pub fn new(hide_until_fix: Option<bool>) -> QiblaCompass {
        console_error_panic_hook::set_once();
        let policy = if hide_until_fix.unwrap_or(false) {
            UnresolvedBearing::Suppress
        } else {
            UnresolvedBearing::default()
        };
        let config = QiblaConfig::default().unresolved_bearing(policy);
        QiblaCompass { engine: QiblaEngine::new(config) }
    }

    /// Applies a location fix and returns the new bearing.
    #[wasm_bindgen(js_name = setLocation)]
    pub fn set_location(&self, lat: f64, lng: f64) -> Result<f64, JsValue> {
        let origin = GeoPoint::new(lat, lng).map_err(js_err)?;
        Ok(self.engine.set_origin(origin).degrees())
    }

    /// Feeds a `deviceorientation` alpha (may be `null`). Returns the needle angle.
    #[wasm_bindgen(js_name = onOrientation)]
    pub fn on_orientation(&self, alpha: Option<f64>) -> f64 {
        self.feed(RawHeading::Angle(alpha)).degrees()
    }

    /// Feeds a magnetometer `{x, y}` reading. Returns the needle angle.
    #[wasm_bindgen(js_name = onMagnetometer)]
    pub fn on_magnetometer(&self, x: f64, y: f64) -> f64 {
        self.feed(RawHeading::Vector { x, y }).degrees()
    }

    #[wasm_bindgen(js_name = needleAngle)]
    pub fn needle_angle(&self) -> f64 {
        self.engine.display_angle().degrees()
    }

    #[wasm_bindgen(js_name = visibleAngle)]
    pub fn visible_angle(&self) -> Option<f64> {
        self.engine.visible_angle().map(DisplayAngle::degrees)
    }

    #[wasm_bindgen(js_name = isBearingKnown)]
    pub fn is_bearing_known(&self) -> bool {
        self.engine.bearing().is_some()
    }

    /// Full snapshot as a plain object.
    pub fn reading(&self) -> WasmNeedleReading {
        WasmNeedleReading::from(self.engine.reading())
    }

    /// Snapshot honoring `hideUntilFix`: `undefined` while the needle is hidden.
    #[wasm_bindgen(js_name = visibleReading)]
    pub fn visible_reading(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.visible_snapshot()).map_err(js_err)
    }

    fn visible_snapshot(&self) -> Option<WasmNeedleReading> {
        self.engine.visible_reading().map(WasmNeedleReading::from)
    }

    fn feed(&self, raw: RawHeading) -> DisplayAngle {
        let heading: HeadingDegrees = raw.to_heading();
        self.engine.on_heading(heading)
    }
}

impl Default for QiblaCompass {
    fn default() -> Self {
        Self::new(None)
    }
}

/// WASM-friendly representation of NeedleReading for TypeScript generation.
#[derive(Serialize, tsify::Tsify)]
#[tsify(into_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct WasmNeedleReading {
    pub angle: f64,
    pub heading: f64,
    pub bearing: Option<f64>,
}

impl From<NeedleReading> for WasmNeedleReading {
    fn from(reading: NeedleReading) -> Self {
        Self {
            angle: reading.angle.degrees(),
            heading: reading.heading.degrees(),
            bearing: reading.bearing.map(|b| b.degrees()),
        }
    }
}
