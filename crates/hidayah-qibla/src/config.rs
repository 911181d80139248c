use hidayah_types::{GeoPoint, HidayahError, KAABA};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::engine::NeedleReading;

/// Default heading sample interval, in milliseconds.
pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 400;
/// Fastest accepted sample interval (~60 Hz).
pub const MIN_SAMPLE_INTERVAL_MS: u64 = 16;
/// Slowest accepted sample interval.
pub const MAX_SAMPLE_INTERVAL_MS: u64 = 5_000;

/// What the needle shows before the first location fix resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnresolvedBearing {
    /// Use a bearing of 0°, so the needle tracks north until the fix arrives.
    #[default]
    ShowDefault,
    /// Report no angle at all until a bearing is known.
    Suppress,
}

impl UnresolvedBearing {
    /// Applies the policy to a snapshot: `None` hides a needle that has no
    /// bearing yet.
    pub fn present(self, reading: NeedleReading) -> Option<NeedleReading> {
        match (self, reading.bearing) {
            (UnresolvedBearing::Suppress, None) => None,
            _ => Some(reading),
        }
    }
}

/// Qibla engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QiblaConfig {
    /// Point the needle aims at. The Kaaba unless overridden.
    pub target: GeoPoint,
    /// Minimum spacing between delivered heading samples. Clamped to [16, 5000].
    pub sample_interval_ms: u64,
    pub unresolved_bearing: UnresolvedBearing,
}

impl Default for QiblaConfig {
    fn default() -> Self {
        Self {
            target: KAABA,
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            unresolved_bearing: UnresolvedBearing::default(),
        }
    }
}

impl QiblaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(mut self, target: GeoPoint) -> Self {
        self.target = target;
        self
    }

    pub fn sample_interval(mut self, interval: Duration) -> Self {
        let ms = u64::try_from(interval.as_millis()).unwrap_or(MAX_SAMPLE_INTERVAL_MS);
        self.sample_interval_ms = ms.clamp(MIN_SAMPLE_INTERVAL_MS, MAX_SAMPLE_INTERVAL_MS);
        self
    }

    pub fn unresolved_bearing(mut self, policy: UnresolvedBearing) -> Self {
        self.unresolved_bearing = policy;
        self
    }

    /// Sample interval as a `Duration`.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    /// Checks values that bypassed the builder (e.g. deserialized ones).
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` for an invalid target or an interval out of range.
    pub fn validate(&self) -> Result<(), HidayahError> {
        GeoPoint::new(self.target.lat, self.target.lng)
            .map_err(|e| HidayahError::invalid_config(format!("target: {}", e)))?;

        if !(MIN_SAMPLE_INTERVAL_MS..=MAX_SAMPLE_INTERVAL_MS).contains(&self.sample_interval_ms) {
            return Err(HidayahError::invalid_config(format!(
                "sample_interval_ms {} outside {}..={}",
                self.sample_interval_ms, MIN_SAMPLE_INTERVAL_MS, MAX_SAMPLE_INTERVAL_MS
            )));
        }
        Ok(())
    }
}
