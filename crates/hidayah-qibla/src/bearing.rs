//! Great-circle bearing toward the Qibla target.

use hidayah_types::{BearingDegrees, GeoPoint, KAABA};

/// Below this, both atan2 arguments are treated as zero.
const COINCIDENT_EPSILON: f64 = 1e-12;

/// Computes the initial great-circle bearing from `origin` to `target`.
///
/// Uses the Qibla form of the bearing equation:
///
/// ```text
/// y = sin(Δλ)
/// x = cos(φ₁)·tan(φ₂) − sin(φ₁)·cos(Δλ)
/// θ = atan2(y, x)
/// ```
///
/// # Edge cases
/// * `origin == target`: both terms vanish and the bearing is undefined. This
///   returns `0.0`. Rounding can leave `x` at ±1e-17, which would otherwise
///   flip the result to 180°.
/// * `origin` at a pole: `cos(±90°)` is still a finite (tiny) value, so the
///   result is defined, just meaningless as a compass direction.
/// * `target` at a pole: `tan(±90°)` is huge but finite; bearing is 0° or 180°.
///
/// # Example
/// ```rust
/// use hidayah_qibla::compute_bearing;
/// use hidayah_types::GeoPoint;
///
/// let origin = GeoPoint::new(0.0, 0.0).unwrap();
/// let east = GeoPoint::new(0.0, 90.0).unwrap();
/// assert!((compute_bearing(origin, east).degrees() - 90.0).abs() < 1e-9);
/// ```
pub fn compute_bearing(origin: GeoPoint, target: GeoPoint) -> BearingDegrees {
    let phi1 = origin.lat_rad();
    let phi2 = target.lat_rad();
    let delta_lambda = target.lng_rad() - origin.lng_rad();

    let y = delta_lambda.sin();
    let x = phi1.cos() * phi2.tan() - phi1.sin() * delta_lambda.cos();

    if y.abs() < COINCIDENT_EPSILON && x.abs() < COINCIDENT_EPSILON {
        return BearingDegrees::default();
    }

    BearingDegrees::new(y.atan2(x).to_degrees())
}

/// Bearing from `origin` to the Kaaba.
pub fn qibla_bearing(origin: GeoPoint) -> BearingDegrees {
    compute_bearing(origin, KAABA)
}
