//! Geographic coordinate type and the haversine distance kernel.
//!
//! `GeoPoint` uses `f64` latitude/longitude. Unlike a city-scale simulation,
//! queries here span the whole globe (maritime lanes, intercontinental rail)
//! and are checked against multi-thousand-kilometre tolerances, so the
//! precision `f32` buys in exchange for half the memory is not worth the
//! extra rounding error here.

use crate::units::Unit;
use crate::CoreError;

/// Earth mean radius, kilometres (IUGG mean radius).
const EARTH_RADIUS_KM: f64 = 6371.0088;

/// A geographic coordinate: latitude and longitude in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Checks the coordinate lies within valid WGS-84 bounds:
    /// `-90 <= lat <= 90`, `-180 <= lon <= 180`.
    pub fn validate(self) -> Result<(), CoreError> {
        if !(-90.0..=90.0).contains(&self.lat) || !self.lat.is_finite() {
            return Err(CoreError::InvalidCoordinate {
                lat: self.lat,
                lon: self.lon,
                reason: "latitude out of [-90, 90]",
            });
        }
        if !(-180.0..=180.0).contains(&self.lon) || !self.lon.is_finite() {
            return Err(CoreError::InvalidCoordinate {
                lat: self.lat,
                lon: self.lon,
                reason: "longitude out of [-180, 180]",
            });
        }
        Ok(())
    }

    /// Great-circle distance to `other`, in `unit`.
    ///
    /// Monotone in angular separation; returns exactly `0.0` for identical
    /// (or antipodally-coincident-after-wrap) points. Never panics, never
    /// returns NaN for finite, in-range inputs.
    pub fn distance(self, other: GeoPoint, unit: Unit) -> f64 {
        unit.convert_from_km(haversine_km(self, other))
    }

    /// Longitude delta from `self` to `other`, wrapped to the shorter way
    /// around the antimeridian: always in `(-180, 180]`.
    ///
    /// A magnitude greater than 180 before wrapping means the "natural"
    /// delta crosses the dateline; this returns the equivalent short delta.
    pub fn wrapped_lon_delta(self, other: GeoPoint) -> f64 {
        let raw = other.lon - self.lon;
        if raw > 180.0 {
            raw - 360.0
        } else if raw <= -180.0 {
            raw + 360.0
        } else {
            raw
        }
    }

    /// `true` if the straight line from `self` to `other` is shorter going
    /// through the antimeridian than going the "printed" way.
    pub fn crosses_antimeridian(self, other: GeoPoint) -> bool {
        (other.lon - self.lon).abs() > 180.0
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Haversine great-circle distance between `a` and `b`, in kilometres.
///
/// Wrap-aware: a pair of points that straddle the antimeridian still get the
/// true (short) angular separation, because the underlying trigonometric
/// identity is periodic in longitude — no explicit wrapping is needed here,
/// only when producing a coordinate *path* for display (see the `line`
/// module in `georoute-graph`).
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let sin_lat = (d_lat * 0.5).sin();
    let sin_lon = (d_lon * 0.5).sin();

    let h = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lon * sin_lon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).max(0.0).sqrt());
    EARTH_RADIUS_KM * c
}

/// Haversine distance in the requested unit. Thin wrapper kept free-standing
/// (not just `GeoPoint::distance`) because it is the one building block the
/// rest of the workspace (heuristics, endpoint snapping, line splitting)
/// reaches for without needing to think in terms of a method receiver.
pub fn haversine(a: GeoPoint, b: GeoPoint, unit: Unit) -> f64 {
    unit.convert_from_km(haversine_km(a, b))
}
