//! Turns a solved node path's coordinates into a renderable line, handling
//! the antimeridian the way a caller actually needs it handled: either as
//! one continuous (longitude-unwrapped) sequence, or split into separate
//! segments at each ±180 crossing.

use georoute_core::GeoPoint;

/// How a caller wants a coordinate path that crosses the antimeridian
/// represented.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum AntimeridianStrategy {
    /// Unwrap longitudes so the sequence never jumps by more than 180
    /// degrees between consecutive points — coordinates may fall outside
    /// `[-180, 180]`, but the line is contiguous and plots without a seam.
    #[default]
    Interpolate,
    /// Cut the path into separate segments at each crossing, each one
    /// terminating/starting exactly at the dateline.
    Split,
}

/// A path's coordinates, shaped according to the requested
/// [`AntimeridianStrategy`].
#[derive(Clone, Debug, PartialEq)]
pub enum CoordinatePath {
    Single(Vec<GeoPoint>),
    Split(Vec<Vec<GeoPoint>>),
}

/// Builds a [`CoordinatePath`] from the raw coordinates of a solved path, in
/// order, applying `strategy` at any antimeridian crossing.
pub fn build_coordinate_path(points: &[GeoPoint], strategy: AntimeridianStrategy) -> CoordinatePath {
    match strategy {
        AntimeridianStrategy::Interpolate => CoordinatePath::Single(interpolate_antimeridian(points)),
        AntimeridianStrategy::Split => CoordinatePath::Split(split_antimeridian(points)),
    }
}

/// Unwraps longitudes so that no consecutive pair differs by more than 180
/// degrees, accumulating a running ±360 offset at each crossing.
pub fn interpolate_antimeridian(points: &[GeoPoint]) -> Vec<GeoPoint> {
    let mut out = Vec::with_capacity(points.len());
    let Some(&first) = points.first() else { return out };
    out.push(first);

    let mut prev_raw_lon = first.lon;
    let mut offset = 0.0;
    for p in &points[1..] {
        let delta = p.lon - prev_raw_lon;
        if delta > 180.0 {
            offset -= 360.0;
        } else if delta < -180.0 {
            offset += 360.0;
        }
        prev_raw_lon = p.lon;
        out.push(GeoPoint::new(p.lat, p.lon + offset));
    }
    out
}

/// Splits `points` into segments, cutting at each antimeridian crossing and
/// inserting the interpolated crossing point (latitude interpolated
/// linearly, longitude pinned to ±180) at the end of one segment and the
/// start of the next.
pub fn split_antimeridian(points: &[GeoPoint]) -> Vec<Vec<GeoPoint>> {
    let mut segments = Vec::new();
    let Some(&first) = points.first() else { return segments };

    let mut current = vec![first];
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a.crosses_antimeridian(b) {
            let crossing_lat = antimeridian_crossing_latitude(a, b);
            let a_side = if a.lon >= 0.0 { 180.0 } else { -180.0 };
            current.push(GeoPoint::new(crossing_lat, a_side));
            segments.push(std::mem::take(&mut current));
            current.push(GeoPoint::new(crossing_lat, -a_side));
        }
        current.push(b);
    }
    segments.push(current);
    segments
}

/// Latitude at which the great-circle chord from `a` to `b` crosses the
/// antimeridian, via linear interpolation in a longitude space shifted so
/// the dateline sits at a normal meridian value instead of a discontinuity.
fn antimeridian_crossing_latitude(a: GeoPoint, b: GeoPoint) -> f64 {
    let shift = |lon: f64| if lon < 0.0 { lon + 360.0 } else { lon };
    let (a_lon, b_lon) = (shift(a.lon), shift(b.lon));
    let t = (180.0 - a_lon) / (b_lon - a_lon);
    a.lat + t * (b.lat - a.lat)
}
