//! Great-circle geometry on WGS-84 coordinates.
//!
//! Distances use the haversine formula on a spherical Earth of mean radius,
//! bearings are initial great-circle bearings in degrees clockwise from
//! true north.
//!
//! Degenerate input (identical coordinates) is well defined: the distance
//! is 0 and the bearing is 0°.

use super::types::Coordinate;

/// Earth radius in meters (WGS-84 mean).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Haversine distance between two coordinates in meters.
///
/// # Example
/// ```
/// use marga::core::{Coordinate, geo::haversine_distance};
///
/// let vienna = Coordinate::new(48.2082, 16.3738);
/// let bratislava = Coordinate::new(48.1486, 17.1077);
/// let d = haversine_distance(&vienna, &bratislava);
/// assert!(d > 50_000.0 && d < 60_000.0);
/// ```
pub fn haversine_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Initial great-circle bearing from `a` to `b`, in degrees [0, 360).
///
/// Returns 0° when the two coordinates coincide.
pub fn initial_bearing(a: &Coordinate, b: &Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }

    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    if y == 0.0 && x == 0.0 {
        return 0.0;
    }

    normalize_bearing(y.atan2(x).to_degrees())
}

/// Normalize a bearing to [0, 360).
#[inline]
pub fn normalize_bearing(degrees: f64) -> f64 {
    let b = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative input
    if b >= 360.0 { 0.0 } else { b }
}

/// Signed change of heading from `from_bearing` to `to_bearing`.
///
/// Result lies in (-180, 180]. Positive is a clockwise (right) turn.
///
/// # Example
/// ```
/// use marga::core::geo::relative_angle;
///
/// assert_eq!(relative_angle(350.0, 10.0), 20.0);
/// assert_eq!(relative_angle(10.0, 350.0), -20.0);
/// assert_eq!(relative_angle(0.0, 180.0), 180.0);
/// ```
#[inline]
pub fn relative_angle(from_bearing: f64, to_bearing: f64) -> f64 {
    let a = (to_bearing - from_bearing).rem_euclid(360.0);
    if a > 180.0 { a - 360.0 } else { a }
}

/// Coordinate reached by travelling `distance_m` from `from` along the
/// great circle with initial bearing `bearing_deg`.
pub fn destination(from: &Coordinate, bearing_deg: f64, distance_m: f64) -> Coordinate {
    let delta = distance_m / EARTH_RADIUS_M;
    let theta = bearing_deg.to_radians();
    let lat1 = from.lat.to_radians();
    let lon1 = from.lon.to_radians();

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    let lon_deg = (lon2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;
    Coordinate::new(lat2.to_degrees(), lon_deg)
}

/// Total length of a coordinate sequence in meters.
pub fn path_length(points: &[Coordinate]) -> f64 {
    points
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}

/// Project `p` onto the segment `a`-`b`.
///
/// Uses a planar approximation scaled by the cosine of the mean latitude,
/// accurate for segments up to a few kilometers.
pub fn project_on_segment(p: &Coordinate, a: &Coordinate, b: &Coordinate) -> Coordinate {
    let cos_lat = ((a.lat + b.lat) / 2.0).to_radians().cos();

    let dx = (b.lon - a.lon) * cos_lat;
    let dy = b.lat - a.lat;
    let px = (p.lon - a.lon) * cos_lat;
    let py = p.lat - a.lat;

    let seg_len_sq = dx * dx + dy * dy;
    if seg_len_sq < 1e-20 {
        return *a;
    }

    let t = ((px * dx + py * dy) / seg_len_sq).clamp(0.0, 1.0);

    Coordinate::new(a.lat + t * (b.lat - a.lat), a.lon + t * (b.lon - a.lon))
}

/// Distance in meters from `p` to the closest point of segment `a`-`b`.
#[inline]
pub fn distance_to_segment(p: &Coordinate, a: &Coordinate, b: &Coordinate) -> f64 {
    haversine_distance(p, &project_on_segment(p, a, b))
}
