//! Validated route polyline.
//!
//! A [`Polyline`] is the immutable geometry a navigation session runs
//! against. Construction enforces the two-coordinate minimum, so every
//! consumer can index the first and last point without checks.

use serde::{Deserialize, Serialize};

use crate::core::Coordinate;
use crate::core::geo::{distance_to_segment, haversine_distance, path_length};
use crate::error::{MargaError, Result};

/// How the distance between a fix and the route is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviationMetric {
    /// Distance to the nearest polyline coordinate.
    #[default]
    NearestVertex,
    /// Distance to the nearest point on any polyline segment.
    NearestSegment,
}

/// Ordered route geometry with at least two coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    coordinates: Vec<Coordinate>,
    /// Street of the segment starting at each coordinate. Same length as
    /// `coordinates`.
    streets: Vec<Option<String>>,
    total_length: f64,
}

impl Polyline {
    /// Create a polyline from coordinates.
    ///
    /// Fails with [`MargaError::InvalidRoute`] for fewer than 2 coordinates.
    pub fn new(coordinates: Vec<Coordinate>) -> Result<Self> {
        let streets = vec![None; coordinates.len()];
        Self::with_streets(coordinates, streets)
    }

    /// Create a polyline with per-coordinate street names.
    ///
    /// `streets[i]` names the road between coordinate `i` and `i + 1`.
    /// Missing entries are treated as unknown and extra entries ignored.
    pub fn with_streets(
        coordinates: Vec<Coordinate>,
        mut streets: Vec<Option<String>>,
    ) -> Result<Self> {
        if coordinates.len() < 2 {
            return Err(MargaError::InvalidRoute {
                points: coordinates.len(),
            });
        }

        streets.resize(coordinates.len(), None);
        let total_length = path_length(&coordinates);

        Ok(Self {
            coordinates,
            streets,
            total_length,
        })
    }

    /// All coordinates in route order.
    #[inline]
    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    /// Number of coordinates (always at least 2).
    #[inline]
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// First coordinate.
    #[inline]
    pub fn first(&self) -> Coordinate {
        self.coordinates[0]
    }

    /// Last coordinate.
    #[inline]
    pub fn last(&self) -> Coordinate {
        self.coordinates[self.coordinates.len() - 1]
    }

    /// Street name of the segment starting at `index`, if known.
    pub fn street_at(&self, index: usize) -> Option<&str> {
        self.streets.get(index).and_then(|s| s.as_deref())
    }

    /// Total great-circle length in meters.
    #[inline]
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Find the coordinate closest to `position`.
    ///
    /// Returns its index and the distance to it in meters. Linear scan.
    pub fn nearest_vertex(&self, position: &Coordinate) -> (usize, f64) {
        let mut min_dist = f64::INFINITY;
        let mut min_idx = 0;

        for (i, coord) in self.coordinates.iter().enumerate() {
            let dist = haversine_distance(position, coord);
            if dist < min_dist {
                min_dist = dist;
                min_idx = i;
            }
        }

        (min_idx, min_dist)
    }

    /// Distance from `position` to the route, in meters.
    pub fn distance_to_route(&self, position: &Coordinate, metric: DeviationMetric) -> f64 {
        match metric {
            DeviationMetric::NearestVertex => self.nearest_vertex(position).1,
            DeviationMetric::NearestSegment => self
                .coordinates
                .windows(2)
                .map(|w| distance_to_segment(position, &w[0], &w[1]))
                .fold(f64::INFINITY, f64::min),
        }
    }

    /// Remaining route starting at the coordinate nearest to `position`.
    pub fn suffix_from_nearest(&self, position: &Coordinate) -> &[Coordinate] {
        let (index, _) = self.nearest_vertex(position);
        &self.coordinates[index..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pt(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon)
    }

    fn line() -> Polyline {
        Polyline::new(vec![pt(48.0, 16.0), pt(48.0, 16.5), pt(48.0, 17.0)]).unwrap()
    }

    #[test]
    fn test_rejects_short_input() {
        assert!(matches!(
            Polyline::new(vec![]),
            Err(MargaError::InvalidRoute { points: 0 })
        ));
        assert!(matches!(
            Polyline::new(vec![pt(1.0, 1.0)]),
            Err(MargaError::InvalidRoute { points: 1 })
        ));
    }

    #[test]
    fn test_total_length_matches_path_length() {
        let poly = line();
        assert_relative_eq!(poly.total_length(), path_length(poly.coordinates()));
        assert_eq!(poly.first(), pt(48.0, 16.0));
        assert_eq!(poly.last(), pt(48.0, 17.0));
    }

    #[test]
    fn test_nearest_vertex() {
        let (idx, dist) = line().nearest_vertex(&pt(48.0, 16.45));
        assert_eq!(idx, 1);
        assert!(dist > 3_000.0 && dist < 4_000.0, "got {dist:.0} m");
    }

    #[test]
    fn test_segment_metric_is_never_larger() {
        let poly = line();
        let p = pt(48.001, 16.25);
        let vertex = poly.distance_to_route(&p, DeviationMetric::NearestVertex);
        let segment = poly.distance_to_route(&p, DeviationMetric::NearestSegment);

        assert!(segment <= vertex);
        assert!(segment < 200.0, "got {segment:.0} m");
    }

    #[test]
    fn test_suffix_from_nearest() {
        let poly = line();
        let suffix = poly.suffix_from_nearest(&pt(48.01, 16.49));
        assert_eq!(suffix, &poly.coordinates()[1..]);
    }

    #[test]
    fn test_streets_are_padded() {
        let poly = Polyline::with_streets(
            vec![pt(0.0, 0.0), pt(0.0, 0.01), pt(0.01, 0.01)],
            vec![None, Some("Fjellveien".to_string())],
        )
        .unwrap();

        assert_eq!(poly.street_at(0), None);
        assert_eq!(poly.street_at(1), Some("Fjellveien"));
        assert_eq!(poly.street_at(2), None);
        assert_eq!(poly.street_at(10), None);
    }
}
