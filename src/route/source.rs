//! Route input as delivered by the route data source.
//!
//! Routes arrive scraped, user-drawn, or from an external routing
//! provider. Marga only reads them.

use serde::{Deserialize, Serialize};

use crate::core::Coordinate;
use crate::error::Result;

use super::Polyline;

/// A named endpoint of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedPoint {
    pub name: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
}

/// One coordinate of the route geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub lat: f64,
    pub lon: f64,
    /// Road of the segment starting at this point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
}

impl RoutePoint {
    #[inline]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

impl From<Coordinate> for RoutePoint {
    fn from(c: Coordinate) -> Self {
        Self {
            lat: c.lat,
            lon: c.lon,
            street: None,
        }
    }
}

/// A route to ride.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub name: String,
    pub start: NamedPoint,
    pub end: NamedPoint,
    pub points: Vec<RoutePoint>,
}

impl Route {
    /// Build the validated polyline for this route.
    ///
    /// Fails with [`crate::MargaError::InvalidRoute`] for fewer than 2 points.
    pub fn polyline(&self) -> Result<Polyline> {
        let coordinates = self.points.iter().map(RoutePoint::coordinate).collect();
        let streets = self.points.iter().map(|p| p.street.clone()).collect();
        Polyline::with_streets(coordinates, streets)
    }
}
