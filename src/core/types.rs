//! Core value types: geographic coordinates and timestamped samples.

use serde::{Deserialize, Serialize};

/// A WGS-84 position in degrees. No altitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lon: f64,
}

impl Coordinate {
    /// Create a new coordinate.
    #[inline]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to another coordinate in meters.
    #[inline]
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        super::geo::haversine_distance(self, other)
    }

    /// Initial bearing toward another coordinate, degrees in [0, 360).
    #[inline]
    pub fn bearing_to(&self, other: &Coordinate) -> f64 {
        super::geo::initial_bearing(self, other)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}

/// Generic timestamp wrapper for any data type.
///
/// Timestamps are in microseconds. Only differences between timestamps
/// are used, so the epoch is up to the producer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timestamped<T> {
    /// The wrapped data
    pub data: T,
    /// Timestamp in microseconds
    pub timestamp_us: u64,
}

impl<T> Timestamped<T> {
    /// Create a new timestamped value.
    #[inline]
    pub fn new(data: T, timestamp_us: u64) -> Self {
        Self { data, timestamp_us }
    }

    /// Map the inner data while preserving timestamp.
    #[inline]
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Timestamped<U> {
        Timestamped {
            data: f(self.data),
            timestamp_us: self.timestamp_us,
        }
    }
}

/// A live position fix from the location provider.
pub type PositionFix = Timestamped<Coordinate>;

/// Convert seconds to the microsecond timestamp unit.
#[inline]
pub fn secs_to_us(secs: f64) -> u64 {
    (secs.max(0.0) * 1_000_000.0).round() as u64
}
