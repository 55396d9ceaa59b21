//! Synthetic rides along a route.
//!
//! Generates position fixes at a constant speed and sampling interval,
//! for replaying a route that has no recording and for tests.

use crate::core::geo::{destination, haversine_distance, initial_bearing};
use crate::core::{Coordinate, PositionFix, Timestamped, secs_to_us};

/// Iterator of fixes riding a coordinate sequence at constant speed.
///
/// The last fix is always the final coordinate.
pub struct RideSimulator {
    coordinates: Vec<Coordinate>,
    /// Cumulative distance at each coordinate
    cumulative: Vec<f64>,
    step_m: f64,
    interval_us: u64,
    start_us: u64,
    /// Lateral offset to the right of travel (meters)
    offset_m: f64,
    sample: u64,
    segment: usize,
    finished: bool,
}

impl RideSimulator {
    /// Ride `coordinates` at `speed_mps`, one fix every `interval_secs`.
    pub fn new(coordinates: &[Coordinate], speed_mps: f64, interval_secs: f64) -> Self {
        let mut cumulative = Vec::with_capacity(coordinates.len());
        let mut total = 0.0;
        for (i, c) in coordinates.iter().enumerate() {
            if i > 0 {
                total += haversine_distance(&coordinates[i - 1], c);
            }
            cumulative.push(total);
        }

        Self {
            coordinates: coordinates.to_vec(),
            cumulative,
            step_m: (speed_mps * interval_secs).max(0.0),
            interval_us: secs_to_us(interval_secs),
            start_us: 0,
            offset_m: 0.0,
            sample: 0,
            segment: 0,
            finished: coordinates.is_empty(),
        }
    }

    /// Timestamp of the first fix.
    pub fn starting_at(mut self, start_us: u64) -> Self {
        self.start_us = start_us;
        self
    }

    /// Ride parallel to the route, `offset_m` to the right (negative: left).
    pub fn with_offset(mut self, offset_m: f64) -> Self {
        self.offset_m = offset_m;
        self
    }

    fn total_length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Position `distance` meters along the route, and the travel bearing there.
    fn position_at(&mut self, distance: f64) -> (Coordinate, f64) {
        let last = self.coordinates.len() - 1;
        while self.segment + 1 < last && self.cumulative[self.segment + 1] <= distance {
            self.segment += 1;
        }

        let a = self.coordinates[self.segment];
        let b = self.coordinates[self.segment + 1];
        let bearing = initial_bearing(&a, &b);
        let along = (distance - self.cumulative[self.segment]).max(0.0);
        (destination(&a, bearing, along), bearing)
    }
}

impl Iterator for RideSimulator {
    type Item = PositionFix;

    fn next(&mut self) -> Option<PositionFix> {
        if self.finished {
            return None;
        }

        let total = self.total_length();
        let distance = self.sample as f64 * self.step_m;
        // Absorb float noise in the total
        if distance >= total - 1e-6 || self.step_m <= 0.0 {
            self.finished = true;
        }

        let (mut position, bearing) = if self.finished {
            let last = self.coordinates.len() - 1;
            let bearing = if last > 0 {
                initial_bearing(&self.coordinates[last - 1], &self.coordinates[last])
            } else {
                0.0
            };
            (self.coordinates[last], bearing)
        } else {
            self.position_at(distance)
        };

        if self.offset_m != 0.0 {
            position = destination(&position, bearing + 90.0, self.offset_m);
        }

        let timestamp_us = self.start_us + self.sample * self.interval_us;
        self.sample += 1;
        Some(Timestamped::new(position, timestamp_us))
    }
}
