//! Core foundation layer.
//!
//! This is the bottom layer of the navigation stack with no internal
//! dependencies. All other layers depend on core.
//!
//! # Contents
//!
//! - [`types`]: Coordinates and timestamped position fixes
//! - [`geo`]: Great-circle distance, bearing and projection primitives

pub mod geo;
pub mod types;

pub use types::{Coordinate, PositionFix, Timestamped, secs_to_us};
