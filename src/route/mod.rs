//! Route geometry and turn analysis.
//!
//! # Key Types
//!
//! - [`Route`]: Route as delivered by the data source (named endpoints + points)
//! - [`Polyline`]: Validated geometry with at least two coordinates
//! - [`TurnInstruction`]: A manoeuvre at a point of the route
//!
//! [`analyze`] is a pure function from polyline to instructions; it is
//! called once when a navigation session starts.

mod analyzer;
mod instruction;
mod polyline;
mod source;

pub use analyzer::{
    REGULAR_MAX_DEG, SLIGHT_MAX_DEG, STRAIGHT_MAX_DEG, U_TURN_MIN_DEG, analyze,
    analyze_coordinates, classify_turn, detect_turn,
};
pub use instruction::{TurnInstruction, TurnKind};
pub use polyline::{DeviationMetric, Polyline};
pub use source::{NamedPoint, Route, RoutePoint};
