//! Route analysis: polyline to turn instructions.
//!
//! The analyzer walks every interior coordinate, measures the heading
//! change between the incoming and outgoing segments, and materializes an
//! instruction for every change that is not a straight continuation.
//!
//! ```text
//!   c[i-1] ──bearing1──► c[i] ──bearing2──► c[i+1]
//!                         │
//!            angle = bearing2 - bearing1 in (-180°, 180°]
//!                         │
//!                  classify_turn(angle)
//! ```
//!
//! The output always starts with a synthetic `Straight` at the first
//! coordinate and ends with `Arrive` at the last.

use crate::core::Coordinate;
use crate::core::geo::{haversine_distance, initial_bearing, relative_angle};
use crate::error::Result;

use super::{Polyline, TurnInstruction, TurnKind};

/// Heading changes below this are straight continuations (degrees).
pub const STRAIGHT_MAX_DEG: f64 = 15.0;
/// Heading changes above this are U-turns (degrees).
pub const U_TURN_MIN_DEG: f64 = 160.0;
/// Upper bound of the slight-turn band (degrees).
pub const SLIGHT_MAX_DEG: f64 = 45.0;
/// Upper bound of the regular-turn band (degrees).
pub const REGULAR_MAX_DEG: f64 = 120.0;

/// Classify a signed heading change into a turn.
///
/// Positive angles turn right, negative angles turn left.
///
/// # Example
/// ```
/// use marga::route::{TurnKind, classify_turn};
///
/// assert_eq!(classify_turn(8.0), TurnKind::Straight);
/// assert_eq!(classify_turn(30.0), TurnKind::SlightRight);
/// assert_eq!(classify_turn(-90.0), TurnKind::Left);
/// assert_eq!(classify_turn(135.0), TurnKind::SharpRight);
/// assert_eq!(classify_turn(-170.0), TurnKind::UTurn);
/// ```
pub fn classify_turn(angle_deg: f64) -> TurnKind {
    let abs_angle = angle_deg.abs();
    let right = angle_deg > 0.0;

    if abs_angle < STRAIGHT_MAX_DEG {
        TurnKind::Straight
    } else if abs_angle > U_TURN_MIN_DEG {
        TurnKind::UTurn
    } else if abs_angle < SLIGHT_MAX_DEG {
        if right {
            TurnKind::SlightRight
        } else {
            TurnKind::SlightLeft
        }
    } else if abs_angle < REGULAR_MAX_DEG {
        if right { TurnKind::Right } else { TurnKind::Left }
    } else if right {
        TurnKind::SharpRight
    } else {
        TurnKind::SharpLeft
    }
}

/// Turn formed at `via` when travelling `from` → `via` → `to`.
pub fn detect_turn(from: &Coordinate, via: &Coordinate, to: &Coordinate) -> TurnKind {
    let bearing1 = initial_bearing(from, via);
    let bearing2 = initial_bearing(via, to);
    classify_turn(relative_angle(bearing1, bearing2))
}

/// Convert a polyline into its ordered list of turn instructions.
///
/// Never empty: a two-point polyline yields the start and arrive
/// instructions only.
pub fn analyze(polyline: &Polyline) -> Vec<TurnInstruction> {
    let coords = polyline.coordinates();
    let n = coords.len();

    let mut instructions = Vec::with_capacity(n.min(64));

    instructions.push(TurnInstruction {
        location: coords[0],
        turn_kind: TurnKind::Straight,
        cumulative_distance_m: 0.0,
        bearing_deg: initial_bearing(&coords[0], &coords[1]),
        street_name: polyline.street_at(0).map(str::to_owned),
        polyline_index: 0,
    });

    let mut total_distance = 0.0;

    for i in 1..n - 1 {
        let prev = &coords[i - 1];
        let current = &coords[i];
        let next = &coords[i + 1];

        total_distance += haversine_distance(prev, current);

        let turn_kind = detect_turn(prev, current, next);
        if turn_kind == TurnKind::Straight {
            continue;
        }

        instructions.push(TurnInstruction {
            location: *current,
            turn_kind,
            cumulative_distance_m: total_distance,
            bearing_deg: initial_bearing(current, next),
            street_name: polyline.street_at(i).map(str::to_owned),
            polyline_index: i,
        });
    }

    total_distance += haversine_distance(&coords[n - 2], &coords[n - 1]);

    instructions.push(TurnInstruction {
        location: coords[n - 1],
        turn_kind: TurnKind::Arrive,
        cumulative_distance_m: total_distance,
        bearing_deg: initial_bearing(&coords[n - 2], &coords[n - 1]),
        street_name: None,
        polyline_index: n - 1,
    });

    log::debug!(
        "Analyzed {} coordinates into {} instructions ({:.0}m)",
        n,
        instructions.len(),
        total_distance
    );

    instructions
}

/// Validate raw coordinates and analyze them.
///
/// Fails with [`crate::MargaError::InvalidRoute`] for fewer than 2
/// coordinates.
pub fn analyze_coordinates(coordinates: &[Coordinate]) -> Result<Vec<TurnInstruction>> {
    let polyline = Polyline::new(coordinates.to_vec())?;
    Ok(analyze(&polyline))
}
