//! Turn instruction types.

use serde::{Deserialize, Serialize};

use crate::core::Coordinate;

/// Manoeuvre vocabulary for turn instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnKind {
    Straight,
    SlightLeft,
    Left,
    SharpLeft,
    SlightRight,
    Right,
    SharpRight,
    UTurn,
    /// Part of the vocabulary for externally supplied instructions.
    /// The angle classifier never produces it.
    Roundabout,
    Arrive,
}

impl TurnKind {
    /// Stable identifier, also used as the phrasebook key suffix.
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnKind::Straight => "straight",
            TurnKind::SlightLeft => "slight_left",
            TurnKind::Left => "left",
            TurnKind::SharpLeft => "sharp_left",
            TurnKind::SlightRight => "slight_right",
            TurnKind::Right => "right",
            TurnKind::SharpRight => "sharp_right",
            TurnKind::UTurn => "u_turn",
            TurnKind::Roundabout => "roundabout",
            TurnKind::Arrive => "arrive",
        }
    }

    /// Check if this is one of the left-hand turns.
    pub fn is_left(&self) -> bool {
        matches!(
            self,
            TurnKind::SlightLeft | TurnKind::Left | TurnKind::SharpLeft
        )
    }

    /// Check if this is one of the right-hand turns.
    pub fn is_right(&self) -> bool {
        matches!(
            self,
            TurnKind::SlightRight | TurnKind::Right | TurnKind::SharpRight
        )
    }
}

impl std::fmt::Display for TurnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single navigation instruction at a point of the route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnInstruction {
    /// Where the manoeuvre happens.
    pub location: Coordinate,
    /// What to do there.
    pub turn_kind: TurnKind,
    /// Distance along the polyline from the route start, meters.
    pub cumulative_distance_m: f64,
    /// Heading to travel immediately after this point, degrees [0, 360).
    pub bearing_deg: f64,
    /// Road taken after the manoeuvre, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_name: Option<String>,
    /// Index of `location` in the source polyline.
    pub polyline_index: usize,
}

impl TurnInstruction {
    /// Set the street name.
    pub fn with_street(mut self, street: impl Into<String>) -> Self {
        self.street_name = Some(street.into());
        self
    }

    /// Along-route distance from this instruction to `other`.
    #[inline]
    pub fn distance_along_to(&self, other: &TurnInstruction) -> f64 {
        (other.cumulative_distance_m - self.cumulative_distance_m).max(0.0)
    }
}
