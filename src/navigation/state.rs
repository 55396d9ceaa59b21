//! Navigation lifecycle state and the read-only snapshot handed to the UI.

use serde::{Deserialize, Serialize};

use crate::route::TurnInstruction;

/// Navigation lifecycle state.
///
/// ```text
///  Idle ──start──► Navigating ◄──────► OffRoute
///   ▲                  │      deviation
///   │                  │ last instruction reached
///   │                  ▼
///   └──────stop────  Arrived
/// ```
///
/// `stop` returns to Idle from every state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NavState {
    /// No active route.
    #[default]
    Idle,

    /// Following the route.
    Navigating,

    /// Too far from the route; instructions are frozen until the rider
    /// returns within the threshold.
    OffRoute,

    /// Final instruction reached. Terminal until `stop` or a new route.
    Arrived,
}

impl NavState {
    /// Check if position fixes are being consumed.
    pub fn is_active(&self) -> bool {
        matches!(self, NavState::Navigating | NavState::OffRoute)
    }

    /// Convert to string for logs and status output.
    pub fn as_str(&self) -> &'static str {
        match self {
            NavState::Idle => "IDLE",
            NavState::Navigating => "NAVIGATING",
            NavState::OffRoute => "OFF_ROUTE",
            NavState::Arrived => "ARRIVED",
        }
    }
}

impl std::fmt::Display for NavState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable view of a navigation session after a fix.
///
/// Suitable for polling by a UI; holds copies, not references into the
/// tracker.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NavigationSnapshot {
    /// Lifecycle state.
    pub state: NavState,

    /// Instruction cursor. `None` when Idle.
    pub current_index: Option<usize>,

    /// Instruction the rider is heading for. `None` when Idle or Arrived.
    pub current_instruction: Option<TurnInstruction>,

    /// Instruction after the current one, if any.
    pub next_instruction: Option<TurnInstruction>,

    /// Straight-line distance from the last fix to the current instruction (meters).
    pub distance_to_next_m: f64,

    /// Fraction of the route completed, in [0, 1].
    pub progress_fraction: f64,

    /// Along-route distance from the current instruction to the end (meters).
    pub distance_remaining_m: f64,

    /// Remaining distance divided by the configured average speed.
    pub seconds_remaining: f64,

    /// Distance from the last fix to the route (meters).
    pub distance_from_route_m: f64,
}

/// An instruction the rider reached during an update.
#[derive(Debug, Clone, PartialEq)]
pub struct ReachedInstruction {
    pub instruction: TurnInstruction,
    /// Distance from the fix to the instruction when it was reached.
    pub distance_m: f64,
}

/// Result of a position update.
#[derive(Debug, Clone)]
pub struct NavigationUpdate {
    /// State after the update.
    pub snapshot: NavigationSnapshot,

    /// State before the update.
    pub previous_state: NavState,

    /// Whether the instruction cursor moved.
    pub instruction_changed: bool,

    /// First instruction reached by this fix, if any.
    pub reached: Option<ReachedInstruction>,
}

impl NavigationUpdate {
    /// An update that changed nothing.
    pub fn unchanged(snapshot: NavigationSnapshot) -> Self {
        Self {
            previous_state: snapshot.state,
            snapshot,
            instruction_changed: false,
            reached: None,
        }
    }

    /// Whether the lifecycle state changed.
    pub fn state_changed(&self) -> bool {
        self.previous_state != self.snapshot.state
    }

    /// Whether this update transitioned into `state`.
    pub fn entered(&self, state: NavState) -> bool {
        self.previous_state != state && self.snapshot.state == state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_states() {
        assert!(!NavState::Idle.is_active());
        assert!(NavState::Navigating.is_active());
        assert!(NavState::OffRoute.is_active());
        assert!(!NavState::Arrived.is_active());
    }

    #[test]
    fn test_update_transitions() {
        let snapshot = NavigationSnapshot {
            state: NavState::OffRoute,
            ..Default::default()
        };
        let mut update = NavigationUpdate::unchanged(snapshot);
        assert!(!update.state_changed());
        assert!(!update.entered(NavState::OffRoute));

        update.previous_state = NavState::Navigating;
        assert!(update.state_changed());
        assert!(update.entered(NavState::OffRoute));
        assert!(!update.entered(NavState::Navigating));
    }
}
