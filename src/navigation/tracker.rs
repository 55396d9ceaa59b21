//! Navigation tracker - follows a rider's progress along a route.
//!
//! The [`NavigationTracker`] is the stateful core of a navigation session:
//! 1. Analyzes the route once at start
//! 2. Measures each fix's deviation from the route (off-route detection)
//! 3. Advances the instruction cursor as instructions are reached
//! 4. Maintains progress, remaining distance and time estimates
//!
//! Every call returns an immutable [`NavigationSnapshot`]; the cursor and
//! metrics are held privately.

use crate::config::TrackerConfig;
use crate::core::geo::haversine_distance;
use crate::core::{Coordinate, PositionFix};
use crate::error::Result;
use crate::route::{Polyline, Route, TurnInstruction, analyze};

use super::{NavState, NavigationSnapshot, NavigationUpdate, ReachedInstruction};

/// Route state owned by an active session.
#[derive(Debug)]
struct ActiveRoute {
    polyline: Polyline,
    instructions: Vec<TurnInstruction>,
    total_distance: f64,
    current_index: usize,
    distance_to_next: f64,
    distance_remaining: f64,
    distance_from_route: f64,
    last_fix_us: Option<u64>,
}

impl ActiveRoute {
    /// Sum of inter-instruction distances from `index` to the end.
    fn remaining_from(&self, index: usize) -> f64 {
        self.instructions[index..]
            .windows(2)
            .map(|w| w[0].distance_along_to(&w[1]))
            .sum()
    }
}

/// What a single accepted fix changed.
#[derive(Debug, Default)]
struct FixOutcome {
    instruction_changed: bool,
    reached: Option<ReachedInstruction>,
}

/// Tracks a rider against a route, one position fix at a time.
///
/// Not internally synchronized; hosts feeding fixes from several threads
/// must serialize access.
pub struct NavigationTracker {
    config: TrackerConfig,
    state: NavState,
    route: Option<ActiveRoute>,
}

impl NavigationTracker {
    /// Create an idle tracker.
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            state: NavState::Idle,
            route: None,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> NavState {
        self.state
    }

    /// Instructions of the active route (empty when Idle).
    pub fn instructions(&self) -> &[TurnInstruction] {
        self.route
            .as_ref()
            .map(|r| r.instructions.as_slice())
            .unwrap_or(&[])
    }

    /// Start navigating a route, replacing any active one.
    pub fn start(&mut self, polyline: Polyline) -> NavigationSnapshot {
        let instructions = analyze(&polyline);
        let total_distance = instructions
            .last()
            .map(|i| i.cumulative_distance_m)
            .unwrap_or(0.0);

        log::info!(
            "Navigation started: {} instructions, {:.2}km",
            instructions.len(),
            total_distance / 1000.0
        );

        self.route = Some(ActiveRoute {
            polyline,
            instructions,
            total_distance,
            current_index: 0,
            distance_to_next: 0.0,
            distance_remaining: total_distance,
            distance_from_route: 0.0,
            last_fix_us: None,
        });
        self.state = NavState::Navigating;

        self.snapshot()
    }

    /// Validate raw coordinates and start navigating them.
    ///
    /// On [`crate::MargaError::InvalidRoute`] the tracker is left Idle with
    /// no route.
    pub fn start_coordinates(&mut self, coordinates: &[Coordinate]) -> Result<NavigationSnapshot> {
        self.start_validated(Polyline::new(coordinates.to_vec()))
    }

    /// Start navigating a route from the route data source.
    pub fn start_route(&mut self, route: &Route) -> Result<NavigationSnapshot> {
        log::info!("Starting route '{}' ({} -> {})", route.name, route.start.name, route.end.name);
        self.start_validated(route.polyline())
    }

    fn start_validated(&mut self, polyline: Result<Polyline>) -> Result<NavigationSnapshot> {
        match polyline {
            Ok(polyline) => Ok(self.start(polyline)),
            Err(e) => {
                log::warn!("Cannot start navigation: {}", e);
                self.stop();
                Err(e)
            }
        }
    }

    /// Stop navigating and release the route.
    pub fn stop(&mut self) {
        if self.state != NavState::Idle {
            log::info!("Navigation stopped ({})", self.state);
        }
        self.state = NavState::Idle;
        self.route = None;
    }

    /// Apply a position fix.
    ///
    /// A no-op unless Navigating or OffRoute. Fixes older than the last
    /// accepted fix are dropped.
    pub fn update_position(&mut self, fix: &PositionFix) -> NavigationUpdate {
        let previous_state = self.state;

        if !self.state.is_active() {
            return NavigationUpdate::unchanged(self.snapshot());
        }

        let Some(route) = self.route.as_mut() else {
            return NavigationUpdate::unchanged(self.snapshot());
        };

        match Self::apply_fix(&self.config, &mut self.state, route, fix) {
            Some(outcome) => NavigationUpdate {
                snapshot: self.snapshot(),
                previous_state,
                instruction_changed: outcome.instruction_changed,
                reached: outcome.reached,
            },
            None => NavigationUpdate::unchanged(self.snapshot()),
        }
    }

    fn apply_fix(
        config: &TrackerConfig,
        state: &mut NavState,
        route: &mut ActiveRoute,
        fix: &PositionFix,
    ) -> Option<FixOutcome> {
        if let Some(last) = route.last_fix_us
            && fix.timestamp_us < last
        {
            log::debug!(
                "Dropping out-of-order fix ({}us < {}us)",
                fix.timestamp_us,
                last
            );
            return None;
        }
        route.last_fix_us = Some(fix.timestamp_us);

        let position = fix.data;

        // Deviation check gates everything else
        let deviation = route
            .polyline
            .distance_to_route(&position, config.deviation_metric);
        route.distance_from_route = deviation;

        if deviation > config.off_route_threshold_m {
            if *state != NavState::OffRoute {
                log::warn!(
                    "Off route: {:.0}m from route (threshold {:.0}m)",
                    deviation,
                    config.off_route_threshold_m
                );
            }
            *state = NavState::OffRoute;
            return Some(FixOutcome::default());
        }

        if *state == NavState::OffRoute {
            log::info!("Back on route ({:.0}m from route)", deviation);
            *state = NavState::Navigating;
        }

        let start_index = route.current_index;
        let last_index = route.instructions.len() - 1;
        let mut reached = None;
        let mut advances = 0;

        loop {
            let current = &route.instructions[route.current_index];
            let distance = haversine_distance(&position, &current.location);
            route.distance_to_next = distance;

            if distance >= config.instruction_proximity_m
                || advances >= config.max_advance_per_fix
            {
                break;
            }

            if reached.is_none() {
                reached = Some(ReachedInstruction {
                    instruction: current.clone(),
                    distance_m: distance,
                });
            }
            advances += 1;

            if route.current_index == last_index {
                *state = NavState::Arrived;
                route.distance_to_next = 0.0;
                log::info!("Arrived at destination");
                break;
            }

            route.current_index += 1;
            log::debug!(
                "Instruction {} reached ({:.1}m), next: {} at {:.0}m",
                route.current_index - 1,
                distance,
                route.instructions[route.current_index].turn_kind,
                route.instructions[route.current_index].cumulative_distance_m
            );
        }

        route.distance_remaining = route.remaining_from(route.current_index);

        Some(FixOutcome {
            instruction_changed: route.current_index != start_index,
            reached,
        })
    }

    /// Current read-only view of the session.
    pub fn snapshot(&self) -> NavigationSnapshot {
        let Some(route) = &self.route else {
            return NavigationSnapshot::default();
        };

        let arrived = self.state == NavState::Arrived;
        let remaining = if arrived { 0.0 } else { route.distance_remaining };

        let progress_fraction = if route.total_distance > 0.0 {
            (1.0 - remaining / route.total_distance).clamp(0.0, 1.0)
        } else if arrived {
            1.0
        } else {
            0.0
        };

        let (current_instruction, next_instruction) = if arrived {
            (None, None)
        } else {
            (
                route.instructions.get(route.current_index).cloned(),
                route.instructions.get(route.current_index + 1).cloned(),
            )
        };

        NavigationSnapshot {
            state: self.state,
            current_index: Some(route.current_index),
            current_instruction,
            next_instruction,
            distance_to_next_m: route.distance_to_next,
            progress_fraction,
            distance_remaining_m: remaining,
            seconds_remaining: remaining / self.config.average_speed_mps,
            distance_from_route_m: route.distance_from_route,
        }
    }

    /// Remaining route from the coordinate nearest to `position`.
    ///
    /// Intended for a rerouting consumer; the tracker never reroutes by
    /// itself. `None` without an active route.
    pub fn reroute_suggestion(&self, position: &Coordinate) -> Option<&[Coordinate]> {
        self.route
            .as_ref()
            .map(|r| r.polyline.suffix_from_nearest(position))
    }
}
