//! Navigation session - wires tracker, announcement gate and sink together.
//!
//! Per fix:
//! 1. The tracker updates the cursor and state
//! 2. A reached instruction gets its last chance at the gate (the immediate
//!    tier usually fires on the fix that reaches it)
//! 3. The gate is reset when the cursor moves
//! 4. Entering OffRoute or Arrived speaks the lifecycle phrase
//! 5. Otherwise the current instruction is evaluated at its distance
//!
//! A newly current instruction is evaluated from the following fix, so its
//! far tier is not throttled by the announcement just made.

use crate::announce::{Announcement, AnnouncementGate, AnnouncementSink, Phrasebook};
use crate::config::MargaConfig;
use crate::core::{Coordinate, PositionFix};
use crate::error::Result;
use crate::navigation::{NavState, NavigationSnapshot, NavigationTracker, NavigationUpdate};
use crate::route::{Polyline, Route, TurnInstruction, TurnKind};

/// One active navigation: a tracker, its gate and an output sink.
pub struct NavigationSession<S: AnnouncementSink> {
    tracker: NavigationTracker,
    gate: AnnouncementGate,
    sink: S,
    announcements: usize,
}

impl<S: AnnouncementSink> NavigationSession<S> {
    /// Create an idle session with English phrases.
    pub fn new(config: &MargaConfig, sink: S) -> Self {
        Self {
            tracker: NavigationTracker::new(config.tracker.clone()),
            gate: AnnouncementGate::new(config.announcer.clone()),
            sink,
            announcements: 0,
        }
    }

    /// Create an idle session with a custom phrasebook.
    pub fn with_phrasebook(config: &MargaConfig, phrasebook: Box<dyn Phrasebook>, sink: S) -> Self {
        Self {
            tracker: NavigationTracker::new(config.tracker.clone()),
            gate: AnnouncementGate::with_phrasebook(config.announcer.clone(), phrasebook),
            sink,
            announcements: 0,
        }
    }

    pub fn start(&mut self, polyline: Polyline) -> NavigationSnapshot {
        self.gate.reset_session();
        self.tracker.start(polyline)
    }

    pub fn start_coordinates(&mut self, coordinates: &[Coordinate]) -> Result<NavigationSnapshot> {
        self.gate.reset_session();
        self.tracker.start_coordinates(coordinates)
    }

    pub fn start_route(&mut self, route: &Route) -> Result<NavigationSnapshot> {
        self.gate.reset_session();
        self.tracker.start_route(route)
    }

    pub fn stop(&mut self) {
        self.tracker.stop();
        self.gate.reset_session();
    }

    /// Feed one position fix through the pipeline.
    pub fn update(&mut self, fix: &PositionFix) -> NavigationUpdate {
        let update = self.tracker.update_position(fix);
        let now_us = fix.timestamp_us;

        if let Some(reached) = &update.reached
            && Self::is_announced(&reached.instruction)
            && reached.instruction.turn_kind != TurnKind::Arrive
        {
            let announcement = self
                .gate
                .evaluate(&reached.instruction, reached.distance_m, now_us);
            self.emit(announcement);
        }

        if update.instruction_changed {
            self.gate.reset();
        }

        if update.entered(NavState::OffRoute) {
            let announcement = self.gate.announce_off_route(now_us);
            self.emit(announcement);
        } else if update.entered(NavState::Arrived) {
            let announcement = self.gate.announce_arrival(now_us);
            self.emit(announcement);
        } else if update.snapshot.state == NavState::Navigating
            && !update.instruction_changed
            && let Some(current) = &update.snapshot.current_instruction
        {
            let distance = update.snapshot.distance_to_next_m;
            // The arrival phrase stands in for the final immediate tier
            let arriving = current.turn_kind == TurnKind::Arrive
                && distance <= self.gate.config().immediate_threshold_m;

            if Self::is_announced(current) && !arriving {
                let announcement = self.gate.evaluate(current, distance, now_us);
                self.emit(announcement);
            }
        }

        update
    }

    /// The synthetic start instruction is never spoken.
    fn is_announced(instruction: &TurnInstruction) -> bool {
        instruction.polyline_index != 0
    }

    fn emit(&mut self, announcement: Option<Announcement>) {
        if let Some(announcement) = announcement {
            self.announcements += 1;
            self.sink.announce(&announcement);
        }
    }

    pub fn snapshot(&self) -> NavigationSnapshot {
        self.tracker.snapshot()
    }

    pub fn state(&self) -> NavState {
        self.tracker.state()
    }

    pub fn tracker(&self) -> &NavigationTracker {
        &self.tracker
    }

    pub fn gate(&self) -> &AnnouncementGate {
        &self.gate
    }

    /// Mutable gate access (mute/unmute).
    pub fn gate_mut(&mut self) -> &mut AnnouncementGate {
        &mut self.gate
    }

    /// Announcements handed to the sink since creation.
    pub fn announcement_count(&self) -> usize {
        self.announcements
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
