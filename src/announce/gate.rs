//! Announcement gate - decides when an instruction is spoken.
//!
//! Three distance tiers (far, near, immediate) each fire at most once per
//! instruction. A minimum interval between any two announcements throttles
//! bursts; a throttled tier is consumed, not retried.
//!
//! ```text
//!   distance:  > far │ far..near │ near..immediate │ ≤ immediate
//!   fires:   (reset) │    Far    │      Near       │  Immediate
//! ```

use crate::config::AnnouncerConfig;
use crate::core::secs_to_us;
use crate::route::TurnInstruction;

use super::phrases::{EnglishPhrasebook, PhraseKey, Phrasebook, render_instruction, render_phrase};

/// Distance tier of an instruction announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Far,
    Near,
    Immediate,
}

/// How urgently the output device should present an announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Urgency {
    Low,
    Medium,
    High,
}

/// What an announcement is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnouncementKind {
    Instruction(Tier),
    OffRoute,
    Arrival,
}

impl AnnouncementKind {
    pub fn urgency(&self) -> Urgency {
        match self {
            AnnouncementKind::Instruction(Tier::Far) => Urgency::Low,
            AnnouncementKind::Instruction(Tier::Near) => Urgency::Medium,
            AnnouncementKind::Instruction(Tier::Immediate) => Urgency::High,
            AnnouncementKind::OffRoute => Urgency::High,
            AnnouncementKind::Arrival => Urgency::Medium,
        }
    }
}

impl std::fmt::Display for AnnouncementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnnouncementKind::Instruction(Tier::Far) => f.write_str("far"),
            AnnouncementKind::Instruction(Tier::Near) => f.write_str("near"),
            AnnouncementKind::Instruction(Tier::Immediate) => f.write_str("immediate"),
            AnnouncementKind::OffRoute => f.write_str("off_route"),
            AnnouncementKind::Arrival => f.write_str("arrival"),
        }
    }
}

/// A rendered announcement, ready for a speech or text sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub kind: AnnouncementKind,
    pub text: String,
}

impl Announcement {
    #[inline]
    pub fn urgency(&self) -> Urgency {
        self.kind.urgency()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct TierFlags {
    far: bool,
    near: bool,
    immediate: bool,
}

/// Per-session announcement state machine.
pub struct AnnouncementGate {
    config: AnnouncerConfig,
    phrasebook: Box<dyn Phrasebook>,
    flags: TierFlags,
    last_announcement_us: Option<u64>,
}

impl AnnouncementGate {
    /// Create a gate speaking English.
    pub fn new(config: AnnouncerConfig) -> Self {
        Self::with_phrasebook(config, Box::new(EnglishPhrasebook))
    }

    /// Create a gate with a custom phrasebook.
    pub fn with_phrasebook(config: AnnouncerConfig, phrasebook: Box<dyn Phrasebook>) -> Self {
        Self {
            config,
            phrasebook,
            flags: TierFlags::default(),
            last_announcement_us: None,
        }
    }

    pub fn config(&self) -> &AnnouncerConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.config.enabled != enabled {
            log::info!("Announcements {}", if enabled { "enabled" } else { "disabled" });
        }
        self.config.enabled = enabled;
    }

    /// Flip announcements on/off. Returns the new setting.
    pub fn toggle(&mut self) -> bool {
        self.set_enabled(!self.config.enabled);
        self.config.enabled
    }

    /// Clear the tier flags. Call when the current instruction changes.
    pub fn reset(&mut self) {
        self.flags = TierFlags::default();
    }

    /// Clear the tier flags and the throttle. Call when a session starts.
    pub fn reset_session(&mut self) {
        self.reset();
        self.last_announcement_us = None;
    }

    /// Decide whether `instruction`, `distance_m` away, is announced now.
    pub fn evaluate(
        &mut self,
        instruction: &TurnInstruction,
        distance_m: f64,
        now_us: u64,
    ) -> Option<Announcement> {
        let tier = if distance_m > self.config.far_threshold_m {
            self.reset();
            return None;
        } else if distance_m > self.config.near_threshold_m {
            if self.flags.far {
                return None;
            }
            self.flags.far = true;
            Tier::Far
        } else if distance_m > self.config.immediate_threshold_m {
            if self.flags.near {
                return None;
            }
            self.flags.near = true;
            Tier::Near
        } else {
            if self.flags.immediate {
                return None;
            }
            self.flags.immediate = true;
            Tier::Immediate
        };

        if !self.admit(now_us) {
            log::debug!(
                "Suppressed {:?} announcement for {} at {:.0}m",
                tier,
                instruction.turn_kind,
                distance_m
            );
            return None;
        }

        let spoken_distance = (tier != Tier::Immediate).then_some(distance_m);
        let text = render_instruction(
            self.phrasebook.as_ref(),
            &self.config.locale,
            instruction,
            spoken_distance,
        );
        Some(Announcement {
            kind: AnnouncementKind::Instruction(tier),
            text,
        })
    }

    /// Off-route phrase, subject to the throttle.
    pub fn announce_off_route(&mut self, now_us: u64) -> Option<Announcement> {
        self.lifecycle(AnnouncementKind::OffRoute, PhraseKey::OffRoute, now_us)
    }

    /// Arrival phrase, subject to the throttle.
    pub fn announce_arrival(&mut self, now_us: u64) -> Option<Announcement> {
        self.lifecycle(AnnouncementKind::Arrival, PhraseKey::Arrived, now_us)
    }

    fn lifecycle(
        &mut self,
        kind: AnnouncementKind,
        key: PhraseKey,
        now_us: u64,
    ) -> Option<Announcement> {
        if !self.admit(now_us) {
            log::debug!("Suppressed {} announcement", kind);
            return None;
        }
        Some(Announcement {
            kind,
            text: render_phrase(self.phrasebook.as_ref(), &self.config.locale, key),
        })
    }

    /// Apply the enabled switch and the minimum interval. Records the
    /// announcement time when admitted.
    fn admit(&mut self, now_us: u64) -> bool {
        if !self.config.enabled {
            return false;
        }
        if let Some(last) = self.last_announcement_us
            && now_us.saturating_sub(last) < secs_to_us(self.config.min_interval_secs)
        {
            return false;
        }
        self.last_announcement_us = Some(now_us);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Coordinate;
    use crate::route::TurnKind;

    const SEC: u64 = 1_000_000;

    fn right_turn() -> TurnInstruction {
        TurnInstruction {
            location: Coordinate::new(59.9, 10.7),
            turn_kind: TurnKind::Right,
            cumulative_distance_m: 800.0,
            bearing_deg: 90.0,
            street_name: None,
            polyline_index: 3,
        }
    }

    fn gate() -> AnnouncementGate {
        AnnouncementGate::new(AnnouncerConfig::default())
    }

    #[test]
    fn test_three_tiers_fire_once() {
        let mut gate = gate();
        let turn = right_turn();

        let fired: Vec<_> = [600.0, 400.0, 150.0, 50.0, 10.0]
            .iter()
            .enumerate()
            .filter_map(|(i, &d)| gate.evaluate(&turn, d, i as u64 * 10 * SEC))
            .collect();

        assert_eq!(fired.len(), 3);
        assert_eq!(fired[0].kind, AnnouncementKind::Instruction(Tier::Far));
        assert_eq!(fired[0].text, "In 400 meters, turn right");
        assert_eq!(fired[1].kind, AnnouncementKind::Instruction(Tier::Near));
        assert_eq!(fired[1].text, "In 150 meters, turn right");
        assert_eq!(fired[2].kind, AnnouncementKind::Instruction(Tier::Immediate));
        assert_eq!(fired[2].text, "Turn right now");
    }

    #[test]
    fn test_repeated_fixes_in_one_band() {
        let mut gate = gate();
        let turn = right_turn();

        let count = (0..50)
            .filter_map(|i| gate.evaluate(&turn, 450.0 - i as f64, i * 10 * SEC))
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_throttled_tier_not_retried() {
        let mut gate = gate();
        let turn = right_turn();

        assert!(gate.evaluate(&turn, 400.0, 0).is_some());
        // Near tier 1s later: suppressed
        assert!(gate.evaluate(&turn, 90.0, SEC).is_none());
        // Still in the near band well after the interval: consumed
        assert!(gate.evaluate(&turn, 80.0, 10 * SEC).is_none());
        assert!(gate.evaluate(&turn, 20.0, 20 * SEC).is_some());
    }

    #[test]
    fn test_clock_going_backwards_is_throttled() {
        let mut gate = gate();
        let turn = right_turn();

        assert!(gate.evaluate(&turn, 400.0, 100 * SEC).is_some());
        assert!(gate.evaluate(&turn, 90.0, 50 * SEC).is_none());
    }

    #[test]
    fn test_beyond_far_resets_flags() {
        let mut gate = gate();
        let turn = right_turn();

        assert!(gate.evaluate(&turn, 400.0, 0).is_some());
        assert!(gate.evaluate(&turn, 700.0, 10 * SEC).is_none());
        assert!(gate.evaluate(&turn, 400.0, 20 * SEC).is_some());
    }

    #[test]
    fn test_reset_rearms_tiers() {
        let mut gate = gate();
        let turn = right_turn();

        assert!(gate.evaluate(&turn, 20.0, 0).is_some());
        gate.reset();
        assert!(gate.evaluate(&turn, 20.0, 10 * SEC).is_some());
    }

    #[test]
    fn test_disabled_gate_tracks_flags() {
        let mut gate = gate();
        let turn = right_turn();

        assert!(!gate.toggle());
        assert!(gate.evaluate(&turn, 400.0, 0).is_none());
        assert!(gate.announce_arrival(SEC).is_none());

        gate.set_enabled(true);
        // Far tier already passed while muted
        assert!(gate.evaluate(&turn, 350.0, 10 * SEC).is_none());
        assert!(gate.evaluate(&turn, 90.0, 20 * SEC).is_some());
    }

    #[test]
    fn test_lifecycle_phrases() {
        let mut gate = gate();

        let off = gate.announce_off_route(0).unwrap();
        assert_eq!(off.kind, AnnouncementKind::OffRoute);
        assert_eq!(off.text, "You are off route");
        assert_eq!(off.urgency(), Urgency::High);

        assert!(gate.announce_arrival(SEC).is_none());

        let arrived = gate.announce_arrival(5 * SEC).unwrap();
        assert_eq!(arrived.text, "You have arrived at your destination");
    }

    #[test]
    fn test_reset_session_clears_throttle() {
        let mut gate = gate();
        let turn = right_turn();

        assert!(gate.evaluate(&turn, 400.0, 0).is_some());
        gate.reset_session();
        assert!(gate.evaluate(&turn, 400.0, SEC).is_some());
    }
}
