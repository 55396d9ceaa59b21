//! Voice announcements: when to speak and what to say.
//!
//! - [`AnnouncementGate`]: tiered distance state machine with a minimum interval
//! - [`Phrasebook`]: localization provider, [`EnglishPhrasebook`] built in
//! - [`AnnouncementSink`]: where rendered announcements go

mod gate;
mod phrases;
mod sink;

pub use gate::{Announcement, AnnouncementGate, AnnouncementKind, Tier, Urgency};
pub use phrases::{
    EnglishPhrasebook, PhraseKey, PhraseTable, Phrasebook, format_distance, render_instruction,
    render_phrase,
};
pub use sink::{AnnouncementSink, LogSink};
