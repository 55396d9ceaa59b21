//! Announcement output.

use super::Announcement;

/// Fire-and-forget consumer of announcements (speech synthesizer, display,
/// haptics).
pub trait AnnouncementSink {
    fn announce(&mut self, announcement: &Announcement);
}

/// Writes announcements to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl AnnouncementSink for LogSink {
    fn announce(&mut self, announcement: &Announcement) {
        log::info!(
            "[{:?}] {} - {}",
            announcement.urgency(),
            announcement.kind,
            announcement.text
        );
    }
}

/// Collects announcements in order.
impl AnnouncementSink for Vec<Announcement> {
    fn announce(&mut self, announcement: &Announcement) {
        self.push(announcement.clone());
    }
}

impl<S: AnnouncementSink + ?Sized> AnnouncementSink for &mut S {
    fn announce(&mut self, announcement: &Announcement) {
        (**self).announce(announcement);
    }
}

impl<S: AnnouncementSink + ?Sized> AnnouncementSink for Box<S> {
    fn announce(&mut self, announcement: &Announcement) {
        (**self).announce(announcement);
    }
}
