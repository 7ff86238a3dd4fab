#![forbid(unsafe_code)]

//! Live-region announcer that forces re-announcement.
//!
//! Screen readers announce a live region when its text *changes*. Writing
//! the same text twice is silent, so every announcement first clears the
//! region and then writes the text after a short delay on the page clock.
//!
//! # Invariants
//!
//! 1. `announce` clears the region synchronously.
//! 2. At most one announcement is pending; a newer one supersedes it and
//!    the older text is never written.
//! 3. Text is written only by `tick`, at or after its deadline.

use std::time::Duration;

use beacon_core::{Document, NodeId, TimerQueue};

/// Delay between clearing a region and writing the new text.
///
/// Empirical: long enough for common screen readers to observe the empty
/// state. Tune per target rather than relying on the exact value.
pub const DEFAULT_REANNOUNCE_DELAY: Duration = Duration::from_millis(100);

/// Announcer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnouncerConfig {
    pub reannounce_delay: Duration,
}

impl Default for AnnouncerConfig {
    fn default() -> Self {
        Self {
            reannounce_delay: DEFAULT_REANNOUNCE_DELAY,
        }
    }
}

impl AnnouncerConfig {
    /// Set the clear-to-write delay.
    #[must_use]
    pub fn reannounce_delay(mut self, delay: Duration) -> Self {
        self.reannounce_delay = delay;
        self
    }
}

/// Writes announcements into one live region.
#[derive(Debug, Clone)]
pub struct Announcer {
    region: NodeId,
    config: AnnouncerConfig,
    queue: TimerQueue<String>,
    delivered: u64,
}

impl Announcer {
    #[must_use]
    pub fn new(region: NodeId, config: AnnouncerConfig) -> Self {
        Self {
            region,
            config,
            queue: TimerQueue::new(),
            delivered: 0,
        }
    }

    /// The live-region element.
    #[must_use]
    pub fn region(&self) -> NodeId {
        self.region
    }

    #[must_use]
    pub fn config(&self) -> AnnouncerConfig {
        self.config
    }

    /// Clear the region now and queue `text` for `now + reannounce_delay`.
    pub fn announce(&mut self, doc: &mut Document, text: impl Into<String>, now: Duration) {
        self.queue.cancel_all();
        doc.set_text(self.region, "");
        self.queue
            .schedule(now, self.config.reannounce_delay, text.into());
    }

    /// Drop any pending announcement and empty the region.
    pub fn clear(&mut self, doc: &mut Document) {
        self.queue.cancel_all();
        doc.set_text(self.region, "");
    }

    /// Write any announcement due by `now`. Returns the text written.
    pub fn tick(&mut self, doc: &mut Document, now: Duration) -> Option<String> {
        let text = self.queue.drain_due(now).pop()?;
        doc.set_text(self.region, text.as_str());
        self.delivered += 1;
        #[cfg(feature = "tracing")]
        tracing::debug!(announcement = %text, "live region updated");
        Some(text)
    }

    /// Text waiting to be written.
    #[must_use]
    pub fn pending(&self) -> Option<&str> {
        self.queue.pending().next().map(String::as_str)
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.next_deadline()
    }

    /// Number of announcements written so far.
    #[must_use]
    pub fn delivered(&self) -> u64 {
        self.delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn setup() -> (Document, Announcer) {
        let mut doc = Document::new();
        let body = doc.body();
        let region = doc
            .element("div")
            .id("status")
            .attr("aria-live", "polite")
            .append_to(body);
        (doc, Announcer::new(region, AnnouncerConfig::default()))
    }

    #[test]
    fn clears_then_writes_after_delay() {
        let (mut doc, mut a) = setup();
        let region = a.region();
        doc.set_text(region, "old");

        a.announce(&mut doc, "Table sorted by Year, ascending.", ms(1_000));
        assert_eq!(doc.text_content(region), "");
        assert_eq!(a.pending(), Some("Table sorted by Year, ascending."));
        assert_eq!(a.next_deadline(), Some(ms(1_100)));

        assert_eq!(a.tick(&mut doc, ms(1_099)), None);
        assert_eq!(doc.text_content(region), "");

        assert_eq!(
            a.tick(&mut doc, ms(1_100)).as_deref(),
            Some("Table sorted by Year, ascending.")
        );
        assert_eq!(doc.text_content(region), "Table sorted by Year, ascending.");
        assert_eq!(a.pending(), None);
    }

    #[test]
    fn identical_text_passes_through_empty_state() {
        let (mut doc, mut a) = setup();
        let region = a.region();
        a.announce(&mut doc, "same", ms(0));
        a.tick(&mut doc, ms(100));
        assert_eq!(doc.text_content(region), "same");

        a.announce(&mut doc, "same", ms(200));
        assert_eq!(doc.text_content(region), "");
        a.tick(&mut doc, ms(300));
        assert_eq!(doc.text_content(region), "same");
        assert_eq!(a.delivered(), 2);
    }

    #[test]
    fn newer_announcement_supersedes_pending() {
        let (mut doc, mut a) = setup();
        a.announce(&mut doc, "first", ms(0));
        a.announce(&mut doc, "second", ms(50));
        assert_eq!(a.tick(&mut doc, ms(100)), None);
        assert_eq!(a.tick(&mut doc, ms(150)).as_deref(), Some("second"));
        assert_eq!(a.delivered(), 1);
    }

    #[test]
    fn clear_drops_pending_text() {
        let (mut doc, mut a) = setup();
        let region = a.region();
        a.announce(&mut doc, "gone", ms(0));
        doc.set_text(region, "stale");
        a.clear(&mut doc);
        assert_eq!(doc.text_content(region), "");
        assert_eq!(a.tick(&mut doc, ms(100)), None);
        assert_eq!(a.delivered(), 0);
    }

    #[test]
    fn custom_delay() {
        let mut doc = Document::new();
        let body = doc.body();
        let region = doc.element("div").append_to(body);
        let mut a = Announcer::new(
            region,
            AnnouncerConfig::default().reannounce_delay(ms(250)),
        );
        a.announce(&mut doc, "x", ms(0));
        assert_eq!(a.tick(&mut doc, ms(249)), None);
        assert_eq!(a.tick(&mut doc, ms(250)).as_deref(), Some("x"));
    }
}
