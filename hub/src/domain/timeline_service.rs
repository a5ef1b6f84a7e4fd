//! Read-only queries over the story timeline.

use tracing::debug;

use super::map::Importance;
use super::timeline::{StoryArc, TimelineEvent, story_events};

/// The story timeline in chronological order.
#[derive(Debug, Clone)]
pub struct TimelineService {
    events: Vec<TimelineEvent>,
}

impl Default for TimelineService {
    fn default() -> Self {
        Self::new(story_events())
    }
}

impl TimelineService {
    /// Serve `events`, sorted by id.
    #[must_use]
    pub fn new(mut events: Vec<TimelineEvent>) -> Self {
        events.sort_by_key(|event| event.id);
        debug!(count = events.len(), "timeline loaded");
        Self { events }
    }

    /// Every event, oldest first.
    #[must_use]
    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    /// Look up one event.
    #[must_use]
    pub fn event(&self, id: u64) -> Option<&TimelineEvent> {
        self.events.iter().find(|event| event.id == id)
    }

    /// Events in one arc.
    #[must_use]
    pub fn in_arc(&self, arc: StoryArc) -> Vec<&TimelineEvent> {
        self.filtered(|event| event.arc == arc)
    }

    /// Events of exactly the given importance.
    #[must_use]
    pub fn of_importance(&self, importance: Importance) -> Vec<&TimelineEvent> {
        self.filtered(|event| event.importance == importance)
    }

    /// Events whose title, description or location contains `term`,
    /// ignoring case.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&TimelineEvent> {
        self.filtered(|event| event.matches(term))
    }

    fn filtered(&self, keep: impl Fn(&TimelineEvent) -> bool) -> Vec<&TimelineEvent> {
        self.events.iter().filter(|event| keep(event)).collect()
    }
}
