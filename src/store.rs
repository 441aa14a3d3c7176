//! The study-data collaborator boundary.
//!
//! The router never owns study data. It reads topics and quiz attempts
//! through the [`TopicStore`] trait — a read-only, synchronous-looking
//! lookup over the application's current in-memory collection — and stores
//! only identifiers in its own state, so the displayed entity is never
//! stale relative to concurrent edits elsewhere in the application.
//!
//! The three list categories ([`TopicFilter`]) each carry their own
//! predicate; the history category is additionally sorted by completion
//! date, newest first.

use std::collections::BTreeMap;

/// A study topic.
#[derive(Debug, Clone, PartialEq)]
pub struct Topic {
    /// Stable identifier, carried in fragments as `id=`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Subject the topic belongs to.
    pub subject: String,
    /// Epoch seconds of the next scheduled review, if any.
    pub next_review_epoch: Option<u64>,
    /// Epoch seconds of completion; `None` while the topic is active.
    pub completed_epoch: Option<u64>,
    /// Past quiz attempts, ordered by repetition number ascending.
    pub attempts: Vec<QuizAttempt>,
}

impl Topic {
    /// Find an attempt by its one-based repetition number.
    pub fn attempt_by_repetition(&self, repetition: u32) -> Option<&QuizAttempt> {
        self.attempts.iter().find(|a| a.repetition == repetition)
    }

    /// The most recent attempt, if any.
    pub fn latest_attempt(&self) -> Option<&QuizAttempt> {
        self.attempts.last()
    }
}

/// One completed pass through a topic's quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizAttempt {
    /// Stable identifier.
    pub id: String,
    /// One-based repetition number within the topic.
    pub repetition: u32,
    /// Score as a fraction in `0.0..=1.0`, if graded.
    pub score: Option<f32>,
    /// Epoch seconds when the attempt finished.
    pub completed_epoch: u64,
}

/// The three topic-list categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopicFilter {
    /// Topics whose next review is due now or earlier.
    Due,
    /// Topics not yet completed.
    Active,
    /// Completed topics, newest completion first.
    History,
}

impl TopicFilter {
    /// Resolve a fragment `type` parameter, `None` for unknown values.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "due" => Some(TopicFilter::Due),
            "active" => Some(TopicFilter::Active),
            "history" => Some(TopicFilter::History),
            _ => None,
        }
    }

    /// The fragment `type` value for this filter.
    pub fn name(self) -> &'static str {
        match self {
            TopicFilter::Due => "due",
            TopicFilter::Active => "active",
            TopicFilter::History => "history",
        }
    }
}

impl std::fmt::Display for TopicFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Read-only lookup over the application's current topic collection.
///
/// The router never writes through this interface.
pub trait TopicStore {
    /// Look up a topic by id.
    fn topic(&self, id: &str) -> Option<Topic>;

    /// Snapshot of all topics currently held.
    fn topics(&self) -> Vec<Topic>;

    /// Whether the initial data load has finished. Hydration of
    /// data-dependent views stays in a loading sub-state until it has.
    fn is_loaded(&self) -> bool;

    /// Current time in epoch seconds, used by the due predicate.
    fn now_epoch(&self) -> u64;
}

/// Compute the ordered topic ids for a list category.
///
/// Returns identifiers, not entities: the rendering layer re-derives each
/// live topic from the store so concurrent edits are never shadowed.
pub fn filter_topic_ids(store: &dyn TopicStore, filter: TopicFilter) -> Vec<String> {
    let now = store.now_epoch();
    let mut topics = store.topics();

    match filter {
        TopicFilter::Due => topics
            .iter()
            .filter(|t| t.completed_epoch.is_none())
            .filter(|t| t.next_review_epoch.is_some_and(|at| at <= now))
            .map(|t| t.id.clone())
            .collect(),
        TopicFilter::Active => topics
            .iter()
            .filter(|t| t.completed_epoch.is_none())
            .map(|t| t.id.clone())
            .collect(),
        TopicFilter::History => {
            topics.retain(|t| t.completed_epoch.is_some());
            // Reverse-chronological by completion date.
            topics.sort_by(|a, b| b.completed_epoch.cmp(&a.completed_epoch));
            topics.into_iter().map(|t| t.id).collect()
        }
    }
}

// ============================================================================
// MemoryStore
// ============================================================================

/// In-memory [`TopicStore`] for tests and headless hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    topics: BTreeMap<String, Topic>,
    loaded: bool,
    now_epoch: u64,
}

impl MemoryStore {
    /// Create an empty, not-yet-loaded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a topic.
    pub fn insert(&mut self, topic: Topic) {
        self.topics.insert(topic.id.clone(), topic);
    }

    /// Mark the initial data load as finished.
    pub fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }

    /// Set the clock the due predicate reads.
    pub fn set_now_epoch(&mut self, now_epoch: u64) {
        self.now_epoch = now_epoch;
    }
}

impl TopicStore for MemoryStore {
    fn topic(&self, id: &str) -> Option<Topic> {
        self.topics.get(id).cloned()
    }

    fn topics(&self) -> Vec<Topic> {
        self.topics.values().cloned().collect()
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn now_epoch(&self) -> u64 {
        self.now_epoch
    }
}
