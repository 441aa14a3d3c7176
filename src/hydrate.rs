//! Per-view hydration.
//!
//! Hydration turns a parsed [`Route`] into the side data a screen needs:
//! the filtered id list for list views, the selected topic id for detail
//! views, the resolved attempt for review views. Each known view has its
//! own hydration arm — adding a view is a closed, local change — and every
//! arm is safe to re-run on the same input.
//!
//! Two data paths feed an arm:
//!
//! - the **pending payload** ([`NavPayload`]) stashed by `navigate_to`
//!   moments earlier, consumed exactly once, never re-derived from the
//!   fragment;
//! - the **store fallback**, when hydration arrives via browser back, a
//!   deep link, or a reload and no payload exists.
//!
//! A miss is never a crash: entities not yet loaded produce
//! [`ViewState::Loading`] (re-run once the store signals data ready), and
//! entities that stay unresolvable after load produce the terminal
//! [`ViewState::Failed`].

use crate::route::{Route, View};
use crate::store::{filter_topic_ids, QuizAttempt, Topic, TopicFilter, TopicStore};
use crate::{error_log, warn_log};

/// In-memory data stashed at navigation time.
///
/// Ephemeral and single-use: written by `navigate_to`, consumed by the next
/// hydration pass, then gone. Fragments only carry identifiers; the payload
/// carries what should not be lossily re-derived from an id alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavPayload {
    /// The topic being navigated to.
    pub topic: Option<Topic>,
    /// A full attempt object for review navigation.
    pub quiz_attempt: Option<QuizAttempt>,
    /// One-based repetition number for review navigation.
    pub repetition_number: Option<u32>,
    /// List category for list navigation.
    pub list_filter: Option<TopicFilter>,
}

impl NavPayload {
    /// Payload for detail/quiz navigation.
    pub fn for_topic(topic: Topic) -> Self {
        Self {
            topic: Some(topic),
            ..Self::default()
        }
    }

    /// Payload for list navigation.
    pub fn for_list(filter: TopicFilter) -> Self {
        Self {
            list_filter: Some(filter),
            ..Self::default()
        }
    }

    /// Payload for attempt-review navigation.
    pub fn for_review(topic: Topic, attempt: QuizAttempt, repetition_number: u32) -> Self {
        Self {
            topic: Some(topic),
            quiz_attempt: Some(attempt),
            repetition_number: Some(repetition_number),
            ..Self::default()
        }
    }
}

/// Hydrated side state for the visible view.
///
/// Holds identifiers, not entity copies — the live entity is re-derived
/// from the store on every render so it is never stale.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// No data dependency (home, settings, auth pre-states, unknown views).
    Plain,
    /// A filtered, ordered topic list.
    TopicList {
        filter: TopicFilter,
        topic_ids: Vec<String>,
    },
    /// A single selected topic.
    TopicDetail { topic_id: String },
    /// An active quiz for a topic.
    Quiz { topic_id: String },
    /// A resolved past attempt under review.
    QuizReview {
        topic_id: String,
        attempt: QuizAttempt,
        repetition_number: u32,
    },
    /// Waiting for the store's initial load; re-hydrated on data ready.
    Loading,
    /// Terminal: the route's entity could not be resolved.
    Failed,
}

impl ViewState {
    /// Whether this state awaits the data-ready signal.
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    /// Whether hydration terminally failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, ViewState::Failed)
    }
}

/// Hydrate a view from its route, consuming the pending payload if one
/// survived from the triggering `navigate_to`.
pub fn hydrate(
    view: &View,
    route: &Route,
    payload: Option<NavPayload>,
    store: &dyn TopicStore,
) -> ViewState {
    match view {
        View::TopicList => hydrate_list(route, store),
        View::TopicDetail => hydrate_topic(route, payload, store)
            .map_or_else(|state| state, |topic_id| ViewState::TopicDetail { topic_id }),
        View::Quiz => hydrate_topic(route, payload, store)
            .map_or_else(|state| state, |topic_id| ViewState::Quiz { topic_id }),
        View::QuizReview => hydrate_review(route, payload, store),
        View::Home
        | View::Settings
        | View::AuthCallback
        | View::ResetPassword
        | View::Unknown(_) => ViewState::Plain,
    }
}

/// List views recompute their result set from the store on every pass.
fn hydrate_list(route: &Route, store: &dyn TopicStore) -> ViewState {
    let filter = route
        .params
        .get("type")
        .and_then(|ty| {
            let filter = TopicFilter::from_name(ty);
            if filter.is_none() {
                warn_log!("Unknown list type '{}', falling back to due", ty);
            }
            filter
        })
        .unwrap_or(TopicFilter::Due);

    if !store.is_loaded() {
        return ViewState::Loading;
    }

    ViewState::TopicList {
        filter,
        topic_ids: filter_topic_ids(store, filter),
    }
}

/// Resolve the selected topic id for detail-style views.
///
/// Payload first (consumed, no store round-trip), then id lookup; an id
/// that cannot resolve yet keeps the view loading until data is ready.
fn hydrate_topic(
    route: &Route,
    payload: Option<NavPayload>,
    store: &dyn TopicStore,
) -> Result<String, ViewState> {
    if let Some(topic) = payload.and_then(|p| p.topic) {
        return Ok(topic.id);
    }

    let Some(id) = route.params.get("id") else {
        return Err(ViewState::Failed);
    };

    if store.topic(id).is_some() {
        Ok(id.clone())
    } else if store.is_loaded() {
        Err(ViewState::Failed)
    } else {
        Err(ViewState::Loading)
    }
}

/// Review hydration tries the payload's full attempt object first, then an
/// indexed lookup by repetition number (defaulting to the most recent).
fn hydrate_review(route: &Route, payload: Option<NavPayload>, store: &dyn TopicStore) -> ViewState {
    if let Some(payload) = payload {
        if let (Some(topic), Some(attempt)) = (payload.topic, payload.quiz_attempt) {
            let repetition_number = payload.repetition_number.unwrap_or(attempt.repetition);
            return ViewState::QuizReview {
                topic_id: topic.id,
                attempt,
                repetition_number,
            };
        }
    }

    let Some(id) = route.params.get("id") else {
        return ViewState::Failed;
    };

    let Some(topic) = store.topic(id) else {
        return if store.is_loaded() {
            error_log!("Failed to hydrate review: topic '{}' not found", id);
            ViewState::Failed
        } else {
            ViewState::Loading
        };
    };

    let rep_index = route.params.get_as::<u32>("repIndex");
    let attempt = rep_index
        .and_then(|index| topic.attempt_by_repetition(index + 1))
        .or_else(|| rep_index.and_then(|index| topic.attempts.get(index as usize)))
        .or_else(|| topic.latest_attempt());

    match attempt {
        Some(attempt) => ViewState::QuizReview {
            topic_id: topic.id.clone(),
            repetition_number: attempt.repetition,
            attempt: attempt.clone(),
        },
        None => {
            error_log!("Failed to hydrate review: topic '{}' has no attempts", id);
            ViewState::Failed
        }
    }
}
