//! Route and view definitions, canonical fragment construction.
//!
//! A [`Route`] is the immutable value the hash parser produces: a view name
//! plus its parameters. [`View`] is the fixed enumeration of screens the
//! application knows about; fragment view names it does not recognize pass
//! through as [`View::Unknown`] and the rendering layer decides what to do
//! with them.
//!
//! Every route has exactly one canonical fragment form, produced by
//! [`canonical_fragment`]. All alias shapes reduce to it:
//!
//! - `""`, `"#"`, `"#/"`, `"#/home"` → `#/`
//! - `#/topicList?type=due` → `#/list/due`
//! - query keys in any order → sorted key order

use crate::params::RouteParams;

/// Fragment view name of the topic list (canonical path form `list/<type>`).
pub const LIST_PREFIX: &str = "list/";

/// A fixed enumeration of application screens.
///
/// Parsing never fails: an unrecognized name becomes [`View::Unknown`] and
/// is carried through unchanged for the rendering layer to dispatch on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum View {
    /// Landing screen.
    Home,
    /// Filtered topic list (`due` / `active` / `history`).
    TopicList,
    /// Single topic detail screen.
    TopicDetail,
    /// Active quiz screen for a topic.
    Quiz,
    /// Review of a past quiz attempt.
    QuizReview,
    /// OAuth / magic-link callback pre-state.
    AuthCallback,
    /// Password reset pre-state.
    ResetPassword,
    /// Settings screen, rendered as an overlay above the current view.
    Settings,
    /// A view name the router does not recognize, passed through unchanged.
    Unknown(String),
}

impl View {
    /// Resolve a fragment view name to a `View`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "home" => View::Home,
            "topicList" => View::TopicList,
            "topic" => View::TopicDetail,
            "quiz" => View::Quiz,
            "quizReview" => View::QuizReview,
            "auth/callback" => View::AuthCallback,
            "resetPassword" => View::ResetPassword,
            "settings" => View::Settings,
            other => View::Unknown(other.to_string()),
        }
    }

    /// The fragment view name for this view.
    pub fn name(&self) -> &str {
        match self {
            View::Home => "home",
            View::TopicList => "topicList",
            View::TopicDetail => "topic",
            View::Quiz => "quiz",
            View::QuizReview => "quizReview",
            View::AuthCallback => "auth/callback",
            View::ResetPassword => "resetPassword",
            View::Settings => "settings",
            View::Unknown(name) => name,
        }
    }

    /// Whether arriving at this view opens it as an overlay above the
    /// previous screen instead of replacing it.
    pub fn is_overlay(&self) -> bool {
        matches!(self, View::Settings)
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The immutable result of parsing a fragment.
///
/// `view` is never empty after parsing (empty fragments normalize to
/// `"home"`); `params` carries identifiers and filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// View name selecting a screen. Unrecognized names pass through.
    pub view: String,
    /// Parameters carried by the fragment's query portion.
    pub params: RouteParams,
}

impl Route {
    /// The home route: `{view: "home", params: {}}`.
    pub fn home() -> Self {
        Self {
            view: "home".to_string(),
            params: RouteParams::new(),
        }
    }

    /// Create a route for a view with the given parameters.
    pub fn new(view: impl Into<String>, params: RouteParams) -> Self {
        Self {
            view: view.into(),
            params,
        }
    }

    /// Resolve the typed [`View`] for this route.
    pub fn resolved_view(&self) -> View {
        View::from_name(&self.view)
    }
}

/// Build the canonical fragment for a route.
///
/// - Home encodes as `#/`.
/// - The topic list encodes in its path form `#/list/<type>`; the `type`
///   parameter moves into the path and any remaining parameters stay in
///   the query.
/// - Everything else encodes as `#/<view>` plus a sorted-key query.
///
/// # Example
///
/// ```
/// use hashnav::{canonical_fragment, Route, RouteParams};
///
/// let mut params = RouteParams::new();
/// params.set("type", "due");
/// let route = Route::new("topicList", params);
/// assert_eq!(canonical_fragment(&route), "#/list/due");
///
/// assert_eq!(canonical_fragment(&Route::home()), "#/");
/// ```
pub fn canonical_fragment(route: &Route) -> String {
    let mut params = route.params.clone();

    let path = match route.resolved_view() {
        View::Home => String::new(),
        View::TopicList => {
            let ty = params.remove("type").unwrap_or_else(|| "due".to_string());
            format!("{}{}", LIST_PREFIX, ty)
        }
        other => other.name().to_string(),
    };

    let query = params.to_query_string();
    match (path.is_empty(), query.is_empty()) {
        (true, true) => "#/".to_string(),
        (true, false) => format!("#/?{}", query),
        (false, true) => format!("#/{}", path),
        (false, false) => format!("#/{}?{}", path, query),
    }
}
