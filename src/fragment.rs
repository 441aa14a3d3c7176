//! Hash fragment parsing.
//!
//! Pure, total conversion of a raw fragment string into a [`Route`]. There
//! are no error outcomes: every input maps to some route, and unrecognized
//! view names pass through unchanged for the rendering layer to judge.
//!
//! The fragment is the portion of the URL after `#`; parsing accepts it
//! with or without the leading `#` (hosts hand over `location.hash`, which
//! keeps it).
//!
//! # Grammar
//!
//! `#/<view>[/<subpath>]?[<key>=<value>(&<key>=<value>)*]`
//!
//! - `""`, `"#"`, `"#/"` → `{view: "home", params: {}}`
//! - `#/list/<type>` is the canonical list form: the segment after the
//!   slash becomes `params.type` and the view is forced to `topicList`,
//!   overriding any `type` already present in the query.

use crate::params::RouteParams;
use crate::route::{Route, LIST_PREFIX};

/// Parse a fragment into a route.
///
/// # Examples
///
/// ```
/// use hashnav::parse;
///
/// assert_eq!(parse("").view, "home");
/// assert_eq!(parse("#").view, "home");
/// assert_eq!(parse("#/").view, "home");
///
/// let route = parse("#/quizReview?id=t1&repIndex=2");
/// assert_eq!(route.view, "quizReview");
/// assert_eq!(route.params.get("id"), Some(&"t1".to_string()));
///
/// let route = parse("#/list/due");
/// assert_eq!(route.view, "topicList");
/// assert_eq!(route.params.get("type"), Some(&"due".to_string()));
/// ```
pub fn parse(fragment: &str) -> Route {
    // Strip a single leading "#/" or "#".
    let raw = fragment.strip_prefix('#').unwrap_or(fragment);
    let raw = raw.strip_prefix('/').unwrap_or(raw);

    if raw.is_empty() {
        return Route::home();
    }

    let (path, query) = match raw.split_once('?') {
        Some((path, query)) => (path, query),
        None => (raw, ""),
    };

    let mut params = if query.is_empty() {
        RouteParams::new()
    } else {
        RouteParams::from_query_string(query)
    };

    // Canonical list form: the path segment wins over any query-supplied type.
    if let Some(list_type) = path.strip_prefix(LIST_PREFIX) {
        if !list_type.is_empty() {
            params.set("type", list_type);
            return Route::new("topicList", params);
        }
    }

    let view = if path.is_empty() { "home" } else { path };
    Route::new(view, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_forms_normalize_to_home() {
        for fragment in ["", "#", "#/"] {
            let route = parse(fragment);
            assert_eq!(route, Route::home(), "fragment {:?}", fragment);
        }
    }

    #[test]
    fn test_plain_view() {
        let route = parse("#/settings");
        assert_eq!(route.view, "settings");
        assert!(route.params.is_empty());
    }

    #[test]
    fn test_view_with_subpath() {
        let route = parse("#/auth/callback?code=abc123");
        assert_eq!(route.view, "auth/callback");
        assert_eq!(route.params.get("code"), Some(&"abc123".to_string()));
    }

    #[test]
    fn test_query_parsing() {
        let route = parse("#/quizReview?id=t1&repIndex=2");
        assert_eq!(route.view, "quizReview");
        assert_eq!(route.params.get("id"), Some(&"t1".to_string()));
        assert_eq!(route.params.get_as::<usize>("repIndex"), Some(2));
    }

    #[test]
    fn test_duplicate_query_keys_last_wins() {
        let route = parse("#/topic?id=a&id=b");
        assert_eq!(route.params.get("id"), Some(&"b".to_string()));
    }

    #[test]
    fn test_list_path_forces_topic_list() {
        let route = parse("#/list/due");
        assert_eq!(route.view, "topicList");
        assert_eq!(route.params.get("type"), Some(&"due".to_string()));
    }

    #[test]
    fn test_list_path_overrides_query_type() {
        let route = parse("#/list/history?type=due");
        assert_eq!(route.view, "topicList");
        assert_eq!(route.params.get("type"), Some(&"history".to_string()));
    }

    #[test]
    fn test_list_alias_and_path_form_parse_equal() {
        assert_eq!(parse("#/list/due"), parse("#/topicList?type=due"));
    }

    #[test]
    fn test_bare_list_prefix_is_not_a_list() {
        // "list/" with no segment falls through as an unknown view name.
        let route = parse("#/list/");
        assert_eq!(route.view, "list/");
    }

    #[test]
    fn test_missing_hash_prefix_accepted() {
        let route = parse("/quiz?id=t2");
        assert_eq!(route.view, "quiz");
        assert_eq!(route.params.get("id"), Some(&"t2".to_string()));
    }

    #[test]
    fn test_unknown_view_passes_through() {
        let route = parse("#/podcastLab?episode=4");
        assert_eq!(route.view, "podcastLab");
        assert_eq!(route.params.get("episode"), Some(&"4".to_string()));
    }

    #[test]
    fn test_query_only_fragment_is_home() {
        let route = parse("#/?welcome=1");
        assert_eq!(route.view, "home");
        assert_eq!(route.params.get("welcome"), Some(&"1".to_string()));
    }
}
