//! Error handling for the navigation core.
//!
//! Nothing in this crate is fatal: every failure path has a defined
//! fallback. The taxonomy mirrors that:
//!
//! - Malformed URLs are repaired locally by the sanitizer and never surface.
//! - History-API failures ([`RouterError::HistoryWrite`]) are caught at the
//!   call site and fall back to direct fragment assignment.
//! - Hydration misses become a loading retry or a terminal failed view
//!   state, never an error return.
//! - Deep-link parse failures ([`RouterError::DeepLinkParse`]) are treated
//!   as absence of signal.
//!
//! `RouterError` exists so hosts and tests can observe *why* a fallback
//! was taken, not to abort anything.

use std::fmt;

/// Detailed error variants that can occur while routing.
///
/// Implements [`std::error::Error`] and [`Display`](std::fmt::Display) for
/// idiomatic error handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// The host rejected a history push/replace (sandboxed iframe, blob
    /// preview). Always recoverable via direct fragment assignment.
    HistoryWrite { message: String },

    /// An inbound deep-link URL failed to parse. Treated as no auth signal.
    DeepLinkParse { message: String },

    /// A detail-style route could not be hydrated after the data store
    /// finished loading.
    HydrationFailed { view: String },
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::HistoryWrite { message } => {
                write!(f, "History write rejected: {}", message)
            }
            RouterError::DeepLinkParse { message } => {
                write!(f, "Deep link failed to parse: {}", message)
            }
            RouterError::HydrationFailed { view } => {
                write!(f, "Failed to hydrate view '{}'", view)
            }
        }
    }
}

impl std::error::Error for RouterError {}

/// What the router did in response to a hardware back press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackAction {
    /// An open overlay was closed; no navigation happened.
    ClosedOverlay,
    /// The NavStack was popped and the environment was pointed at `fragment`.
    NavigatedBack { fragment: String },
    /// Nothing left to close or pop; the host should exit the application.
    ExitApp,
}

impl BackAction {
    /// Check if the press resulted in a navigation.
    pub fn is_navigation(&self) -> bool {
        matches!(self, BackAction::NavigatedBack { .. })
    }

    /// The fragment navigated to, if any.
    pub fn fragment(&self) -> Option<&str> {
        match self {
            BackAction::NavigatedBack { fragment } => Some(fragment),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RouterError::HistoryWrite {
            message: "SecurityError".to_string(),
        };
        assert_eq!(err.to_string(), "History write rejected: SecurityError");

        let err = RouterError::HydrationFailed {
            view: "quizReview".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to hydrate view 'quizReview'");
    }

    #[test]
    fn test_back_action_accessors() {
        let action = BackAction::NavigatedBack {
            fragment: "#/".to_string(),
        };
        assert!(action.is_navigation());
        assert_eq!(action.fragment(), Some("#/"));

        assert!(!BackAction::ExitApp.is_navigation());
        assert_eq!(BackAction::ClosedOverlay.fragment(), None);
    }
}
