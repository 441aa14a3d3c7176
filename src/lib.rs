//! # hashnav
//!
//! A hash-fragment navigation core for single-page applications, with
//! support for:
//!
//! - **Fragment Routing** - Pure, total parsing of `#/view?key=value`
//!   fragments into routes, with canonical alias rewriting
//! - **Double-Hash Repair** - Detection and idempotent repair of malformed
//!   OAuth redirect URLs carrying two `#` characters
//! - **NavStack** - A private back-navigation stack independent of the
//!   host's native history, with dedup and fallback landing
//! - **Deep-Link Reconciliation** - Web, fragment-token, and native
//!   custom-scheme auth callbacks all reduced to one canonical route
//! - **Environment Guarding** - Host classification (normal / localhost /
//!   sandboxed) driving history-API trust and a polling fallback
//! - **Payload Hydration** - Single-use navigation payloads with id-lookup
//!   fallback against a read-only data store
//!
//! # Quick Start
//!
//! ```
//! use hashnav::{MemoryHost, MemoryStore, NavPayload, NavigateOptions, Router, TopicFilter, View};
//!
//! let mut store = MemoryStore::new();
//! store.set_loaded(true);
//!
//! let mut router = Router::new(MemoryHost::new("https://study.example.com/"), store);
//! router.boot();
//!
//! router.navigate_to(
//!     View::TopicList,
//!     Some(NavPayload::for_list(TopicFilter::Due)),
//!     NavigateOptions::default(),
//! );
//! assert_eq!(router.current_view(), &View::TopicList);
//! ```
//!
//! # Navigation
//!
//! [`Router::navigate_to`] is the single outbound path: it builds the
//! canonical target fragment, stashes the in-memory payload, writes the
//! fragment through the host seam, and re-runs the route pass itself —
//! programmatic history mutation is not guaranteed to raise a change
//! notification.
//!
//! Inbound events each have an entry point: [`Router::on_hash_change`],
//! [`Router::poll_tick`], [`Router::handle_deep_link`],
//! [`Router::handle_auth_event`], [`Router::handle_hardware_back`], and
//! [`Router::notify_data_ready`].
//!
//! # Feature Flags
//!
//! - `log` (default) - Uses the standard `log` crate for logging
//! - `tracing` - Uses the `tracing` crate for structured logging (mutually exclusive with `log`)
//! - `cache` (default) - LRU memoization of fragment parsing via the `lru` crate

#![doc(html_root_url = "https://docs.rs/hashnav/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]
// Lints are configured in Cargo.toml [lints] section

// Logging abstraction
pub mod logging;

// Cache (optional)
#[cfg(feature = "cache")]
pub mod cache;

// Core routing modules
pub mod deeplink;
pub mod environment;
pub mod fragment;
pub mod navstack;
pub mod params;
pub mod route;
pub mod sanitize;
pub mod state;

// Error handling
pub mod error;

// External collaborator seams
pub mod host;
pub mod store;

// View hydration
pub mod hydrate;

// Router core
mod router;

// Re-export main types for convenient access
#[cfg(feature = "cache")]
pub use cache::{CacheStats, ParseCache};
pub use deeplink::{classify, AuthCallback, CUSTOM_SCHEME_HOST};
pub use environment::Environment;
pub use error::{BackAction, RouterError};
pub use fragment::parse;
pub use host::{FragmentIO, HostInfo, HostProbe, MemoryHost};
pub use hydrate::{hydrate, NavPayload, ViewState};
pub use navstack::NavStack;
pub use params::RouteParams;
pub use route::{canonical_fragment, Route, View};
pub use router::{AuthEvent, Router, RouterConfig};
pub use sanitize::{clean_fragment, is_double_hash, AUTH_CALLBACK_MARKER};
pub use state::{OverlayFlags, Phase, RouterState};
pub use store::{
    filter_topic_ids, MemoryStore, QuizAttempt, Topic, TopicFilter, TopicStore,
};

/// Correlation token minted by [`Router::navigate_to`].
///
/// Self- vs externally-initiated transitions are told apart by comparing
/// this token, never by fragment string equality (fragments can
/// legitimately repeat).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NavToken(pub(crate) u64);

/// What triggered a route-change pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSource {
    /// Process boot, before any event.
    Boot,
    /// The host's native fragment-change notification.
    HashChange,
    /// The localhost polling fallback observed a moved fragment.
    Poll,
    /// The data store finished its initial load.
    DataReady,
    /// A `navigate_to` call, carrying its correlation token.
    SelfNavigation(NavToken),
}

/// Options for [`Router::navigate_to`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Replace the current history entry instead of pushing a new one.
    pub replace: bool,
}

impl NavigateOptions {
    /// Options requesting a history-replace write.
    pub fn replace() -> Self {
        Self { replace: true }
    }
}
