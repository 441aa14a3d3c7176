//! Router state management

use crate::hydrate::{NavPayload, ViewState};
use crate::navstack::NavStack;
use crate::route::View;
use crate::NavToken;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Lifecycle phase of the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Before the first route-change pass has completed.
    Booting,
    /// Normal operation; re-entered on every route-changing event.
    Idle,
}

/// Overlay/modal flags mirrored into shared atomics.
///
/// Asynchronous native event handlers (the hardware back button) read
/// current UI state through a clone of this handle without being recreated
/// on every state change.
#[derive(Debug, Clone, Default)]
pub struct OverlayFlags {
    settings_open: Arc<AtomicBool>,
    modal_open: Arc<AtomicBool>,
}

impl OverlayFlags {
    /// Create cleared flags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the settings overlay is open.
    pub fn settings_open(&self) -> bool {
        self.settings_open.load(Ordering::SeqCst)
    }

    /// Open or close the settings overlay.
    pub fn set_settings_open(&self, open: bool) {
        self.settings_open.store(open, Ordering::SeqCst);
    }

    /// Whether a modal dialog is open above the current screen.
    pub fn modal_open(&self) -> bool {
        self.modal_open.load(Ordering::SeqCst)
    }

    /// Open or close the modal flag.
    pub fn set_modal_open(&self, open: bool) {
        self.modal_open.store(open, Ordering::SeqCst);
    }

    /// Whether anything is open above the current screen.
    pub fn any_open(&self) -> bool {
        self.settings_open() || self.modal_open()
    }
}

/// An outstanding self-initiated navigation, identified by its token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNav {
    /// Correlation token returned by `navigate_to`.
    pub token: NavToken,
    /// The fragment that was written.
    pub fragment: String,
}

/// Mutable state owned by the router core.
#[derive(Debug)]
pub struct RouterState {
    phase: Phase,
    current_view: View,
    view_state: ViewState,
    nav_stack: NavStack,
    pending_payload: Option<NavPayload>,
    pending_nav: Option<PendingNav>,
    last_seen_fragment: String,
    awaiting_data: bool,
    overlay: OverlayFlags,
    /// Token counter; each navigation increments it, so stale self-initiated
    /// events can be told apart from the outstanding one.
    token_counter: u64,
}

impl RouterState {
    /// Create fresh boot-time state.
    pub fn new() -> Self {
        Self {
            phase: Phase::Booting,
            current_view: View::Home,
            view_state: ViewState::Plain,
            nav_stack: NavStack::new(),
            pending_payload: None,
            pending_nav: None,
            last_seen_fragment: String::new(),
            awaiting_data: false,
            overlay: OverlayFlags::new(),
            token_counter: 0,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Enter the idle phase after the first completed pass.
    pub fn set_idle(&mut self) {
        self.phase = Phase::Idle;
    }

    /// The visible view.
    pub fn current_view(&self) -> &View {
        &self.current_view
    }

    /// Set the visible view.
    pub fn set_current_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Hydrated side state for the visible view.
    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    /// Replace the hydrated side state.
    pub fn set_view_state(&mut self, state: ViewState) {
        self.awaiting_data = state.is_loading();
        self.view_state = state;
    }

    /// The back-navigation stack.
    pub fn nav_stack(&self) -> &NavStack {
        &self.nav_stack
    }

    /// Mutable access to the back-navigation stack.
    pub fn nav_stack_mut(&mut self) -> &mut NavStack {
        &mut self.nav_stack
    }

    /// Stash in-memory data for the next hydration pass.
    pub fn stash_payload(&mut self, payload: NavPayload) {
        self.pending_payload = Some(payload);
    }

    /// Consume the pending payload. Single-use: the payload is cleared
    /// whether or not the caller makes use of it.
    pub fn take_payload(&mut self) -> Option<NavPayload> {
        self.pending_payload.take()
    }

    /// Record the start of a self-initiated navigation and mint its token.
    pub fn begin_navigation(&mut self, fragment: String) -> NavToken {
        self.token_counter += 1;
        let token = NavToken(self.token_counter);
        self.pending_nav = Some(PendingNav { token, fragment });
        token
    }

    /// Consume the outstanding navigation if `token` matches it.
    ///
    /// Returns `true` exactly once per token: a stale or foreign token
    /// leaves the outstanding navigation in place.
    pub fn consume_pending_nav(&mut self, token: NavToken) -> bool {
        match &self.pending_nav {
            Some(pending) if pending.token == token => {
                self.pending_nav = None;
                true
            }
            _ => false,
        }
    }

    /// The last fragment a completed pass processed (polling comparator).
    pub fn last_seen_fragment(&self) -> &str {
        &self.last_seen_fragment
    }

    /// Record the fragment a pass just processed.
    pub fn set_last_seen_fragment(&mut self, fragment: String) {
        self.last_seen_fragment = fragment;
    }

    /// Whether a loading view registered interest in the data-ready signal.
    pub fn awaiting_data(&self) -> bool {
        self.awaiting_data
    }

    /// Shared overlay flag handle.
    pub fn overlay(&self) -> &OverlayFlags {
        &self.overlay
    }
}

impl Default for RouterState {
    fn default() -> Self {
        Self::new()
    }
}
