//! The router state machine.
//!
//! [`Router`] owns the navigation state and drives every other component on
//! every route-changing event. It is the single place where the ambient
//! fragment, the NavStack, the pending payload, and view hydration meet.
//!
//! The router has no single source of truth to lean on: the fragment can be
//! mutated by application code, by browser back/forward, by an OAuth
//! redirect, by a native deep link — or not at all in sandboxed previews.
//! Convergence comes from making every step of the pass idempotent and from
//! re-reading the live fragment at the start of each pass instead of
//! trusting whatever value the triggering event carried.
//!
//! Every pass runs the same pipeline:
//!
//! 1. repair any double-hash fragment (sanitizer, idempotent);
//! 2. resolve the authoritative fragment from the environment;
//! 3. rewrite alias shapes to the canonical form via history-replace;
//! 4. decide self- vs externally-initiated by correlation token and update
//!    the NavStack accordingly;
//! 5. parse the route;
//! 6. hydrate view-specific side state (payload first, store fallback);
//! 7. select the visible view, raising the overlay flag for overlay views.
//!
//! [`navigate_to`](Router::navigate_to) is the single outbound path. Its
//! ordering is strict — stash payload, mint token, write fragment, re-run
//! the pass — because programmatic history mutation is not guaranteed to
//! raise a change notification, and a near-simultaneous native notification
//! must not reprocess the same fragment as externally-initiated.

#[cfg(feature = "cache")]
use crate::cache::ParseCache;
use crate::deeplink;
use crate::environment::Environment;
use crate::error::BackAction;
#[cfg(not(feature = "cache"))]
use crate::fragment;
use crate::host::{FragmentIO, HostProbe};
use crate::hydrate::{self, NavPayload, ViewState};
use crate::params::RouteParams;
use crate::route::{canonical_fragment, Route, View};
use crate::sanitize;
use crate::state::{OverlayFlags, Phase, RouterState};
use crate::store::{TopicFilter, TopicStore};
use crate::{debug_log, info_log, trace_log, warn_log};
use crate::{ChangeSource, NavToken, NavigateOptions};

/// Router configuration.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Where an emptied NavStack lands on back navigation.
    pub fallback_fragment: String,
    /// Whether the `PASSWORD_RECOVERY` auth event routes to the
    /// password-reset screen.
    pub recovery_flow_enabled: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            fallback_fragment: "#/".to_string(),
            recovery_flow_enabled: true,
        }
    }
}

/// Session lifecycle events from the authentication collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// The provider reported a password-recovery session.
    PasswordRecovery,
}

/// The navigation core.
///
/// Generic over the host seam (`H`) and the data-store collaborator (`S`),
/// so the whole machine runs against in-memory doubles in tests.
pub struct Router<H, S>
where
    H: FragmentIO + HostProbe,
    S: TopicStore,
{
    io: H,
    store: S,
    config: RouterConfig,
    state: RouterState,
    environment: Environment,
    #[cfg(feature = "cache")]
    parse_cache: ParseCache,
}

impl<H, S> Router<H, S>
where
    H: FragmentIO + HostProbe,
    S: TopicStore,
{
    /// Create a router with default configuration.
    pub fn new(io: H, store: S) -> Self {
        Self::with_config(io, store, RouterConfig::default())
    }

    /// Create a router with explicit configuration.
    pub fn with_config(io: H, store: S, config: RouterConfig) -> Self {
        let environment = Environment::classify(&io.host_info());
        Self {
            io,
            store,
            config,
            state: RouterState::new(),
            environment,
            #[cfg(feature = "cache")]
            parse_cache: ParseCache::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The visible view.
    pub fn current_view(&self) -> &View {
        self.state.current_view()
    }

    /// Hydrated side state for the visible view.
    pub fn view_state(&self) -> &ViewState {
        self.state.view_state()
    }

    /// The back-navigation stack, oldest first.
    pub fn nav_stack(&self) -> &[String] {
        self.state.nav_stack().stack()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// The classified hosting environment.
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Clonable overlay flag handle for native event handlers.
    pub fn overlay(&self) -> OverlayFlags {
        self.state.overlay().clone()
    }

    /// The data-store collaborator.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the data-store collaborator.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// The host seam.
    pub fn io(&self) -> &H {
        &self.io
    }

    /// Mutable access to the host seam.
    pub fn io_mut(&mut self) -> &mut H {
        &mut self.io
    }

    // ========================================================================
    // Inbound events
    // ========================================================================

    /// Boot the router.
    ///
    /// Classifies the environment, rewrites a path-based or token-carrying
    /// arrival URL into the canonical auth fragment before any routing
    /// decision, then runs the first pass.
    pub fn boot(&mut self) {
        let info = self.io.host_info();
        self.environment = Environment::classify(&info);
        info_log!("Booting in {:?} environment", self.environment);

        if let Some(callback) = deeplink::classify(&info.href) {
            debug_log!(
                "Inbound URL carries an auth signal, rewriting to '{}'",
                callback.fragment
            );
            self.write_fragment(&callback.fragment, true);
        }

        self.handle_change(ChangeSource::Boot);
        self.state.set_idle();
    }

    /// The host observed a native fragment-change notification.
    pub fn on_hash_change(&mut self) {
        self.handle_change(ChangeSource::HashChange);
    }

    /// Low-frequency polling fallback; the host calls this on a timer.
    ///
    /// Only acts on localhost (production hosts reliably emit the native
    /// notification) and only when the fragment actually moved since the
    /// last completed pass. Returns `true` if a pass ran.
    pub fn poll_tick(&mut self) -> bool {
        if !self.environment.should_poll() {
            return false;
        }
        if self.io.read() == self.state.last_seen_fragment() {
            return false;
        }
        debug_log!("Polling detected a fragment change");
        self.handle_change(ChangeSource::Poll);
        true
    }

    /// The data store finished its initial load.
    ///
    /// Re-runs hydration once if a loading view registered interest;
    /// unrelated state changes never re-trigger it.
    pub fn notify_data_ready(&mut self) {
        if !self.state.awaiting_data() {
            return;
        }
        debug_log!("Data ready, re-running hydration");
        self.handle_change(ChangeSource::DataReady);
    }

    /// A session lifecycle event arrived from the auth collaborator.
    pub fn handle_auth_event(&mut self, event: AuthEvent) {
        match event {
            AuthEvent::PasswordRecovery => {
                if self.config.recovery_flow_enabled {
                    self.navigate_to(View::ResetPassword, None, NavigateOptions::default());
                } else {
                    debug_log!("Password recovery flow disabled, ignoring event");
                }
            }
        }
    }

    /// The native shell reported an "app opened via URL" event.
    ///
    /// Returns `true` if the URL carried an auth signal and was routed.
    /// Malformed or signal-free URLs are ignored; boot proceeds normally.
    pub fn handle_deep_link(&mut self, raw_url: &str) -> bool {
        match deeplink::classify(raw_url) {
            Some(callback) => {
                info_log!("Deep link resolved to '{}'", callback.fragment);
                self.write_fragment(&callback.fragment, false);
                self.handle_change(ChangeSource::HashChange);
                true
            }
            None => false,
        }
    }

    /// The user pressed the hardware/software back button.
    ///
    /// Consults the overlay flags first, then the NavStack; signals
    /// application exit only when there is nothing left to close or pop.
    pub fn handle_hardware_back(&mut self) -> BackAction {
        // Context can change if the app was reloaded into a different host.
        self.environment = Environment::classify(&self.io.host_info());

        if self.state.overlay().modal_open() {
            self.state.overlay().set_modal_open(false);
            return BackAction::ClosedOverlay;
        }
        if self.state.overlay().settings_open() {
            self.state.overlay().set_settings_open(false);
            return BackAction::ClosedOverlay;
        }

        if self.state.nav_stack().len() <= 1 && *self.state.current_view() == View::Home {
            info_log!("Back at root, signaling app exit");
            return BackAction::ExitApp;
        }

        let target = self
            .state
            .nav_stack_mut()
            .go_back_hash(&self.config.fallback_fragment);
        debug_log!("Hardware back → '{}'", target);

        // Direct assignment always raises the native notification; the
        // manual pass below keeps hosts without one consistent, and a
        // duplicate pass over the same fragment is a no-op.
        self.io.assign(&target);
        self.handle_change(ChangeSource::HashChange);
        BackAction::NavigatedBack { fragment: target }
    }

    // ========================================================================
    // Outbound navigation
    // ========================================================================

    /// Navigate to a view, optionally carrying in-memory data.
    ///
    /// Builds the canonical target fragment from the view and payload,
    /// stashes the payload for the next hydration pass, writes the fragment
    /// (history push, or replace per `options`), and manually re-runs the
    /// pass. Returns the correlation token identifying this navigation.
    pub fn navigate_to(
        &mut self,
        view: View,
        payload: Option<NavPayload>,
        options: NavigateOptions,
    ) -> NavToken {
        let built = build_fragment(&view, payload.as_ref());
        // A malformed target must never reach the history API.
        let fragment = sanitize::clean_fragment(&built).unwrap_or(built);
        info_log!("Navigate to '{}' ({})", fragment, view);

        // Strict ordering: stash → mint token → write → re-run.
        if let Some(payload) = payload {
            self.state.stash_payload(payload);
        }
        let token = self.state.begin_navigation(fragment.clone());
        self.write_fragment(&fragment, options.replace);
        self.handle_change(ChangeSource::SelfNavigation(token));
        token
    }

    // ========================================================================
    // The route-change pass
    // ========================================================================

    /// Process one route-changing event to completion.
    fn handle_change(&mut self, source: ChangeSource) {
        trace_log!("Route pass triggered by {:?}", source);

        // Step 1: repair any double-hash before touching anything else.
        sanitize::run(&mut self.io);

        // Step 2: the live fragment is authoritative; the event's carried
        // value may already be stale.
        let mut current = self.io.read();

        // Step 3: rewrite alias shapes to the canonical form.
        let route = self.parse_route(&current);
        let canonical = canonical_fragment(&route);
        if canonical != current {
            debug_log!("Canonicalizing '{}' → '{}'", current, canonical);
            self.write_fragment(&canonical, true);
            current = canonical;
        }

        // Step 4: self-initiated passes push onto the NavStack; external
        // ones (back/forward, deep link, manual edit) only seed an empty
        // stack, so browser-native history is never double-counted.
        let self_initiated = match source {
            ChangeSource::SelfNavigation(token) => self.state.consume_pending_nav(token),
            _ => false,
        };
        if self_initiated || self.state.nav_stack().is_empty() {
            self.state.nav_stack_mut().push_hash(current.clone());
        }

        // Steps 5–6: parse, then hydrate view-specific side state. The
        // pending payload is consumed here exactly once, whichever view
        // the pass lands on.
        let view = route.resolved_view();
        let payload = self.state.take_payload();
        let view_state = hydrate::hydrate(&view, &route, payload, &self.store);
        if view_state.is_failed() {
            warn_log!("Hydration failed for view '{}'", view);
        }
        self.state.set_view_state(view_state);

        // Step 7: select the visible view; overlay views additionally
        // raise their flag.
        if view.is_overlay() {
            self.state.overlay().set_settings_open(true);
        }
        info_log!("Routed to view '{}'", view);
        self.state.set_current_view(view);
        self.state.set_last_seen_fragment(current);
    }

    // ========================================================================
    // Fragment writing
    // ========================================================================

    /// Write the fragment, honoring the environment classification.
    ///
    /// Sandboxed hosts skip the history API entirely; elsewhere a rejected
    /// history write falls back to direct assignment, which always succeeds.
    fn write_fragment(&mut self, fragment: &str, replace: bool) {
        if !self.environment.trust_history_api() {
            trace_log!("Sandboxed host, assigning '{}' directly", fragment);
            self.io.assign(fragment);
            return;
        }
        if let Err(err) = self.io.write(fragment, replace) {
            debug_log!("History write failed, assigning directly: {}", err);
            self.io.assign(fragment);
        }
    }

    #[cfg(feature = "cache")]
    fn parse_route(&mut self, raw: &str) -> Route {
        self.parse_cache.parse(raw)
    }

    #[cfg(not(feature = "cache"))]
    fn parse_route(&mut self, raw: &str) -> Route {
        fragment::parse(raw)
    }
}

/// Build the canonical target fragment for a navigation.
///
/// Parameters come from a deterministic encoding of the payload: the topic
/// id, the list-type discriminator, and — for attempt-review navigation —
/// a zero-based `repIndex` derived from the one-based repetition number.
fn build_fragment(view: &View, payload: Option<&NavPayload>) -> String {
    let mut params = RouteParams::new();

    match view {
        View::TopicList => {
            let filter = payload
                .and_then(|p| p.list_filter)
                .unwrap_or(TopicFilter::Due);
            params.set("type", filter.name());
        }
        View::TopicDetail | View::Quiz => {
            if let Some(topic) = payload.and_then(|p| p.topic.as_ref()) {
                params.set("id", topic.id.clone());
            }
        }
        View::QuizReview => {
            if let Some(payload) = payload {
                if let Some(topic) = payload.topic.as_ref() {
                    params.set("id", topic.id.clone());
                }
                let repetition = payload
                    .repetition_number
                    .or_else(|| payload.quiz_attempt.as_ref().map(|a| a.repetition));
                if let Some(repetition) = repetition {
                    params.set("repIndex", repetition.saturating_sub(1).to_string());
                }
            }
        }
        _ => {}
    }

    canonical_fragment(&Route::new(view.name().to_string(), params))
}
