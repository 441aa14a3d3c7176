//! Integration tests for hashnav
//!
//! These tests verify the complete router workflow including boot,
//! navigation, double-hash repair, deep-link reconciliation, hardware
//! back, and hydration against in-memory host and store doubles.

use hashnav::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn attempt(rep: u32) -> QuizAttempt {
    QuizAttempt {
        id: format!("a{}", rep),
        repetition: rep,
        score: Some(0.75),
        completed_epoch: u64::from(rep) * 100,
    }
}

fn topic(id: &str, attempts: u32) -> Topic {
    Topic {
        id: id.to_string(),
        name: id.to_uppercase(),
        subject: "math".to_string(),
        next_review_epoch: Some(500),
        completed_epoch: None,
        attempts: (1..=attempts).map(attempt).collect(),
    }
}

fn loaded_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.set_now_epoch(1_000);
    store.set_loaded(true);
    store.insert(topic("t1", 3));
    store.insert(topic("t2", 1));
    store
}

fn web_host() -> MemoryHost {
    MemoryHost::new("https://study.example.com/")
}

// ============================================================================
// Boot Tests
// ============================================================================

#[test]
fn test_boot_on_empty_fragment_lands_home() {
    init_logging();
    let mut router = Router::new(web_host(), loaded_store());
    router.boot();

    assert_eq!(router.phase(), Phase::Idle);
    assert_eq!(router.current_view(), &View::Home);
    assert_eq!(router.io().read(), "#/");
    assert_eq!(router.nav_stack(), &["#/".to_string()]);
}

#[test]
fn test_boot_repairs_double_hash_arrival() {
    init_logging();
    let host = MemoryHost::with_fragment(
        "https://study.example.com/",
        "#/auth/callback#access_token=tok&type=recovery",
    );
    let mut router = Router::new(host, loaded_store());
    router.boot();

    assert_eq!(router.current_view(), &View::AuthCallback);
    let fragment = router.io().read();
    assert_eq!(fragment.matches('#').count(), 1);
    assert!(fragment.contains("access_token=tok"));
    assert!(fragment.contains("type=recovery"));
}

#[test]
fn test_boot_rewrites_path_based_auth_redirect() {
    init_logging();
    // OAuth provider redirected to a path URL instead of the hash scheme.
    let host = MemoryHost::new("https://study.example.com/auth/callback?code=abc123");
    let mut router = Router::new(host, loaded_store());
    router.boot();

    assert_eq!(router.current_view(), &View::AuthCallback);
    assert_eq!(router.io().read(), "#/auth/callback?code=abc123");
}

#[test]
fn test_boot_deep_linked_fragment_seeds_stack() {
    init_logging();
    let host = MemoryHost::with_fragment("https://study.example.com/", "#/quiz?id=t1");
    let mut router = Router::new(host, loaded_store());
    router.boot();

    assert_eq!(router.current_view(), &View::Quiz);
    assert_eq!(router.nav_stack(), &["#/quiz?id=t1".to_string()]);
}

// ============================================================================
// Canonicalization Tests
// ============================================================================

#[test]
fn test_list_alias_rewritten_to_canonical_form() {
    init_logging();
    let host = MemoryHost::with_fragment("https://study.example.com/", "#/topicList?type=due");
    let mut router = Router::new(host, loaded_store());
    let history_before = router.io().history_len();
    router.boot();

    // Rewritten in place via history-replace: no new entry.
    assert_eq!(router.io().read(), "#/list/due");
    assert_eq!(router.io().history_len(), history_before);
    assert_eq!(router.current_view(), &View::TopicList);
}

#[test]
fn test_alias_and_canonical_form_route_identically() {
    init_logging();
    let mut via_alias = Router::new(
        MemoryHost::with_fragment("https://study.example.com/", "#/topicList?type=due"),
        loaded_store(),
    );
    via_alias.boot();

    let mut via_path = Router::new(
        MemoryHost::with_fragment("https://study.example.com/", "#/list/due"),
        loaded_store(),
    );
    via_path.boot();

    assert_eq!(via_alias.current_view(), via_path.current_view());
    assert_eq!(via_alias.view_state(), via_path.view_state());
    assert_eq!(via_alias.io().read(), via_path.io().read());
}

#[test]
fn test_pass_is_idempotent() {
    init_logging();
    let mut router = Router::new(web_host(), loaded_store());
    router.boot();
    router.navigate_to(
        View::TopicList,
        Some(NavPayload::for_list(TopicFilter::Active)),
        NavigateOptions::default(),
    );

    let view = router.current_view().clone();
    let state = router.view_state().clone();
    let stack = router.nav_stack().to_vec();

    // A duplicate notification re-processes the same fragment.
    router.on_hash_change();
    router.on_hash_change();

    assert_eq!(router.current_view(), &view);
    assert_eq!(router.view_state(), &state);
    assert_eq!(router.nav_stack(), &stack[..]);
}

// ============================================================================
// Navigation Tests
// ============================================================================

#[test]
fn test_navigation_pushes_stack_in_order() {
    init_logging();
    let mut router = Router::new(web_host(), loaded_store());
    router.boot();

    router.navigate_to(
        View::TopicList,
        Some(NavPayload::for_list(TopicFilter::Due)),
        NavigateOptions::default(),
    );
    router.navigate_to(
        View::TopicDetail,
        Some(NavPayload::for_topic(topic("t1", 3))),
        NavigateOptions::default(),
    );

    assert_eq!(
        router.nav_stack(),
        &[
            "#/".to_string(),
            "#/list/due".to_string(),
            "#/topic?id=t1".to_string(),
        ]
    );
}

#[test]
fn test_back_to_back_navigation_never_duplicates_stack() {
    init_logging();
    let mut router = Router::new(web_host(), loaded_store());
    router.boot();

    for _ in 0..2 {
        router.navigate_to(
            View::TopicDetail,
            Some(NavPayload::for_topic(topic("t1", 3))),
            NavigateOptions::default(),
        );
    }

    assert_eq!(
        router.nav_stack(),
        &["#/".to_string(), "#/topic?id=t1".to_string()]
    );
}

#[test]
fn test_replace_navigation_does_not_grow_history() {
    init_logging();
    let mut router = Router::new(web_host(), loaded_store());
    router.boot();
    let history_before = router.io().history_len();

    router.navigate_to(View::Settings, None, NavigateOptions::replace());
    assert_eq!(router.io().history_len(), history_before);
    assert_eq!(router.current_view(), &View::Settings);
}

#[test]
fn test_quiz_review_navigation_encodes_zero_based_index() {
    init_logging();
    // Store deliberately missing t9: hydration must come from the payload.
    let mut router = Router::new(web_host(), loaded_store());
    router.boot();

    let reviewed = topic("t9", 3);
    router.navigate_to(
        View::QuizReview,
        Some(NavPayload::for_review(
            reviewed.clone(),
            reviewed.attempts[2].clone(),
            3,
        )),
        NavigateOptions::default(),
    );

    assert_eq!(router.io().read(), "#/quizReview?id=t9&repIndex=2");
    match router.view_state() {
        ViewState::QuizReview {
            topic_id,
            repetition_number,
            ..
        } => {
            assert_eq!(topic_id, "t9");
            assert_eq!(*repetition_number, 3);
        }
        other => panic!("unexpected view state: {:?}", other),
    }
}

#[test]
fn test_quiz_review_reload_hydrates_from_store() {
    init_logging();
    // Reload: same fragment, no payload. Hydration falls back to the
    // indexed lookup and reconstructs the same repetition number.
    let host = MemoryHost::with_fragment(
        "https://study.example.com/",
        "#/quizReview?id=t1&repIndex=2",
    );
    let mut router = Router::new(host, loaded_store());
    router.boot();

    match router.view_state() {
        ViewState::QuizReview {
            repetition_number,
            attempt,
            ..
        } => {
            assert_eq!(*repetition_number, 3);
            assert_eq!(attempt.repetition, 3);
        }
        other => panic!("unexpected view state: {:?}", other),
    }
}

// ============================================================================
// Deep-Link Tests
// ============================================================================

#[test]
fn test_query_and_fragment_deep_links_route_identically() {
    init_logging();
    let mut by_code = Router::new(web_host(), loaded_store());
    by_code.boot();
    assert!(by_code.handle_deep_link("https://study.example.com/?code=abc123"));

    let mut by_token = Router::new(web_host(), loaded_store());
    by_token.boot();
    assert!(by_token.handle_deep_link("https://study.example.com/#access_token=abc123"));

    assert_eq!(by_code.current_view(), &View::AuthCallback);
    assert_eq!(by_token.current_view(), &View::AuthCallback);
}

#[test]
fn test_custom_scheme_deep_link() {
    init_logging();
    let mut router = Router::new(web_host(), loaded_store());
    router.boot();

    assert!(router.handle_deep_link("studyapp://auth-callback?code=abc123"));
    assert_eq!(router.current_view(), &View::AuthCallback);
    assert_eq!(router.io().read(), "#/auth/callback?code=abc123");
}

#[test]
fn test_malformed_deep_link_is_ignored() {
    init_logging();
    let mut router = Router::new(web_host(), loaded_store());
    router.boot();

    assert!(!router.handle_deep_link("not a url at all"));
    assert!(!router.handle_deep_link("https://study.example.com/#/list/due"));
    assert_eq!(router.current_view(), &View::Home);
}

// ============================================================================
// Hardware Back Tests
// ============================================================================

#[test]
fn test_hardware_back_pops_to_previous_fragment() {
    init_logging();
    let mut router = Router::new(web_host(), loaded_store());
    router.boot();
    router.navigate_to(
        View::TopicList,
        Some(NavPayload::for_list(TopicFilter::Due)),
        NavigateOptions::default(),
    );
    router.navigate_to(
        View::TopicDetail,
        Some(NavPayload::for_topic(topic("t1", 3))),
        NavigateOptions::default(),
    );

    let action = router.handle_hardware_back();
    assert_eq!(
        action,
        BackAction::NavigatedBack {
            fragment: "#/list/due".to_string()
        }
    );
    assert_eq!(router.current_view(), &View::TopicList);
    assert_eq!(router.nav_stack().len(), 2);
}

#[test]
fn test_hardware_back_on_deep_link_falls_back_home() {
    init_logging();
    // Deep-linked straight into a sub-screen: no real prior history.
    let host = MemoryHost::with_fragment("https://study.example.com/", "#/quiz?id=t1");
    let mut router = Router::new(host, loaded_store());
    router.boot();

    let action = router.handle_hardware_back();
    assert_eq!(
        action,
        BackAction::NavigatedBack {
            fragment: "#/".to_string()
        }
    );
    assert_eq!(router.current_view(), &View::Home);
}

#[test]
fn test_hardware_back_closes_overlay_before_popping() {
    init_logging();
    let mut router = Router::new(web_host(), loaded_store());
    router.boot();
    router.navigate_to(View::Settings, None, NavigateOptions::default());
    assert!(router.overlay().settings_open());

    let action = router.handle_hardware_back();
    assert_eq!(action, BackAction::ClosedOverlay);
    assert!(!router.overlay().settings_open());
    // The stack was not touched.
    assert_eq!(router.nav_stack().len(), 2);
}

#[test]
fn test_hardware_back_closes_modal_first() {
    init_logging();
    let mut router = Router::new(web_host(), loaded_store());
    router.boot();

    // A native handler holds a clone of the overlay flags.
    let overlay = router.overlay();
    overlay.set_modal_open(true);

    assert_eq!(router.handle_hardware_back(), BackAction::ClosedOverlay);
    assert!(!overlay.modal_open());
}

#[test]
fn test_hardware_back_at_root_signals_exit() {
    init_logging();
    let mut router = Router::new(web_host(), loaded_store());
    router.boot();

    assert_eq!(router.handle_hardware_back(), BackAction::ExitApp);
}

// ============================================================================
// Environment Tests
// ============================================================================

#[test]
fn test_sandboxed_host_navigates_via_assignment() {
    init_logging();
    let mut host = web_host();
    host.set_embedded(true);
    host.reject_history_writes(true);

    let mut router = Router::new(host, loaded_store());
    router.boot();
    assert_eq!(router.environment(), Environment::Sandboxed);

    router.navigate_to(
        View::TopicList,
        Some(NavPayload::for_list(TopicFilter::Due)),
        NavigateOptions::default(),
    );

    // Every write went through direct assignment, none through history.
    assert!(router.io().assign_count() > 0);
    assert_eq!(router.current_view(), &View::TopicList);
    assert_eq!(router.io().read(), "#/list/due");
}

#[test]
fn test_history_rejection_falls_back_without_losing_navigation() {
    init_logging();
    // A normal-looking host whose history API still throws.
    let mut host = web_host();
    host.reject_history_writes(true);

    let mut router = Router::new(host, loaded_store());
    router.boot();
    assert_eq!(router.environment(), Environment::Normal);

    router.navigate_to(View::Settings, None, NavigateOptions::default());
    assert_eq!(router.current_view(), &View::Settings);
    assert!(router.io().assign_count() > 0);
}

// ============================================================================
// Hydration Tests
// ============================================================================

#[test]
fn test_detail_waits_for_data_then_rehydrates_once() {
    init_logging();
    let host = MemoryHost::with_fragment("https://study.example.com/", "#/topic?id=t1");
    let mut router = Router::new(host, MemoryStore::new());
    router.boot();

    assert!(router.view_state().is_loading());

    router.store_mut().insert(topic("t1", 3));
    router.store_mut().set_loaded(true);
    router.notify_data_ready();

    assert_eq!(
        router.view_state(),
        &ViewState::TopicDetail {
            topic_id: "t1".to_string()
        }
    );

    // The interest was consumed: further signals change nothing.
    router.notify_data_ready();
    assert_eq!(
        router.view_state(),
        &ViewState::TopicDetail {
            topic_id: "t1".to_string()
        }
    );
}

#[test]
fn test_missing_entity_is_terminal_after_load() {
    init_logging();
    let host = MemoryHost::with_fragment("https://study.example.com/", "#/topic?id=ghost");
    let mut router = Router::new(host, loaded_store());
    router.boot();

    assert!(router.view_state().is_failed());
}

#[test]
fn test_payload_absent_on_external_arrival() {
    init_logging();
    let mut router = Router::new(web_host(), loaded_store());
    router.boot();

    // Self-initiated navigation stashes a payload...
    router.navigate_to(
        View::TopicDetail,
        Some(NavPayload::for_topic(topic("t1", 3))),
        NavigateOptions::default(),
    );

    // ...but an external arrival at another topic must hit the store.
    router.io_mut().assign("#/topic?id=t2");
    router.on_hash_change();

    assert_eq!(
        router.view_state(),
        &ViewState::TopicDetail {
            topic_id: "t2".to_string()
        }
    );
}

#[test]
fn test_history_list_sorted_by_completion() {
    init_logging();
    let mut store = loaded_store();
    let mut done_early = topic("done-early", 0);
    done_early.completed_epoch = Some(100);
    let mut done_late = topic("done-late", 0);
    done_late.completed_epoch = Some(900);
    store.insert(done_early);
    store.insert(done_late);

    let host = MemoryHost::with_fragment("https://study.example.com/", "#/list/history");
    let mut router = Router::new(host, store);
    router.boot();

    assert_eq!(
        router.view_state(),
        &ViewState::TopicList {
            filter: TopicFilter::History,
            topic_ids: vec!["done-late".to_string(), "done-early".to_string()],
        }
    );
}

// ============================================================================
// Auth Flow Tests
// ============================================================================

#[test]
fn test_password_recovery_event_routes_to_reset() {
    init_logging();
    let mut router = Router::new(web_host(), loaded_store());
    router.boot();

    router.handle_auth_event(AuthEvent::PasswordRecovery);
    assert_eq!(router.current_view(), &View::ResetPassword);
    assert_eq!(router.io().read(), "#/resetPassword");
}

#[test]
fn test_second_malformed_redirect_after_boot_is_repaired() {
    init_logging();
    let mut router = Router::new(web_host(), loaded_store());
    router.boot();

    // Password-recovery flow delivers another double-hash after boot.
    router
        .io_mut()
        .assign("#/auth/callback#access_token=tok2&type=recovery");
    router.on_hash_change();

    assert_eq!(router.current_view(), &View::AuthCallback);
    assert_eq!(router.io().read().matches('#').count(), 1);
}
