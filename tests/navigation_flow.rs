//! End-to-end navigation flows: matching, placeholders, history sync.

mod common;

use std::sync::Arc;

use common::TestView;
use router_store::{
    AuthStatus, Fallback, LoadingStatus, MemoryHistory, Route, RouterStore, ViewRef, WILDCARD,
};

fn store() -> RouterStore<TestView> {
    RouterStore::new("/")
}

#[tokio::test]
async fn test_initial_state_is_empty() {
    let store = store();
    let state = store.snapshot();
    assert_eq!(state.pathname, "/");
    assert_eq!(state.view, None);
    assert_eq!(state.auth_status, AuthStatus::None);
    assert_eq!(state.loading_status, LoadingStatus::None);
    assert!(state.routes.is_empty());
}

#[tokio::test]
async fn test_param_route_navigation() {
    let store = store();
    store.set_routes(vec![Route::view("/foo/:id", "A")], "/foo/42");
    let state = store.snapshot();
    assert_eq!(state.params.get("id"), Some(&"42".to_string()));
    assert_eq!(state.view, Some("A"));
    assert_eq!(state.auth_status, AuthStatus::None);
}

#[tokio::test]
async fn test_wildcard_used_only_without_better_match() {
    let store = store();
    store.set_routes(
        vec![
            Route::view(WILDCARD, "not-found"),
            Route::view("/real", "real"),
        ],
        "/real",
    );
    assert_eq!(store.snapshot().view, Some("real"));

    store.redirect("/nope", false);
    assert_eq!(store.snapshot().view, Some("not-found"));
}

#[tokio::test]
async fn test_lazy_route_with_explicit_loading_placeholder() {
    let store = store();
    store.set_routes(
        vec![Route::lazy("/lazy", common::load_after(50, "lazy-view"))
            .loading(Fallback::View("spinner"))],
        "/lazy",
    );

    let state = store.snapshot();
    assert_eq!(state.view, Some("spinner"));
    assert_eq!(state.loading_status, LoadingStatus::Pending);

    common::settle().await;
    let state = store.snapshot();
    assert_eq!(state.view, Some("lazy-view"));
    assert_eq!(state.loading_status, LoadingStatus::None);
}

#[tokio::test]
async fn test_lazy_route_falls_back_to_metadata_default_loading() {
    let store = store();
    store.set_routes(
        vec![
            Route::metadata().default_loading(ViewRef::Handle("default-spinner")),
            Route::lazy("/lazy", common::load_after(50, "lazy-view")),
        ],
        "/lazy",
    );

    let state = store.snapshot();
    assert_eq!(state.view, Some("default-spinner"));
    assert_eq!(state.loading_status, LoadingStatus::Pending);

    common::settle().await;
    assert_eq!(store.snapshot().view, Some("lazy-view"));
}

#[tokio::test]
async fn test_lazy_route_hidden_loading_shows_nothing() {
    let store = store();
    store.set_routes(
        vec![
            Route::metadata().default_loading(ViewRef::Handle("default-spinner")),
            Route::lazy("/lazy", common::load_after(50, "lazy-view")).loading(Fallback::Hidden),
        ],
        "/lazy",
    );

    let state = store.snapshot();
    assert_eq!(state.view, None);
    assert_eq!(state.loading_status, LoadingStatus::Pending);
}

#[tokio::test]
async fn test_named_loading_placeholder_exposed_to_host() {
    let store = store();
    store.set_routes(
        vec![Route::lazy("/lazy", common::load_after(50, "lazy-view"))
            .loading(Fallback::Named("spinner-slot".into()))],
        "/lazy",
    );

    let state = store.snapshot();
    assert_eq!(state.view, None);
    assert_eq!(state.view_name.as_deref(), Some("spinner-slot"));

    common::settle().await;
    let state = store.snapshot();
    assert_eq!(state.view, Some("lazy-view"));
    assert_eq!(state.view_name, None, "resolved view clears the name");
}

#[tokio::test]
async fn test_layout_wraps_scoped_run_of_routes() {
    let store = store();
    store.set_routes(
        vec![
            Route::layout_scoped("shell", 2),
            Route::view("/a", "a"),
            Route::view("/b", "b"),
            Route::view("/c", "c"),
        ],
        "/b",
    );
    assert_eq!(store.snapshot().layout, Some("shell"));

    store.redirect("/c", false);
    let state = store.snapshot();
    assert_eq!(state.view, Some("c"));
    assert_eq!(state.layout, None, "scope window is spent before /c");
}

#[tokio::test]
async fn test_history_back_and_forward_resync() {
    let history = Arc::new(MemoryHistory::new("/a"));
    let store: RouterStore<TestView> = RouterStore::<TestView>::builder().history(history.clone()).build("/a");
    store.set_routes(
        vec![Route::view("/a", "a"), Route::view("/b", "b")],
        "/a",
    );

    store.redirect("/b", false);
    assert_eq!(store.snapshot().view, Some("b"));

    // The host observes the platform's pop event and resyncs.
    let back_to = history.back().expect("one entry behind");
    store.sync(&back_to);
    assert_eq!(store.snapshot().pathname, "/a");
    assert_eq!(store.snapshot().view, Some("a"));

    let forward_to = history.forward().expect("one entry ahead");
    store.sync(&forward_to);
    assert_eq!(store.snapshot().view, Some("b"));
}

#[tokio::test]
async fn test_replace_redirect_leaves_no_back_entry() {
    let history = Arc::new(MemoryHistory::new("/a"));
    let store: RouterStore<TestView> = RouterStore::<TestView>::builder().history(history.clone()).build("/a");
    store.set_routes(
        vec![Route::view("/a", "a"), Route::view("/b", "b")],
        "/a",
    );

    store.redirect("/b", true);
    assert_eq!(history.len(), 1);
    assert_eq!(history.current(), "/b");
    assert_eq!(history.back(), None);
}

#[tokio::test]
async fn test_subscriber_notified_once_per_plain_navigation() {
    let store = store();
    store.set_routes(vec![Route::view("/a", "a"), Route::view("/b", "b")], "/a");

    let log = common::record(&store);
    store.redirect("/b", false);
    common::settle().await;

    let log = log.lock().unwrap();
    // One snapshot at subscribe time, one for the navigation; a static
    // route has nothing to settle later.
    assert_eq!(log.len(), 2);
    assert_eq!(log[1].view, Some("b"));
}
