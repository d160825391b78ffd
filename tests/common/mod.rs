//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use router_store::{loader_fn, AuthCheck, Authenticate, RouterState, RouterStore, ViewLoader};

/// Views are plain labels; the crate never looks inside them.
pub type TestView = &'static str;

/// Authenticator that settles with `verdict` after `delay_ms`.
pub fn auth_after(delay_ms: u64, verdict: bool) -> impl Authenticate {
    move || {
        AuthCheck::deferred(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            Ok(verdict)
        })
    }
}

/// Authenticator whose deferred check rejects after `delay_ms`.
pub fn auth_error_after(delay_ms: u64, message: &'static str) -> impl Authenticate {
    move || {
        AuthCheck::deferred(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            Err(message.into())
        })
    }
}

/// Loader that produces `view` after `delay_ms`.
pub fn load_after(delay_ms: u64, view: TestView) -> impl ViewLoader<TestView> {
    loader_fn(move || async move {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        Ok(view)
    })
}

/// Loader that rejects after `delay_ms`.
pub fn load_error_after(delay_ms: u64, message: &'static str) -> impl ViewLoader<TestView> {
    loader_fn(move || async move {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        Err(message.into())
    })
}

/// Record every snapshot the store publishes, starting with the one
/// delivered at subscribe time.
pub fn record(store: &RouterStore<TestView>) -> Arc<Mutex<Vec<RouterState<TestView>>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    store.subscribe(move |state| sink.lock().unwrap().push(state.clone()));
    log
}

/// Wait long enough for any fixture-scheduled deferred work to settle.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(200)).await;
}
