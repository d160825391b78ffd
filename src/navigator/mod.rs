//! Navigation engine.
//!
//! # Data Flow
//! ```text
//! redirect(pathname) / set_routes(..) / sync(pathname)
//!     → routing scan (synchronous)
//!     → auth gate: pass / deny / redirect / defer
//!     → view resolution: direct handle, named reference, or lazy load
//!     → commit snapshot → subscribers notified
//!     → deferred auth / lazy load settles later
//!     → guarded patch → subscribers notified again
//! ```
//!
//! # Design Decisions
//! - The synchronous portion commits before any continuation is
//!   spawned, so the first snapshot of a navigation is always observed
//!   before its settle patches
//! - Continuation failures become state, never a caller error
//! - Every navigation is stamped with a sequence number; by default a
//!   patch from a superseded navigation is dropped

pub mod history;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::error::{BoxError, NavigationError};
use crate::navigator::history::{History, NullHistory};
use crate::routing::scanner::{scan, Matched};
use crate::routing::table::{lint_table, AuthCheck, Fallback, MetadataRoute, Route, ViewLoader, ViewRef};
use crate::store::state::{AuthStatus, LoadingStatus, RouterState};
use crate::store::{StateStore, SubscriptionId};

/// Bound on chained auth redirects within one navigation.
const MAX_REDIRECT_DEPTH: usize = 5;

/// What to do with a patch arriving from a superseded navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    /// Drop the patch.
    #[default]
    Discard,
    /// Apply it anyway, reproducing the historical behavior.
    Apply,
}

/// What a navigation decided to put in the view slot.
enum Shown<V> {
    Nothing,
    View(V),
    Named(String),
}

impl<V: Clone> Shown<V> {
    fn of(view: &ViewRef<V>) -> Self {
        match view {
            ViewRef::Handle(v) => Shown::View(v.clone()),
            ViewRef::Named(name) => Shown::Named(name.clone()),
        }
    }

    fn from_fallback(fallback: &Fallback<V>, inherited: Option<&ViewRef<V>>) -> Self {
        match fallback {
            Fallback::Hidden => Shown::Nothing,
            Fallback::View(v) => Shown::View(v.clone()),
            Fallback::Named(name) => Shown::Named(name.clone()),
            Fallback::Inherit => inherited.map(Shown::of).unwrap_or(Shown::Nothing),
        }
    }

    fn apply(self, state: &mut RouterState<V>) {
        match self {
            Shown::Nothing => {
                state.view = None;
                state.view_name = None;
            }
            Shown::View(v) => {
                state.view = Some(v);
                state.view_name = None;
            }
            Shown::Named(name) => {
                state.view = None;
                state.view_name = Some(name);
            }
        }
    }
}

/// View-resolution work for the winning route, resolved against the
/// metadata defaults in effect at scan time. Replayed by the deferred
/// auth continuation when the gate eventually allows showing.
struct ViewPlan<V> {
    shown: Shown<V>,
    loader: Option<Arc<dyn ViewLoader<V>>>,
}

impl<V: Clone> ViewPlan<V> {
    fn for_target(target: &Matched<'_, V>, metadata: Option<&MetadataRoute<V>>) -> Self {
        match target {
            Matched::View(r) => ViewPlan {
                shown: Shown::of(&r.view),
                loader: None,
            },
            Matched::Lazy(r) => ViewPlan {
                shown: Shown::from_fallback(
                    &r.loading,
                    metadata.and_then(|m| m.default_loading.as_ref()),
                ),
                loader: Some(r.loader.clone()),
            },
        }
    }
}

/// Outcome of the synchronous half of the auth protocol.
enum Gate<V> {
    /// No gate, or it passed synchronously: show the view now.
    Allowed(ViewPlan<V>),
    /// Denied synchronously with no redirect configured.
    Denied(Shown<V>),
    /// Verdict outstanding; the plan is replayed when it lands.
    Pending {
        shown: Shown<V>,
        verdict: BoxFuture<'static, Result<bool, BoxError>>,
        redirect_to: Option<String>,
        plan: ViewPlan<V>,
    },
}

struct Inner<V> {
    store: StateStore<V>,
    history: Box<dyn History>,
    stale_policy: StalePolicy,
    sequence: AtomicU64,
}

/// The navigation state machine and its observable store.
///
/// Cheap to clone; all clones share one store. Deferred authenticators
/// and lazy loaders are driven on the ambient tokio runtime, so
/// navigation over a table that contains them must happen inside one.
pub struct RouterStore<V> {
    inner: Arc<Inner<V>>,
}

impl<V> Clone for RouterStore<V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Configures a [`RouterStore`] before the initial snapshot exists.
pub struct RouterStoreBuilder {
    history: Box<dyn History>,
    stale_policy: StalePolicy,
}

impl Default for RouterStoreBuilder {
    fn default() -> Self {
        Self {
            history: Box::new(NullHistory),
            stale_policy: StalePolicy::default(),
        }
    }
}

impl RouterStoreBuilder {
    /// Record navigation in `history` instead of discarding it.
    pub fn history(mut self, history: impl History + 'static) -> Self {
        self.history = Box::new(history);
        self
    }

    /// Choose what happens to patches from superseded navigations.
    pub fn stale_policy(mut self, policy: StalePolicy) -> Self {
        self.stale_policy = policy;
        self
    }

    /// Build the store with an empty table at `initial_pathname`.
    pub fn build<V: Clone + Send + Sync + 'static>(
        self,
        initial_pathname: impl Into<String>,
    ) -> RouterStore<V> {
        RouterStore {
            inner: Arc::new(Inner {
                store: StateStore::new(RouterState::initial(initial_pathname)),
                history: self.history,
                stale_policy: self.stale_policy,
                sequence: AtomicU64::new(0),
            }),
        }
    }
}

impl<V: Clone + Send + Sync + 'static> RouterStore<V> {
    /// Store with no history backend and the default stale policy.
    pub fn new(initial_pathname: impl Into<String>) -> Self {
        Self::builder().build(initial_pathname)
    }

    pub fn builder() -> RouterStoreBuilder {
        RouterStoreBuilder::default()
    }

    /// Current snapshot, lock-free.
    pub fn snapshot(&self) -> Arc<RouterState<V>> {
        self.inner.store.get()
    }

    /// Register `callback`: it receives the current snapshot immediately
    /// and then every subsequent change.
    pub fn subscribe(
        &self,
        callback: impl Fn(&RouterState<V>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.inner.store.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.store.unsubscribe(id);
    }

    /// Apply an external patch through the serialized commit path.
    ///
    /// Unlike a navigation this does not advance the sequence stamp, so
    /// it never invalidates outstanding auth/load continuations.
    pub fn update(&self, mutate: impl FnOnce(&mut RouterState<V>)) {
        self.inner.store.commit(mutate);
    }

    /// Install a new route table and render `pathname` against it.
    pub fn set_routes(&self, routes: Vec<Route<V>>, pathname: impl Into<String>) {
        let pathname = pathname.into();
        let findings = lint_table(&routes);
        if findings > 0 {
            tracing::warn!(findings, "route table installed with lint findings");
        }
        self.render(&pathname, Some(routes.into()), 0);
    }

    /// Navigate to `pathname`, recording it in history.
    pub fn redirect(&self, pathname: &str, replace: bool) {
        if replace {
            self.inner.history.replace(pathname);
        } else {
            self.inner.history.push(pathname);
        }
        self.render(pathname, None, 0);
    }

    /// Re-render for a pathname the host history has already moved to
    /// (back/forward traversal).
    pub fn sync(&self, pathname: &str) {
        self.render(pathname, None, 0);
    }

    fn render(&self, pathname: &str, new_routes: Option<Arc<[Route<V>]>>, depth: usize) {
        let sequence = self.inner.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let table_swapped = new_routes.is_some();
        let routes = new_routes.unwrap_or_else(|| self.inner.store.get().routes.clone());

        let resolution = scan(pathname, &routes);
        tracing::debug!(
            pathname,
            matched = resolution.route.is_some(),
            sequence,
            "navigation scan"
        );

        let Some((index, target)) = resolution.route else {
            // No route and no wildcard: the pathname moves, everything
            // else survives as-is.
            let pathname = pathname.to_string();
            let routes = routes.clone();
            self.inner.store.commit(move |state| {
                state.pathname = pathname;
                state.sequence = sequence;
                if table_swapped {
                    state.routes = routes;
                    state.active_route = None;
                }
            });
            return;
        };

        let metadata = resolution.metadata;
        let plan = ViewPlan::for_target(&target, metadata);

        // The authenticator itself always runs synchronously during the
        // render; only its verdict may be deferred.
        let gate = match target.auth() {
            None => Gate::Allowed(plan),
            Some(gate) => match gate.authenticator.check() {
                AuthCheck::Ready(true) => Gate::Allowed(plan),
                AuthCheck::Ready(false) => {
                    if let Some(to) = gate.redirect_to.clone() {
                        if depth < MAX_REDIRECT_DEPTH {
                            tracing::debug!(from = pathname, to = %to, "auth denied, redirecting");
                            self.inner.history.replace(&to);
                            self.render(&to, table_swapped.then(|| routes.clone()), depth + 1);
                            return;
                        }
                        tracing::warn!(pathname, "auth redirect depth exceeded, surfacing denial");
                    }
                    // A synchronous denial shows only the gate's own
                    // placeholder; the metadata default does not apply.
                    Gate::Denied(Shown::from_fallback(&gate.fallback, None))
                }
                AuthCheck::Deferred(verdict) => Gate::Pending {
                    shown: Shown::from_fallback(
                        &gate.fallback,
                        metadata.and_then(|m| m.default_auth_view.as_ref()),
                    ),
                    verdict,
                    redirect_to: gate.redirect_to.clone(),
                    plan,
                },
            },
        };

        let pathname = pathname.to_string();
        let params = resolution.params;
        let layout = resolution.layout.map(|l| l.view.clone());
        let routes_for_state = routes.clone();
        let base = move |state: &mut RouterState<V>| {
            state.pathname = pathname;
            state.params = params;
            state.routes = routes_for_state;
            state.active_route = Some(index);
            state.layout = layout;
            state.error = None;
            state.sequence = sequence;
        };

        match gate {
            Gate::Allowed(ViewPlan { shown, loader }) => {
                let pending = loader.is_some();
                self.inner.store.commit(move |state| {
                    base(state);
                    state.auth_status = AuthStatus::None;
                    state.loading_status = if pending {
                        LoadingStatus::Pending
                    } else {
                        LoadingStatus::None
                    };
                    shown.apply(state);
                });
                if let Some(loader) = loader {
                    self.spawn_loader(sequence, loader);
                }
            }
            Gate::Denied(shown) => {
                self.inner.store.commit(move |state| {
                    base(state);
                    state.auth_status = AuthStatus::Fail;
                    state.loading_status = LoadingStatus::None;
                    shown.apply(state);
                });
            }
            Gate::Pending {
                shown,
                verdict,
                redirect_to,
                plan,
            } => {
                self.inner.store.commit(move |state| {
                    base(state);
                    state.auth_status = AuthStatus::Pending;
                    state.loading_status = LoadingStatus::None;
                    shown.apply(state);
                });
                self.spawn_auth(sequence, verdict, redirect_to, plan);
            }
        }
    }

    fn spawn_auth(
        &self,
        sequence: u64,
        verdict: BoxFuture<'static, Result<bool, BoxError>>,
        redirect_to: Option<String>,
        plan: ViewPlan<V>,
    ) {
        let this = self.clone();
        tokio::spawn(async move {
            match verdict.await {
                Ok(true) => {
                    let ViewPlan { shown, loader } = plan;
                    let pending = loader.is_some();
                    let applied = this.patch(sequence, "auth settle", move |state| {
                        state.auth_status = AuthStatus::None;
                        state.loading_status = if pending {
                            LoadingStatus::Pending
                        } else {
                            LoadingStatus::None
                        };
                        shown.apply(state);
                    });
                    if applied {
                        if let Some(loader) = loader {
                            this.spawn_loader(sequence, loader);
                        }
                    }
                }
                Ok(false) => match redirect_to {
                    Some(to) => {
                        if this.should_apply(sequence, "auth redirect") {
                            tracing::debug!(to = %to, "deferred auth denied, redirecting");
                            this.redirect(&to, true);
                        }
                    }
                    None => {
                        this.patch(sequence, "auth verdict", |state| {
                            state.auth_status = AuthStatus::Fail;
                        });
                    }
                },
                Err(error) => {
                    tracing::error!(error = %error, "authentication check failed");
                    this.patch(sequence, "auth verdict", move |state| {
                        state.auth_status = AuthStatus::Error;
                        state.error = Some(NavigationError::auth(error));
                    });
                }
            }
        });
    }

    fn spawn_loader(&self, sequence: u64, loader: Arc<dyn ViewLoader<V>>) {
        let this = self.clone();
        let load = loader.load();
        tokio::spawn(async move {
            match load.await {
                Ok(view) => {
                    this.patch(sequence, "lazy settle", move |state| {
                        state.view = Some(view);
                        state.view_name = None;
                        state.loading_status = LoadingStatus::None;
                    });
                }
                Err(error) => {
                    tracing::error!(error = %error, "lazy view load failed");
                    this.patch(sequence, "lazy settle", move |state| {
                        state.loading_status = LoadingStatus::Error;
                        state.error = Some(NavigationError::load(error));
                    });
                }
            }
        });
    }

    /// Apply a continuation patch unless it is stale under the policy.
    fn patch(
        &self,
        sequence: u64,
        label: &'static str,
        mutate: impl FnOnce(&mut RouterState<V>),
    ) -> bool {
        if !self.should_apply(sequence, label) {
            return false;
        }
        self.inner.store.commit(mutate);
        true
    }

    fn should_apply(&self, sequence: u64, label: &'static str) -> bool {
        if self.inner.store.get().sequence == sequence {
            return true;
        }
        match self.inner.stale_policy {
            StalePolicy::Discard => {
                tracing::debug!(label, sequence, "discarding stale continuation");
                false
            }
            StalePolicy::Apply => true,
        }
    }
}
