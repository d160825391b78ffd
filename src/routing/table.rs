//! Route table model.
//!
//! # Responsibilities
//! - Represent one table entry per route kind (view, lazy, layout, metadata)
//! - Carry the optional authentication capability on navigable routes
//! - Lint an installed table for authoring mistakes
//!
//! # Design Decisions
//! - Entries are classified once, at construction; the scanner never
//!   inspects shapes at runtime
//! - A view reference is either a direct handle or a name the host
//!   resolves against its own registry
//! - Placeholders distinguish "unset, inherit the metadata default"
//!   from "explicitly show nothing"

use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::error::BoxError;

/// Path pattern that turns a view route into the not-found fallback.
pub const WILDCARD: &str = "**";

/// Reference to a view: the handle itself, or a name resolved externally.
#[derive(Clone)]
pub enum ViewRef<V> {
    /// The view value, usable directly by the rendering layer.
    Handle(V),
    /// A name the rendering layer resolves against a named-slot registry.
    Named(String),
}

impl<V> ViewRef<V> {
    /// Reference a view by name.
    pub fn named(name: impl Into<String>) -> Self {
        ViewRef::Named(name.into())
    }
}

impl<V> fmt::Debug for ViewRef<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewRef::Handle(_) => f.write_str("ViewRef::Handle"),
            ViewRef::Named(name) => f.debug_tuple("ViewRef::Named").field(name).finish(),
        }
    }
}

/// Placeholder shown while a gate or load is outstanding.
#[derive(Clone)]
pub enum Fallback<V> {
    /// No explicit choice; the metadata default applies if one exists.
    Inherit,
    /// Explicitly show nothing while waiting.
    Hidden,
    /// Show this view.
    View(V),
    /// Expose this name for the host to resolve.
    Named(String),
}

impl<V> fmt::Debug for Fallback<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fallback::Inherit => f.write_str("Fallback::Inherit"),
            Fallback::Hidden => f.write_str("Fallback::Hidden"),
            Fallback::View(_) => f.write_str("Fallback::View"),
            Fallback::Named(name) => f.debug_tuple("Fallback::Named").field(name).finish(),
        }
    }
}

/// Outcome of invoking an authentication check.
pub enum AuthCheck {
    /// The check concluded synchronously.
    Ready(bool),
    /// The check is outstanding; the future settles with the verdict.
    Deferred(BoxFuture<'static, Result<bool, BoxError>>),
}

impl AuthCheck {
    /// Wrap a future resolving to the verdict.
    pub fn deferred<F>(fut: F) -> Self
    where
        F: Future<Output = Result<bool, BoxError>> + Send + 'static,
    {
        AuthCheck::Deferred(Box::pin(fut))
    }
}

/// Authentication check attached to a route.
pub trait Authenticate: Send + Sync {
    /// Run the check for the navigation currently being rendered.
    fn check(&self) -> AuthCheck;
}

impl<F> Authenticate for F
where
    F: Fn() -> AuthCheck + Send + Sync,
{
    fn check(&self) -> AuthCheck {
        self()
    }
}

/// Asynchronous producer of a route's view.
pub trait ViewLoader<V>: Send + Sync {
    /// Start (or restart) the load; each navigation calls this afresh.
    fn load(&self) -> BoxFuture<'static, Result<V, BoxError>>;
}

impl<V, F> ViewLoader<V> for F
where
    F: Fn() -> BoxFuture<'static, Result<V, BoxError>> + Send + Sync,
{
    fn load(&self) -> BoxFuture<'static, Result<V, BoxError>> {
        self()
    }
}

/// Wrap an async closure as a [`ViewLoader`].
pub fn loader_fn<V, F, Fut>(f: F) -> impl ViewLoader<V>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<V, BoxError>> + Send + 'static,
{
    FnLoader(f)
}

struct FnLoader<F>(F);

impl<V, F, Fut> ViewLoader<V> for FnLoader<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<V, BoxError>> + Send + 'static,
{
    fn load(&self) -> BoxFuture<'static, Result<V, BoxError>> {
        Box::pin((self.0)())
    }
}

/// Authentication capability composable onto view and lazy routes.
#[derive(Clone)]
pub struct AuthGate<V> {
    /// The check to run on every navigation to the route.
    pub authenticator: Arc<dyn Authenticate>,
    /// Shown while a deferred check is outstanding, or after a denial.
    pub fallback: Fallback<V>,
    /// Replace-navigate here when the check resolves false.
    pub redirect_to: Option<String>,
}

impl<V> AuthGate<V> {
    /// Gate guarded by `authenticator`, with no placeholder or redirect.
    pub fn new(authenticator: impl Authenticate + 'static) -> Self {
        Self {
            authenticator: Arc::new(authenticator),
            fallback: Fallback::Inherit,
            redirect_to: None,
        }
    }

    /// Set the placeholder shown while the gate is unresolved.
    pub fn fallback(mut self, fallback: Fallback<V>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Navigate here (replace semantics) when the check resolves false.
    pub fn redirect(mut self, path: impl Into<String>) -> Self {
        self.redirect_to = Some(path.into());
        self
    }
}

/// Route whose view is available immediately.
#[derive(Clone)]
pub struct ViewRoute<V> {
    pub path: String,
    pub view: ViewRef<V>,
    pub auth: Option<AuthGate<V>>,
}

/// Route whose view is produced asynchronously on first navigation.
#[derive(Clone)]
pub struct LazyRoute<V> {
    pub path: String,
    pub loader: Arc<dyn ViewLoader<V>>,
    pub loading: Fallback<V>,
    pub auth: Option<AuthGate<V>>,
}

/// Wrapping shell applied to a contiguous run of subsequent routes.
#[derive(Clone)]
pub struct LayoutRoute<V> {
    pub view: V,
    /// Applies to the next `scope` non-layout, non-metadata entries;
    /// `None` means until the next layout route or the end of the table.
    pub scope: Option<usize>,
}

/// Defaults applied to routes that do not specify their own placeholders.
#[derive(Clone)]
pub struct MetadataRoute<V> {
    pub default_loading: Option<ViewRef<V>>,
    pub default_auth_view: Option<ViewRef<V>>,
}

// Manual impls: derived bounds would demand `V: Default` even though no
// view value is ever conjured from nothing.
impl<V> Default for Fallback<V> {
    fn default() -> Self {
        Fallback::Inherit
    }
}

impl<V> Default for MetadataRoute<V> {
    fn default() -> Self {
        Self {
            default_loading: None,
            default_auth_view: None,
        }
    }
}

/// One entry in the ordered route table.
///
/// Order is semantics: the first matching entry wins, and layout and
/// metadata entries apply to what follows them.
#[derive(Clone)]
pub enum Route<V> {
    View(ViewRoute<V>),
    Lazy(LazyRoute<V>),
    Layout(LayoutRoute<V>),
    Metadata(MetadataRoute<V>),
}

impl<V> Route<V> {
    /// Route showing `view` at `path`.
    pub fn view(path: impl Into<String>, view: V) -> Self {
        Route::View(ViewRoute {
            path: path.into(),
            view: ViewRef::Handle(view),
            auth: None,
        })
    }

    /// Route exposing `name` at `path` for the host to resolve.
    pub fn named_view(path: impl Into<String>, name: impl Into<String>) -> Self {
        Route::View(ViewRoute {
            path: path.into(),
            view: ViewRef::Named(name.into()),
            auth: None,
        })
    }

    /// Route whose view `loader` produces asynchronously.
    pub fn lazy(path: impl Into<String>, loader: impl ViewLoader<V> + 'static) -> Self {
        Route::Lazy(LazyRoute {
            path: path.into(),
            loader: Arc::new(loader),
            loading: Fallback::Inherit,
            auth: None,
        })
    }

    /// Layout applied until the next layout route or the end of the table.
    pub fn layout(view: V) -> Self {
        Route::Layout(LayoutRoute { view, scope: None })
    }

    /// Layout applied to the next `scope` navigable entries only.
    pub fn layout_scoped(view: V, scope: usize) -> Self {
        Route::Layout(LayoutRoute {
            view,
            scope: Some(scope),
        })
    }

    /// Metadata entry carrying defaults for subsequent routes.
    pub fn metadata() -> Self {
        Route::Metadata(MetadataRoute::default())
    }

    /// Attach an authentication gate (view and lazy routes only).
    pub fn auth(mut self, gate: AuthGate<V>) -> Self {
        match &mut self {
            Route::View(r) => r.auth = Some(gate),
            Route::Lazy(r) => r.auth = Some(gate),
            // Layout and metadata entries are never match targets.
            Route::Layout(_) | Route::Metadata(_) => {}
        }
        self
    }

    /// Set the loading placeholder (lazy routes only).
    pub fn loading(mut self, loading: Fallback<V>) -> Self {
        if let Route::Lazy(r) = &mut self {
            r.loading = loading;
        }
        self
    }

    /// Set the default loading placeholder (metadata entries only).
    pub fn default_loading(mut self, view: ViewRef<V>) -> Self {
        if let Route::Metadata(m) = &mut self {
            m.default_loading = Some(view);
        }
        self
    }

    /// Set the default auth placeholder (metadata entries only).
    pub fn default_auth_view(mut self, view: ViewRef<V>) -> Self {
        if let Route::Metadata(m) = &mut self {
            m.default_auth_view = Some(view);
        }
        self
    }

    /// The entry's path pattern, for navigable entries.
    pub fn path(&self) -> Option<&str> {
        match self {
            Route::View(r) => Some(r.path.as_str()),
            Route::Lazy(r) => Some(r.path.as_str()),
            Route::Layout(_) | Route::Metadata(_) => None,
        }
    }
}

impl<V> fmt::Debug for Route<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::View(r) => f.debug_struct("Route::View").field("path", &r.path).finish(),
            Route::Lazy(r) => f.debug_struct("Route::Lazy").field("path", &r.path).finish(),
            Route::Layout(l) => f
                .debug_struct("Route::Layout")
                .field("scope", &l.scope)
                .finish(),
            Route::Metadata(_) => f.write_str("Route::Metadata"),
        }
    }
}

/// Non-fatal authoring checks run when a table is installed.
///
/// Findings are reported through `tracing::warn!`; the table is used as
/// given either way. Returns the number of findings.
pub(crate) fn lint_table<V>(routes: &[Route<V>]) -> usize {
    let mut findings = 0;
    let mut seen = HashSet::new();
    let mut wildcard_seen = false;

    for (index, route) in routes.iter().enumerate() {
        match route {
            Route::View(r) if r.path == WILDCARD => {
                if wildcard_seen {
                    tracing::warn!(index, "duplicate wildcard route is unreachable");
                    findings += 1;
                }
                wildcard_seen = true;
            }
            Route::Lazy(r) if r.path == WILDCARD => {
                tracing::warn!(index, "wildcard pattern on a lazy route never acts as the not-found fallback");
                findings += 1;
            }
            Route::View(_) | Route::Lazy(_) => {
                let path = route.path().unwrap_or("");
                if path.is_empty() {
                    tracing::warn!(index, "route has an empty path pattern");
                    findings += 1;
                }
                if !seen.insert(path.to_string()) {
                    tracing::warn!(index, path, "duplicate route pattern is unreachable");
                    findings += 1;
                }
            }
            Route::Layout(l) => {
                if let Some(scope) = l.scope {
                    let remaining = routes[index + 1..]
                        .iter()
                        .filter(|r| matches!(r, Route::View(_) | Route::Lazy(_)))
                        .count();
                    if scope > remaining {
                        tracing::warn!(
                            index,
                            scope,
                            remaining,
                            "layout scope extends past the end of the table"
                        );
                        findings += 1;
                    }
                }
            }
            Route::Metadata(_) => {}
        }
    }
    findings
}
