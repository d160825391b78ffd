//! Navigation state snapshot.
//!
//! # Design Decisions
//! - One immutable value describes everything the rendering layer needs
//! - Snapshots are replaced wholesale per navigation and patched field
//!   by field as deferred auth/load work settles
//! - The route table travels inside the snapshot so reads never race a
//!   table swap

use std::fmt;
use std::sync::Arc;

use crate::error::NavigationError;
use crate::routing::matcher::Params;
use crate::routing::table::Route;

/// Authentication progress for the current navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStatus {
    /// No gate on the route, or the gate passed.
    #[default]
    None,
    /// A deferred check is outstanding.
    Pending,
    /// The check resolved false.
    Fail,
    /// The check rejected.
    Error,
}

impl AuthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthStatus::None => "none",
            AuthStatus::Pending => "pending",
            AuthStatus::Fail => "fail",
            AuthStatus::Error => "error",
        }
    }
}

impl fmt::Display for AuthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lazy-load progress for the current navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadingStatus {
    /// Nothing outstanding.
    #[default]
    None,
    /// A lazy loader is outstanding.
    Pending,
    /// The loader rejected.
    Error,
}

impl LoadingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadingStatus::None => "none",
            LoadingStatus::Pending => "pending",
            LoadingStatus::Error => "error",
        }
    }
}

impl fmt::Display for LoadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable snapshot of what the router is showing.
#[derive(Clone)]
pub struct RouterState<V> {
    /// The pathname last navigated to.
    pub pathname: String,
    /// Parameters bound by the winning route's pattern.
    pub params: Params,
    /// The view to show: the resolved handle, or a placeholder while
    /// auth or loading is outstanding.
    pub view: Option<V>,
    /// Name of the view for the host to resolve, when the route (or its
    /// placeholder) referenced one by name instead of by handle.
    pub view_name: Option<String>,
    /// The active layout's view, if a layout entry covers the route.
    pub layout: Option<V>,
    /// Authentication progress.
    pub auth_status: AuthStatus,
    /// Lazy-load progress.
    pub loading_status: LoadingStatus,
    /// Last deferred failure, for the host to display.
    pub error: Option<NavigationError>,
    /// Index of the winning route in the table.
    pub active_route: Option<usize>,
    /// The installed route table.
    pub routes: Arc<[Route<V>]>,
    /// Stamp of the navigation that produced this snapshot.
    pub(crate) sequence: u64,
}

impl<V> RouterState<V> {
    pub(crate) fn initial(pathname: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            params: Params::new(),
            view: None,
            view_name: None,
            layout: None,
            auth_status: AuthStatus::None,
            loading_status: LoadingStatus::None,
            error: None,
            active_route: None,
            routes: Arc::from(Vec::new()),
            sequence: 0,
        }
    }

    /// The route the last navigation settled on, if any.
    pub fn current_route(&self) -> Option<&Route<V>> {
        self.active_route.and_then(|index| self.routes.get(index))
    }

    /// Whether `path` is the pattern of the route currently shown.
    pub fn is_active(&self, path: &str) -> bool {
        self.current_route()
            .and_then(Route::path)
            .is_some_and(|pattern| pattern == path)
    }

    /// Stamp of the navigation that produced this snapshot.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl<V> fmt::Debug for RouterState<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterState")
            .field("pathname", &self.pathname)
            .field("params", &self.params)
            .field("has_view", &self.view.is_some())
            .field("view_name", &self.view_name)
            .field("has_layout", &self.layout.is_some())
            .field("auth_status", &self.auth_status)
            .field("loading_status", &self.loading_status)
            .field("error", &self.error)
            .field("active_route", &self.active_route)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::table::Route;

    #[test]
    fn test_initial_defaults() {
        let state: RouterState<&str> = RouterState::initial("/start");
        assert_eq!(state.pathname, "/start");
        assert_eq!(state.auth_status, AuthStatus::None);
        assert_eq!(state.loading_status, LoadingStatus::None);
        assert!(state.view.is_none());
        assert!(state.routes.is_empty());
    }

    #[test]
    fn test_is_active() {
        let mut state: RouterState<&str> = RouterState::initial("/foo/42");
        state.routes = vec![Route::view("/foo/:id", "foo")].into();
        state.active_route = Some(0);
        assert!(state.is_active("/foo/:id"));
        assert!(!state.is_active("/foo"));
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(AuthStatus::Pending.as_str(), "pending");
        assert_eq!(LoadingStatus::Error.as_str(), "error");
    }
}
