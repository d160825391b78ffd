//! Route table scanning.
//!
//! # Data Flow
//! ```text
//! pathname + ordered table
//!     → one left-to-right pass
//!     → layout entries open/replace the active layout window
//!     → metadata entries overwrite the tracked defaults
//!     → "**" is remembered as the not-found fallback
//!     → first matching view/lazy entry wins
//! ```
//!
//! # Design Decisions
//! - Order is semantics: first match wins, scoping is positional
//! - One metadata entry is tracked at a time, never a stack
//! - A finite layout scope is a countdown over scanned navigable
//!   entries, consumed by attempted matches whether or not they succeed
//! - Layout windows are linear, not nested; a later layout replaces the
//!   former

use crate::routing::matcher::{match_path, Params};
use crate::routing::table::{
    AuthGate, LayoutRoute, LazyRoute, MetadataRoute, Route, ViewRoute, WILDCARD,
};

/// A navigable route selected by the scanner.
#[derive(Clone, Copy)]
pub enum Matched<'t, V> {
    View(&'t ViewRoute<V>),
    Lazy(&'t LazyRoute<V>),
}

impl<'t, V> Matched<'t, V> {
    /// The winning route's path pattern.
    pub fn path(&self) -> &'t str {
        match self {
            Matched::View(r) => r.path.as_str(),
            Matched::Lazy(r) => r.path.as_str(),
        }
    }

    /// The winning route's authentication gate, if any.
    pub fn auth(&self) -> Option<&'t AuthGate<V>> {
        match self {
            Matched::View(r) => r.auth.as_ref(),
            Matched::Lazy(r) => r.auth.as_ref(),
        }
    }
}

/// Result of scanning the table for one pathname.
pub struct Scan<'t, V> {
    /// Winning route and its table index, if any.
    pub route: Option<(usize, Matched<'t, V>)>,
    /// Parameters extracted by the winning match (empty otherwise).
    pub params: Params,
    /// Metadata defaults in effect at the winning position.
    pub metadata: Option<&'t MetadataRoute<V>>,
    /// Layout in effect at the winning position.
    pub layout: Option<&'t LayoutRoute<V>>,
}

/// Walk `table` once, selecting the route for `pathname`.
///
/// The wildcard entry is recorded but only returned after the whole
/// table has been scanned without a match.
pub fn scan<'t, V>(pathname: &str, table: &'t [Route<V>]) -> Scan<'t, V> {
    let mut metadata: Option<&MetadataRoute<V>> = None;
    let mut layout: Option<&LayoutRoute<V>> = None;
    let mut countdown: Option<usize> = None;
    let mut fallback: Option<(usize, Matched<'t, V>)> = None;

    for (index, route) in table.iter().enumerate() {
        let matched = match route {
            Route::Layout(l) => {
                // A zero-width window replaces the active layout with nothing.
                if l.scope == Some(0) {
                    layout = None;
                    countdown = None;
                } else {
                    layout = Some(l);
                    countdown = l.scope;
                }
                continue;
            }
            Route::Metadata(m) => {
                metadata = Some(m);
                continue;
            }
            Route::View(r) => {
                if r.path == WILDCARD {
                    if fallback.is_none() {
                        fallback = Some((index, Matched::View(r)));
                    }
                    consume_scope(&mut layout, &mut countdown);
                    continue;
                }
                Matched::View(r)
            }
            Route::Lazy(r) => Matched::Lazy(r),
        };

        match match_path(matched.path(), pathname) {
            Some(params) => {
                return Scan {
                    route: Some((index, matched)),
                    params,
                    metadata,
                    layout,
                };
            }
            None => consume_scope(&mut layout, &mut countdown),
        }
    }

    Scan {
        route: fallback,
        params: Params::new(),
        metadata,
        layout,
    }
}

/// Spend one unit of a finite layout window; close it at zero.
fn consume_scope<'t, V>(layout: &mut Option<&'t LayoutRoute<V>>, countdown: &mut Option<usize>) {
    if let Some(remaining) = countdown.as_mut() {
        *remaining -= 1;
        if *remaining == 0 {
            *layout = None;
            *countdown = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::table::Fallback;

    fn view(path: &str, name: &'static str) -> Route<&'static str> {
        Route::view(path, name)
    }

    fn winner<'t>(scan: &Scan<'t, &'static str>) -> Option<&'t str> {
        scan.route.as_ref().map(|(_, m)| m.path())
    }

    #[test]
    fn test_first_match_wins() {
        let table = vec![view("/a", "first"), view("/a", "second")];
        let scan = scan("/a", &table);
        assert_eq!(scan.route.as_ref().map(|(i, _)| *i), Some(0));
    }

    #[test]
    fn test_params_extracted() {
        let table = vec![view("/foo/:id", "foo")];
        let scan = scan("/foo/42", &table);
        assert_eq!(scan.params.get("id"), Some(&"42".to_string()));
    }

    #[test]
    fn test_param_route_does_not_capture_shorter_sibling() {
        let table = vec![view("/foo/:id", "detail"), view("/foo", "index")];
        let scan = scan("/foo", &table);
        assert_eq!(winner(&scan), Some("/foo"));
        assert!(scan.params.is_empty());
    }

    #[test]
    fn test_no_match_no_wildcard() {
        let table = vec![view("/a", "a")];
        let scan = scan("/b", &table);
        assert!(scan.route.is_none());
    }

    #[test]
    fn test_wildcard_fallback() {
        let table = vec![view("/a", "a"), view(WILDCARD, "not-found")];
        let scan = scan("/missing", &table);
        assert_eq!(winner(&scan), Some(WILDCARD));
    }

    #[test]
    fn test_leading_wildcard_never_short_circuits() {
        let table = vec![view(WILDCARD, "not-found"), view("/a", "a")];
        let scan = scan("/a", &table);
        assert_eq!(winner(&scan), Some("/a"));
    }

    #[test]
    fn test_metadata_never_matches() {
        let table: Vec<Route<&str>> = vec![Route::metadata(), view("/a", "a")];
        let scan = scan("/a", &table);
        assert_eq!(scan.route.as_ref().map(|(i, _)| *i), Some(1));
        assert!(scan.metadata.is_some());
    }

    #[test]
    fn test_last_metadata_wins() {
        let first = Route::metadata().default_loading(crate::routing::table::ViewRef::named("one"));
        let second =
            Route::metadata().default_loading(crate::routing::table::ViewRef::named("two"));
        let table = vec![first, second, view("/a", "a")];
        let scan = scan("/a", &table);
        let default = scan.metadata.and_then(|m| m.default_loading.as_ref());
        assert!(
            matches!(default, Some(crate::routing::table::ViewRef::Named(n)) if n == "two"),
            "later metadata entry should overwrite the earlier one"
        );
    }

    #[test]
    fn test_unscoped_layout_applies_until_end() {
        let table = vec![Route::layout("shell"), view("/a", "a"), view("/b", "b")];
        let scan = scan("/b", &table);
        assert!(scan.layout.is_some());
    }

    #[test]
    fn test_later_layout_replaces_former() {
        let table = vec![
            Route::layout("outer"),
            view("/a", "a"),
            Route::layout("inner"),
            view("/b", "b"),
        ];
        let scan = scan("/b", &table);
        assert_eq!(scan.layout.map(|l| l.view), Some("inner"));
    }

    #[test]
    fn test_scope_consumed_by_attempted_matches() {
        let table = vec![
            Route::layout_scoped("shell", 2),
            view("/a", "a"),
            view("/b", "b"),
            view("/c", "c"),
        ];
        // Inside the window, even though /a did not match.
        let scan_b = scan("/b", &table);
        assert!(scan_b.layout.is_some());
        // The first two entries consumed the window before /c is tried.
        let scan_c = scan("/c", &table);
        assert_eq!(winner(&scan_c), Some("/c"));
        assert!(scan_c.layout.is_none());
    }

    #[test]
    fn test_metadata_does_not_consume_scope() {
        let table = vec![
            Route::layout_scoped("shell", 1),
            Route::metadata(),
            view("/a", "a"),
        ];
        let scan = scan("/a", &table);
        assert!(scan.layout.is_some());
    }

    #[test]
    fn test_wildcard_consumes_scope() {
        let table = vec![
            Route::layout_scoped("shell", 1),
            view(WILDCARD, "not-found"),
            view("/a", "a"),
        ];
        let scan = scan("/a", &table);
        assert!(scan.layout.is_none(), "wildcard entry spends the window");
    }

    #[test]
    fn test_zero_scope_layout_clears_active() {
        let table = vec![
            Route::layout("outer"),
            Route::layout_scoped("noop", 0),
            view("/a", "a"),
        ];
        let scan = scan("/a", &table);
        assert!(scan.layout.is_none());
    }

    #[test]
    fn test_layout_active_at_wildcard_fallback() {
        let table = vec![Route::layout("shell"), view(WILDCARD, "not-found")];
        let scan = scan("/missing", &table);
        assert_eq!(winner(&scan), Some(WILDCARD));
        assert!(scan.layout.is_some());
    }

    #[test]
    fn test_lazy_wildcard_is_not_a_fallback() {
        let loader = crate::routing::table::loader_fn(|| async { Ok("lazy") });
        let table = vec![Route::lazy(WILDCARD, loader).loading(Fallback::Hidden)];
        let scan = scan("/missing", &table);
        assert!(scan.route.is_none());
    }
}
