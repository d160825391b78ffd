//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Navigation request (pathname)
//!     → scanner.rs (one ordered pass over the table)
//!     → matcher.rs (evaluate each candidate pattern)
//!     → Return: winning route + params + metadata defaults + layout
//!
//! Table installation (set_routes):
//!     Vec<Route>
//!     → table.rs lint (non-fatal authoring checks)
//!     → Freeze as Arc<[Route]> inside the state snapshot
//! ```
//!
//! # Design Decisions
//! - The table is classified at construction, immutable once installed
//! - No regex in the hot path (segment comparison only)
//! - Deterministic: same pathname and table always select the same route
//! - First match wins (table order, not specificity)

pub mod matcher;
pub mod scanner;
pub mod table;

pub use matcher::{match_path, Params};
pub use scanner::{scan, Matched, Scan};
pub use table::{
    loader_fn, AuthCheck, AuthGate, Authenticate, Fallback, LayoutRoute, LazyRoute, MetadataRoute,
    Route, ViewLoader, ViewRef, ViewRoute, WILDCARD,
};
