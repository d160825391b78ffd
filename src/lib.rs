//! Client-side navigation state management.
//!
//! # Architecture Overview
//!
//! ```text
//! redirect / set_routes / history pop
//!     → routing   (ordered table scan, pattern matching, params)
//!     → navigator (auth gating, lazy view loading, redirects)
//!     → store     (atomic snapshot swap, subscriber fan-out)
//!     → host rendering layer re-renders from the snapshot
//! ```
//!
//! The view type is an opaque generic supplied by the host; this crate
//! only decides *which* view (or placeholder) is current, never how it
//! is drawn.

// Core subsystems
pub mod routing;
pub mod store;

// Navigation orchestration
pub mod navigator;

// Cross-cutting concerns
pub mod error;

pub use error::{BoxError, NavigationError};
pub use navigator::history::{History, MemoryHistory, NullHistory};
pub use navigator::{RouterStore, RouterStoreBuilder, StalePolicy};
pub use routing::{
    loader_fn, match_path, AuthCheck, AuthGate, Authenticate, Fallback, LayoutRoute, LazyRoute,
    MetadataRoute, Params, Route, ViewLoader, ViewRef, ViewRoute, WILDCARD,
};
pub use store::state::{AuthStatus, LoadingStatus, RouterState};
pub use store::{StateStore, SubscriptionId};
