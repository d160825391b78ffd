//! Navigation error taxonomy.
//!
//! # Design Decisions
//! - Failures from host-supplied authenticators and loaders are local to
//!   one navigation; they land in `RouterState::error`, never in a
//!   `Result` returned to the caller
//! - Payloads are shared via `Arc` so snapshots stay cheap to clone

use std::sync::Arc;
use thiserror::Error;

/// Boxed error payload produced by host-supplied authenticators and loaders.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure raised by an asynchronous navigation collaborator.
#[derive(Debug, Clone, Error)]
pub enum NavigationError {
    /// A deferred authentication check rejected.
    #[error("authentication check failed: {0}")]
    Auth(Arc<BoxError>),

    /// A lazy view loader rejected.
    #[error("lazy view load failed: {0}")]
    Load(Arc<BoxError>),
}

impl NavigationError {
    pub(crate) fn auth(source: BoxError) -> Self {
        NavigationError::Auth(Arc::new(source))
    }

    pub(crate) fn load(source: BoxError) -> Self {
        NavigationError::Load(Arc::new(source))
    }

    /// True for failures raised by an authentication check.
    pub fn is_auth(&self) -> bool {
        matches!(self, NavigationError::Auth(_))
    }

    /// True for failures raised by a lazy view loader.
    pub fn is_load(&self) -> bool {
        matches!(self, NavigationError::Load(_))
    }
}
