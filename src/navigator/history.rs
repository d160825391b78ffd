//! History integration.
//!
//! # Responsibilities
//! - Record push/replace navigation in the host's history
//! - Let tests and non-browser hosts walk back and forward
//!
//! # Design Decisions
//! - The engine only ever pushes or replaces; back/forward movement is
//!   reported by the host through `RouterStore::sync`, since the
//!   platform has already moved by the time its event fires
//! - Browser bindings are host glue and live outside this crate

use std::sync::{Mutex, PoisonError};

/// Host history backend.
pub trait History: Send + Sync {
    /// Append `pathname` as a new entry.
    fn push(&self, pathname: &str);
    /// Overwrite the current entry with `pathname`.
    fn replace(&self, pathname: &str);
}

impl<T: History + ?Sized> History for std::sync::Arc<T> {
    fn push(&self, pathname: &str) {
        (**self).push(pathname)
    }

    fn replace(&self, pathname: &str) {
        (**self).replace(pathname)
    }
}

/// Backend that records nothing.
pub struct NullHistory;

impl History for NullHistory {
    fn push(&self, _pathname: &str) {}
    fn replace(&self, _pathname: &str) {}
}

/// In-process history stack with a movable cursor.
///
/// Pushing while the cursor sits back in the stack truncates the
/// forward entries, the way browser history behaves.
pub struct MemoryHistory {
    inner: Mutex<Entries>,
}

struct Entries {
    entries: Vec<String>,
    cursor: usize,
}

impl MemoryHistory {
    /// Stack holding `initial` as its only entry.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(Entries {
                entries: vec![initial.into()],
                cursor: 0,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Entries> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The entry under the cursor.
    pub fn current(&self) -> String {
        let inner = self.lock();
        inner.entries[inner.cursor].clone()
    }

    /// Move back one entry, returning the new current pathname.
    pub fn back(&self) -> Option<String> {
        let mut inner = self.lock();
        if inner.cursor == 0 {
            return None;
        }
        inner.cursor -= 1;
        Some(inner.entries[inner.cursor].clone())
    }

    /// Move forward one entry, returning the new current pathname.
    pub fn forward(&self) -> Option<String> {
        let mut inner = self.lock();
        if inner.cursor + 1 >= inner.entries.len() {
            return None;
        }
        inner.cursor += 1;
        Some(inner.entries[inner.cursor].clone())
    }

    /// Number of entries in the stack.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl History for MemoryHistory {
    fn push(&self, pathname: &str) {
        let mut inner = self.lock();
        let keep = inner.cursor + 1;
        inner.entries.truncate(keep);
        inner.entries.push(pathname.to_string());
        inner.cursor = inner.entries.len() - 1;
    }

    fn replace(&self, pathname: &str) {
        let mut inner = self.lock();
        let cursor = inner.cursor;
        inner.entries[cursor] = pathname.to_string();
    }
}
