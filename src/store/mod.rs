//! Observable state container.
//!
//! # Data Flow
//! ```text
//! commit (navigation engine, external update)
//!     → serialized read-modify-write under the write lock
//!     → atomic swap of Arc<RouterState>
//!     → synchronous fan-out to subscribers (outside the lock)
//!
//! subscribe
//!     → current snapshot delivered immediately
//!     → callback registered under a fresh id
//! ```
//!
//! # Design Decisions
//! - Reads are lock-free; one writer at a time
//! - No batching or coalescing: every commit notifies every subscriber
//! - Callbacks are collected before invocation so a subscriber may
//!   re-enter the store (subscribe, navigate) without deadlocking

pub mod state;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use dashmap::DashMap;

use crate::store::state::RouterState;

/// Identifier returned by [`StateStore::subscribe`]; pass to
/// [`StateStore::unsubscribe`] to stop receiving snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<V> = Arc<dyn Fn(&RouterState<V>) + Send + Sync>;

/// Publish-subscribe container for the current navigation state.
pub struct StateStore<V> {
    current: ArcSwap<RouterState<V>>,
    write_lock: Mutex<()>,
    subscribers: DashMap<u64, Callback<V>>,
    next_subscriber: AtomicU64,
}

impl<V: Clone> StateStore<V> {
    pub(crate) fn new(initial: RouterState<V>) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
            write_lock: Mutex::new(()),
            subscribers: DashMap::new(),
            next_subscriber: AtomicU64::new(1),
        }
    }

    /// Current snapshot, lock-free.
    pub fn get(&self) -> Arc<RouterState<V>> {
        self.current.load_full()
    }

    /// Serialized read-modify-write producing a new immutable snapshot.
    ///
    /// Subscribers are notified synchronously after the swap, outside
    /// the write lock.
    pub(crate) fn commit(&self, mutate: impl FnOnce(&mut RouterState<V>)) -> Arc<RouterState<V>> {
        let next = {
            let _guard = self
                .write_lock
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let mut next = (**self.current.load()).clone();
            mutate(&mut next);
            let next = Arc::new(next);
            self.current.store(next.clone());
            next
        };
        self.notify(&next);
        next
    }

    fn notify(&self, state: &RouterState<V>) {
        let callbacks: Vec<Callback<V>> = self
            .subscribers
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        for callback in callbacks {
            callback(state);
        }
    }

    /// Register `callback`: it receives the current snapshot immediately
    /// and then every subsequent commit.
    pub fn subscribe(
        &self,
        callback: impl Fn(&RouterState<V>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let callback: Callback<V> = Arc::new(callback);
        callback(&self.get());
        let id = self.next_subscriber.fetch_add(1, Ordering::Relaxed);
        self.subscribers.insert(id, callback);
        SubscriptionId(id)
    }

    /// Stop delivering snapshots to `id`. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.remove(&id.0);
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
