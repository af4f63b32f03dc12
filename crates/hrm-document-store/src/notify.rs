//! Change notification.
//!
//! Observers run synchronously, in subscription order, after the mutation
//! has been persisted and the store's operation lock released.

use crate::Collection;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// What a mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeScope {
    Collection(Collection),
    /// Whole-document or session-level change (import, save, auth).
    Any,
}

impl ChangeScope {
    /// Whether an observer interested in `collection` should react.
    pub fn affects(&self, collection: Collection) -> bool {
        match self {
            Self::Collection(c) => *c == collection,
            Self::Any => true,
        }
    }
}

type Listener = Arc<dyn Fn(ChangeScope) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(u64, Listener)>>,
}

/// Registry of change observers.
#[derive(Clone, Default)]
pub struct ChangeNotifier {
    inner: Arc<Registry>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(ChangeScope) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.lock().push((id, Arc::new(listener)));
        Subscription {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Invoke every observer once.
    ///
    /// The listener list is copied out first so an observer may subscribe,
    /// unsubscribe, or call back into the store.
    pub fn notify(&self, scope: ChangeScope) {
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .lock()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        tracing::trace!(?scope, observers = listeners.len(), "notifying observers");
        for listener in listeners {
            listener(scope);
        }
    }

    pub fn observer_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("observers", &self.observer_count())
            .finish()
    }
}

/// Handle returned by `subscribe`. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes the observer"]
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<Registry>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        // Drop does the work.
    }

    /// Keep the observer registered for the lifetime of the notifier.
    pub fn detach(mut self) {
        self.registry = Weak::new();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.listeners.lock().retain(|(id, _)| *id != self.id);
        }
    }
}

/// Observer that records every scope it is notified with.
#[derive(Debug, Default, Clone)]
pub struct RecordingListener {
    scopes: Arc<Mutex<Vec<ChangeScope>>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a recording closure to `notifier`.
    pub fn attach(&self, notifier: &ChangeNotifier) -> Subscription {
        let scopes = Arc::clone(&self.scopes);
        notifier.subscribe(move |scope| scopes.lock().push(scope))
    }

    pub fn scopes(&self) -> Vec<ChangeScope> {
        self.scopes.lock().clone()
    }

    pub fn clear(&self) {
        self.scopes.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.scopes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
