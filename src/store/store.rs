use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::merge::shallow_merge;
use super::middleware::{run_chain, Middleware};
use crate::error::StoreError;

type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;
type ListenerSet<S> = RwLock<Vec<(u64, Listener<S>)>>;

/// A thread-safe state container with a middleware pipeline.
///
/// The store owns one state value, replaced wholesale on every committed
/// update and never mutated in place. Every update runs through the middleware
/// stack fixed at construction; on success the new state is committed and
/// fanned out to all listeners in registration order. A rejected update
/// changes nothing and notifies no one.
///
/// Cloning the handle is cheap and shares the same underlying state.
pub struct BaseStore<S> {
    state: Arc<RwLock<S>>,
    middlewares: Arc<Vec<Middleware<S>>>,
    listeners: Arc<ListenerSet<S>>,
    next_listener_id: Arc<AtomicU64>,
}

impl<S: Clone + Send + Sync + 'static> BaseStore<S> {
    /// Create a store with the given initial state and no middleware.
    pub fn new(initial: S) -> Self {
        Self::with_middlewares(initial, Vec::new())
    }

    /// Create a store with an ordered middleware stack.
    ///
    /// The stack is immutable for the lifetime of the store.
    pub fn with_middlewares(initial: S, middlewares: Vec<Middleware<S>>) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial)),
            middlewares: Arc::new(middlewares),
            listeners: Arc::new(RwLock::new(Vec::new())),
            next_listener_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Get a clone of the current state.
    pub fn get(&self) -> S {
        self.state.read().clone()
    }

    /// Read the state with a function without cloning.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&S) -> R,
    {
        f(&self.state.read())
    }

    /// Replace the state wholesale, running the middleware pipeline.
    pub fn set(&self, next: S) -> Result<S, StoreError> {
        self.update(move |_| next)
    }

    /// Update the state with a function of the current state.
    ///
    /// The updater sees the state as of this call; its result runs through the
    /// middleware stack and, if no stage rejects, is committed and fanned out
    /// to every listener with the full new state. Returns the committed state.
    ///
    /// Updates are serialized: the state lock is held across updater,
    /// middleware, and commit, so overlapping calls queue instead of racing a
    /// shared snapshot. The updater and middlewares must not call back into
    /// this store; listeners may, because notification runs after the lock is
    /// released.
    pub fn update<F>(&self, f: F) -> Result<S, StoreError>
    where
        F: FnOnce(&S) -> S,
    {
        let committed = {
            let mut state = self.state.write();
            let proposed = f(&*state);
            let accepted = run_chain(&self.middlewares, &*state, proposed)?;
            *state = accepted.clone();
            accepted
        };
        tracing::debug!(middlewares = self.middlewares.len(), "state committed");
        self.notify(&committed);
        Ok(committed)
    }

    /// Subscribe to committed state changes.
    ///
    /// The listener receives the full new state on every commit, in
    /// registration order relative to other listeners. Dropping the returned
    /// guard removes the listener.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        let id = self.next_listener_id.fetch_add(1, Ordering::SeqCst);
        self.listeners.write().push((id, Arc::new(listener)));

        let listeners = Arc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.write().retain(|(listener_id, _)| *listener_id != id);
            }
        })
    }

    /// Notify against a snapshot of the listener set, so listeners may
    /// subscribe or unsubscribe during the round without invalidating it.
    fn notify(&self, state: &S) {
        let snapshot: Vec<Listener<S>> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        tracing::trace!(listeners = snapshot.len(), "notifying listeners");
        for listener in snapshot {
            listener(state);
        }
    }
}

impl<S> BaseStore<S>
where
    S: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    /// Apply a deep-partial update.
    ///
    /// `patch` must serialize to a JSON object; its top-level keys replace the
    /// corresponding top-level keys of the current state, and anything nested
    /// under a patched key is replaced wholesale. The merged state runs
    /// through the same middleware pipeline as [`BaseStore::update`].
    pub fn patch<P: Serialize>(&self, patch: P) -> Result<S, StoreError> {
        let patch = serde_json::to_value(patch)?;
        let committed = {
            let mut state = self.state.write();
            let merged = shallow_merge(serde_json::to_value(&*state)?, patch)?;
            let proposed: S = serde_json::from_value(merged)?;
            let accepted = run_chain(&self.middlewares, &*state, proposed)?;
            *state = accepted.clone();
            accepted
        };
        tracing::debug!(middlewares = self.middlewares.len(), "state committed");
        self.notify(&committed);
        Ok(committed)
    }
}

impl<S> Clone for BaseStore<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            middlewares: Arc::clone(&self.middlewares),
            listeners: Arc::clone(&self.listeners),
            next_listener_id: Arc::clone(&self.next_listener_id),
        }
    }
}

/// RAII guard for a listener registration.
///
/// Dropping the guard removes exactly the listener it was returned for;
/// [`Subscription::unsubscribe`] makes the teardown explicit at call sites
/// that want it. The guard holds only a weak reference, so it never keeps a
/// store alive on its own.
pub struct Subscription {
    remove: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub(crate) fn new<F>(remove: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            remove: Some(Box::new(remove)),
        }
    }

    /// Remove the listener now.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}
