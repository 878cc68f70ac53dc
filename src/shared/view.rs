use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;
use crate::store::{BaseStore, Subscription};

type ChangeListener<T> = Arc<dyn Fn(&T) + Send + Sync>;
type ChangeListenerSet<T> = RwLock<Vec<(u64, ChangeListener<T>)>>;

/// Per-consumer view over a slice of a shared store.
///
/// The view keeps a memoized copy of `selector(state)`. On every commit its
/// store listener recomputes the selector and compares the result against the
/// memo by structural equality (`PartialEq`, cost proportional to the size of
/// the selected slice); only on a real change does it update the memo and fire
/// the view's change callbacks. Two views selecting disjoint slices therefore
/// never wake each other up.
///
/// Dropping the view unsubscribes it from the store.
pub struct StoreView<S, T> {
    store: BaseStore<S>,
    selected: Arc<RwLock<T>>,
    change_listeners: Arc<ChangeListenerSet<T>>,
    next_listener_id: AtomicU64,
    _subscription: Subscription,
}

impl<S, T> StoreView<S, T>
where
    S: Clone + Send + Sync + 'static,
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub(crate) fn new<F>(store: BaseStore<S>, selector: F) -> Self
    where
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        let selected = Arc::new(RwLock::new(store.read(|state| selector(state))));
        let change_listeners: Arc<ChangeListenerSet<T>> = Arc::new(RwLock::new(Vec::new()));

        let subscription = store.subscribe({
            let selected = Arc::clone(&selected);
            let change_listeners = Arc::clone(&change_listeners);
            move |new_state: &S| {
                let next = selector(new_state);
                {
                    let mut memo = selected.write();
                    if *memo == next {
                        return;
                    }
                    *memo = next.clone();
                }
                let snapshot: Vec<ChangeListener<T>> = change_listeners
                    .read()
                    .iter()
                    .map(|(_, listener)| Arc::clone(listener))
                    .collect();
                for listener in snapshot {
                    listener(&next);
                }
            }
        });

        Self {
            store,
            selected,
            change_listeners,
            next_listener_id: AtomicU64::new(0),
            _subscription: subscription,
        }
    }

    /// Clone of the memoized selected slice.
    pub fn state(&self) -> T {
        self.selected.read().clone()
    }

    /// Borrow the memoized slice without cloning.
    pub fn with_state<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.selected.read())
    }

    /// Register a callback that fires only when the selected slice changes.
    ///
    /// This is the re-render hook: a UI consumer wires its render trigger
    /// here and is left alone while other slices of the shared state churn.
    pub fn on_change<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.next_listener_id.fetch_add(1, Ordering::SeqCst);
        self.change_listeners.write().push((id, Arc::new(listener)));

        let listeners = Arc::downgrade(&self.change_listeners);
        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.write().retain(|(listener_id, _)| *listener_id != id);
            }
        })
    }

    /// Update the shared state with a function of the current state.
    pub fn update<F>(&self, f: F) -> Result<S, StoreError>
    where
        F: FnOnce(&S) -> S,
    {
        self.store.update(f)
    }

    /// Replace the shared state wholesale.
    pub fn set(&self, next: S) -> Result<S, StoreError> {
        self.store.set(next)
    }
}

impl<S, T> StoreView<S, T>
where
    S: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    /// Apply a deep-partial update to the shared state.
    pub fn patch<P: Serialize>(&self, patch: P) -> Result<S, StoreError> {
        self.store.patch(patch)
    }
}
