use std::io;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::view::StoreView;
use crate::persist::{persist_state, retrieve_state, FileStorage, Storage};
use crate::store::{BaseStore, Middleware, Subscription};

/// Where and how a shared store persists its state.
pub struct PersistenceOptions {
    pub persist_key: String,
    pub storage: Arc<dyn Storage>,
}

impl PersistenceOptions {
    pub fn new(persist_key: impl Into<String>, storage: Arc<dyn Storage>) -> Self {
        Self {
            persist_key: persist_key.into(),
            storage,
        }
    }

    /// Persist under the platform-local data directory, e.g.
    /// `~/.local/share/canteen/<key>.json` on Linux.
    pub fn local(persist_key: impl Into<String>) -> io::Result<Self> {
        let base = dirs::data_local_dir().unwrap_or_else(std::env::temp_dir);
        let storage = FileStorage::new(base.join("canteen"))?;
        Ok(Self::new(persist_key, Arc::new(storage)))
    }
}

/// Configuration for a shared store factory.
pub struct StoreOptions<S> {
    pub middlewares: Vec<Middleware<S>>,
    pub persistence: Option<PersistenceOptions>,
}

impl<S> StoreOptions<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_middleware(mut self, middleware: Middleware<S>) -> Self {
        self.middlewares.push(middleware);
        self
    }

    pub fn with_persistence(mut self, persistence: PersistenceOptions) -> Self {
        self.persistence = Some(persistence);
        self
    }
}

impl<S> Default for StoreOptions<S> {
    fn default() -> Self {
        Self {
            middlewares: Vec::new(),
            persistence: None,
        }
    }
}

struct SharedInner<S> {
    initial: S,
    // Drained into the base store on first use; middleware is not cloneable.
    middlewares: Mutex<Vec<Middleware<S>>>,
    persistence: Option<PersistenceOptions>,
    store: OnceLock<BaseStore<S>>,
    persist_guard: OnceLock<Subscription>,
}

/// Factory handle over one lazily-constructed [`BaseStore`].
///
/// Clones of the handle share the same underlying store; that is the
/// mechanism by which one consumer's commits are observed by all others. The
/// store is built on the first [`SharedStore::view`] call across all clones,
/// seeded from the persisted snapshot under `persist_key` when one is present
/// and readable, else from the supplied initial state.
///
/// The factory is an explicit object with the lifetime of whoever holds it;
/// there is no ambient global registry.
pub struct SharedStore<S> {
    inner: Arc<SharedInner<S>>,
}

impl<S> SharedStore<S>
where
    S: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    pub fn new(initial: S, options: StoreOptions<S>) -> Self {
        Self {
            inner: Arc::new(SharedInner {
                initial,
                middlewares: Mutex::new(options.middlewares),
                persistence: options.persistence,
                store: OnceLock::new(),
                persist_guard: OnceLock::new(),
            }),
        }
    }

    /// Create a consumer view over a derived slice of the shared state.
    ///
    /// The first call constructs the underlying store; every call registers an
    /// independent selector-gated listener for the returned view.
    pub fn view<T, F>(&self, selector: F) -> StoreView<S, T>
    where
        T: Clone + PartialEq + Send + Sync + 'static,
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        StoreView::new(self.store().clone(), selector)
    }

    /// View over the whole state; reacts to every commit that changes it.
    pub fn view_all(&self) -> StoreView<S, S>
    where
        S: PartialEq,
    {
        self.view(|state: &S| state.clone())
    }

    fn store(&self) -> &BaseStore<S> {
        let store = self.inner.store.get_or_init(|| {
            let middlewares = std::mem::take(&mut *self.inner.middlewares.lock());
            BaseStore::with_middlewares(self.seed_state(), middlewares)
        });

        if let Some(persistence) = &self.inner.persistence {
            // Attached exactly once per factory, no matter how many views are
            // created over its lifetime.
            self.inner.persist_guard.get_or_init(|| {
                let key = persistence.persist_key.clone();
                let storage = Arc::clone(&persistence.storage);
                store.subscribe(move |state: &S| {
                    if let Err(err) = persist_state(&key, state, storage.as_ref()) {
                        tracing::warn!(key = %key, error = %err, "failed to persist state");
                    }
                })
            });
        }

        store
    }

    fn seed_state(&self) -> S {
        let Some(persistence) = &self.inner.persistence else {
            return self.inner.initial.clone();
        };

        match retrieve_state::<S>(&persistence.persist_key, persistence.storage.as_ref()) {
            Ok(Some(state)) => state,
            Ok(None) => self.inner.initial.clone(),
            Err(err) => {
                tracing::warn!(
                    key = %persistence.persist_key,
                    error = %err,
                    "persisted state unreadable, falling back to initial state"
                );
                self.inner.initial.clone()
            }
        }
    }
}

impl<S> Clone for SharedStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Create a shared store factory.
///
/// Convenience wrapper over [`SharedStore::new`] mirroring the store
/// construction API.
pub fn create_shared_store<S>(initial: S, options: StoreOptions<S>) -> SharedStore<S>
where
    S: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    SharedStore::new(initial, options)
}
