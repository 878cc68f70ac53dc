//! # Canteen
//!
//! Shared reactive state containers for component-based UIs.
//!
//! Canteen provides two levels of abstraction for managing shared state:
//!
//! ## Base store (low-level)
//!
//! The single source of truth for one state value:
//! - `BaseStore<S>` - owns the state, replaced wholesale on every commit
//! - `Middleware` - ordered pipeline that can transform or veto updates
//! - `Subscription` - RAII listener registration
//!
//! ## Shared store (high-level)
//!
//! Multi-consumer access with selective re-rendering:
//! - `SharedStore<S>` - factory sharing one lazily-built store across consumers
//! - `StoreView<S, T>` - per-consumer view that only reacts when its selected
//!   slice of the state actually changes
//! - Optional persistence of every committed state to a key-value backend

pub mod error;
pub mod persist;
pub mod shared;
pub mod store;

// Re-export main types for convenience
pub use error::StoreError;
pub use persist::{persist_state, retrieve_state, FileStorage, MemoryStorage, Storage};
pub use shared::{create_shared_store, PersistenceOptions, SharedStore, StoreOptions, StoreView};
pub use store::{BaseStore, Middleware, Subscription};
