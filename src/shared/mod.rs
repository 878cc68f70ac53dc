//! Shared store: one state value, many selector-gated consumers.
//!
//! A [`SharedStore`] lazily builds a single base store shared by every view
//! created from it. Each [`StoreView`] memoizes its own selected slice and
//! only reacts when that slice changes, which is what keeps unrelated
//! consumers from re-rendering on every commit.

mod shared;
mod view;

pub use shared::{create_shared_store, PersistenceOptions, SharedStore, StoreOptions};
pub use view::StoreView;
