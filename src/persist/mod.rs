//! Persistence adapter: save and restore serialized state snapshots.
//!
//! The core consumes a generic key-value [`Storage`] backend; payloads are the
//! JSON-serialized full state. [`MemoryStorage`] serves tests and ephemeral
//! use, [`FileStorage`] keeps one file per key on disk.

mod snapshot;
mod storage;

pub use snapshot::{persist_state, retrieve_state};
pub use storage::{FileStorage, MemoryStorage, Storage};
