use serde::de::DeserializeOwned;
use serde::Serialize;

use super::storage::Storage;
use crate::error::StoreError;

/// Serialize `state` to JSON and write it under `key`.
pub fn persist_state<S: Serialize>(
    key: &str,
    state: &S,
    storage: &dyn Storage,
) -> Result<(), StoreError> {
    let payload = serde_json::to_string(state)?;
    storage.set(key, &payload).map_err(|source| StoreError::Storage {
        key: key.to_string(),
        source,
    })
}

/// Read and deserialize the snapshot under `key`.
///
/// An absent key is `Ok(None)`. A payload that no longer deserializes is
/// [`StoreError::CorruptSnapshot`], so callers can fall back to an initial
/// state instead of failing store construction.
pub fn retrieve_state<S: DeserializeOwned>(
    key: &str,
    storage: &dyn Storage,
) -> Result<Option<S>, StoreError> {
    let payload = storage.get(key).map_err(|source| StoreError::Storage {
        key: key.to_string(),
        source,
    })?;
    let Some(payload) = payload else {
        return Ok(None);
    };

    serde_json::from_str(&payload)
        .map(Some)
        .map_err(|source| StoreError::CorruptSnapshot {
            key: key.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryStorage;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Counter {
        count: i64,
    }

    #[test]
    fn snapshot_round_trip() {
        let storage = MemoryStorage::new();
        persist_state("k", &Counter { count: 5 }, &storage).unwrap();

        let restored: Option<Counter> = retrieve_state("k", &storage).unwrap();
        assert_eq!(restored, Some(Counter { count: 5 }));
    }

    #[test]
    fn absent_key_is_none() {
        let storage = MemoryStorage::new();
        let restored: Option<Counter> = retrieve_state("missing", &storage).unwrap();
        assert_eq!(restored, None);
    }

    #[test]
    fn corrupt_payload_is_recoverable() {
        let storage = MemoryStorage::new();
        storage.set("k", "not json {").unwrap();

        let err = retrieve_state::<Counter>("k", &storage).unwrap_err();
        match err {
            StoreError::CorruptSnapshot { key, .. } => assert_eq!(key, "k"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
