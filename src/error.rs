use thiserror::Error;

/// Errors surfaced by store operations and the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A middleware vetoed the update; the state is unchanged and no listener
    /// was notified.
    #[error("update rejected by middleware `{middleware}`: {reason}")]
    Rejected { middleware: String, reason: String },

    /// A deep-partial patch (or the state it applies to) was not a JSON
    /// object, so there are no top-level keys to merge.
    #[error("patch requires a JSON object, got {kind}")]
    InvalidPatch { kind: &'static str },

    /// The state failed to round-trip through JSON while applying a patch.
    #[error("state failed to round-trip through JSON: {0}")]
    Codec(#[from] serde_json::Error),

    /// A persisted snapshot exists under `key` but no longer deserializes.
    /// Callers can fall back to their initial state instead of crashing.
    #[error("persisted state under `{key}` is corrupt: {source}")]
    CorruptSnapshot {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The key-value backend failed an I/O operation.
    #[error("storage failure for `{key}`: {source}")]
    Storage {
        key: String,
        #[source]
        source: std::io::Error,
    },
}
