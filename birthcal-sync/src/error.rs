//! Error types for the sync layer.

use birthcal_types::EntityKey;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur in sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Two source entities share a stable key. Contract violation,
    /// fatal to the pass.
    #[error("duplicate source key: {0}")]
    DuplicateKey(EntityKey),

    /// A collaborator store is unreachable. Retried a bounded number
    /// of times before the pass is marked failed.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// A store-level constraint was violated (e.g., uniqueness on create).
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// The pass was cancelled between batches.
    #[error("sync pass cancelled")]
    Cancelled,

    /// Local storage error (blacklist database).
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SyncError {
    /// Whether the orchestrator may retry the failed read/apply.
    /// Contract violations and cancellation are never retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_) | Self::Storage(_))
    }
}
