//! Core type definitions for the birthcal sync engine.
//!
//! This crate defines the fundamental, platform-agnostic types used
//! throughout the reconciliation core:
//! - Stable entity keys, target-row handles, and account references
//! - Source and target entity records with deterministic field maps
//! - Exclusion (blacklist) rules
//! - Sync operations (create / update / delete)
//!
//! Everything platform-specific (how contacts are read, how calendar rows
//! are written) belongs to the collaborator implementations in
//! `birthcal-sync`, not here.

mod entity;
mod ids;
mod operation;

pub use entity::{
    ExclusionRule, FieldMap, SourceEntity, TargetEntity, FIELD_COLOR, FIELD_DATE,
    FIELD_REMINDER_MINUTES, FIELD_TITLE,
};
pub use ids::{AccountRef, EntityKey, PassId, TargetId};
pub use operation::{OperationKind, SyncOperation};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("entity key must not be empty")]
    EmptyKey,

    #[error("invalid account reference: {0}")]
    InvalidAccountRef(String),
}
