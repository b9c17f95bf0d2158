//! Sync operations — the unit of change produced by the diff engine.
//!
//! Operations are a closed tagged enum: the batch applier dispatches over
//! the three variants explicitly, there is no open-ended operation
//! registry. Each operation is produced once per pass, consumed exactly
//! once, and discarded after application.

use crate::{EntityKey, FieldMap, TargetId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One pending change against the target store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data")]
pub enum SyncOperation {
    /// Materialize a new record. The target ID is assigned by the store
    /// on acknowledgment, never known in advance.
    Create {
        /// Stable key the new record is filed under.
        key: EntityKey,
        /// Field values to materialize.
        fields: FieldMap,
    },

    /// Replace the field values of an existing record.
    Update {
        /// Handle of the record to update.
        target_id: TargetId,
        /// New field values.
        fields: FieldMap,
    },

    /// Remove an existing record.
    Delete {
        /// Handle of the record to remove.
        target_id: TargetId,
    },
}

impl SyncOperation {
    /// Returns the operation's kind discriminant.
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Create { .. } => OperationKind::Create,
            Self::Update { .. } => OperationKind::Update,
            Self::Delete { .. } => OperationKind::Delete,
        }
    }
}

impl fmt::Display for SyncOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create { key, .. } => write!(f, "create({key})"),
            Self::Update { target_id, .. } => write!(f, "update(#{target_id})"),
            Self::Delete { target_id } => write!(f, "delete(#{target_id})"),
        }
    }
}

/// Discriminant for [`SyncOperation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Create,
    Update,
    Delete,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}
