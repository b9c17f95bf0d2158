//! Diff engine — computes the operations that bring the target store in
//! sync with the filtered source set.
//!
//! The diff is pure: it never mutates its inputs and never talks to a
//! store. The target snapshot must be read once, before diffing, by the
//! caller.

use crate::error::{SyncError, SyncResult};
use birthcal_types::{EntityKey, SourceEntity, SyncOperation, TargetEntity};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// How missing target entities are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncMode {
    /// The filtered source set is the complete desired state: owned target
    /// entities absent from it are deleted. An empty source set in this
    /// mode is a valid "delete everything owned" request.
    Full,
    /// Creates and updates only. Entities are never deleted solely because
    /// they are missing from the current source enumeration.
    Incremental,
}

/// Computes the ordered operation list that reconciles `target` with
/// `source`.
///
/// Operations are emitted creates first, then updates, then deletes, so a
/// stale row can never collide with a fresh one under a store uniqueness
/// constraint longer than necessary. Within each class, order follows the
/// input slices.
///
/// Entities not owned by this adapter are never deleted, in either mode.
///
/// # Errors
///
/// Returns [`SyncError::DuplicateKey`] if two source entities share a key.
pub fn diff(
    source: &[SourceEntity],
    target: &[TargetEntity],
    mode: SyncMode,
) -> SyncResult<Vec<SyncOperation>> {
    let mut source_by_key: HashMap<&EntityKey, &SourceEntity> =
        HashMap::with_capacity(source.len());
    for entity in source {
        if source_by_key.insert(&entity.key, entity).is_some() {
            return Err(SyncError::DuplicateKey(entity.key.clone()));
        }
    }

    let target_by_key: HashMap<&EntityKey, &TargetEntity> =
        target.iter().map(|t| (&t.key, t)).collect();

    let mut creates = Vec::new();
    let mut updates = Vec::new();
    let mut deletes = Vec::new();

    for entity in source {
        match target_by_key.get(&entity.key) {
            None => creates.push(SyncOperation::Create {
                key: entity.key.clone(),
                fields: entity.fields.clone(),
            }),
            Some(existing) => {
                // Field-by-field comparison; identical rows emit nothing.
                if existing.fields != entity.fields {
                    updates.push(SyncOperation::Update {
                        target_id: existing.target_id,
                        fields: entity.fields.clone(),
                    });
                }
            }
        }
    }

    if mode == SyncMode::Full {
        for existing in target {
            if existing.owned && !source_by_key.contains_key(&existing.key) {
                deletes.push(SyncOperation::Delete {
                    target_id: existing.target_id,
                });
            }
        }
    }

    debug!(
        "Diff ({:?}): {} creates, {} updates, {} deletes",
        mode,
        creates.len(),
        updates.len(),
        deletes.len()
    );

    let mut operations = creates;
    operations.append(&mut updates);
    operations.append(&mut deletes);
    Ok(operations)
}
