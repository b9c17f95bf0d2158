//! Target store abstraction.
//!
//! The target store owns the authoritative materialized state (the real
//! calendar rows). The core reads a snapshot once per pass and writes
//! batched operation chunks; each chunk either applies as a unit or
//! reports per-operation outcomes.

use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use birthcal_types::{AccountRef, SyncOperation, TargetEntity, TargetId};
use serde::{Deserialize, Serialize};

/// Per-operation result of a batch apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpOutcome {
    /// The operation was applied. Creates carry the store-assigned id.
    Applied {
        /// Id assigned on create; `None` for updates and deletes.
        target_id: Option<TargetId>,
    },
    /// The operation failed (e.g., a uniqueness constraint); its siblings
    /// in the chunk are unaffected.
    Failed {
        /// Store-reported cause.
        error: String,
    },
}

impl OpOutcome {
    /// Whether the operation was applied.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// A store the core materializes entities into.
#[async_trait]
pub trait TargetStore: Send + Sync {
    /// Returns the entities currently materialized for the account.
    async fn current_entities(&self, account: &AccountRef) -> SyncResult<Vec<TargetEntity>>;

    /// Applies one chunk of operations.
    ///
    /// Returns one outcome per operation, in order. An `Err` means the
    /// whole chunk did not apply (store unreachable, or the store cannot
    /// report partial results).
    async fn apply_batch(
        &self,
        account: &AccountRef,
        operations: &[SyncOperation],
    ) -> SyncResult<Vec<OpOutcome>>;
}

/// An in-memory target store for testing.
pub mod memory {
    use super::*;
    use birthcal_types::{EntityKey, FieldMap};
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct Inner {
        rows: HashMap<AccountRef, Vec<TargetEntity>>,
        next_id: i64,
        fail_next_reads: u32,
        fail_next_applies: u32,
        rejected_keys: HashSet<EntityKey>,
        apply_calls: u32,
    }

    /// In-memory [`TargetStore`] with fault injection.
    ///
    /// Creates are assigned fresh ids and marked owned; seeded rows keep
    /// whatever ownership they were seeded with.
    #[derive(Debug, Default)]
    pub struct MemoryTargetStore {
        inner: Mutex<Inner>,
    }

    impl MemoryTargetStore {
        /// Creates an empty store.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Seeds a pre-existing row, returning its assigned id.
        pub fn seed(&self, account: AccountRef, key: EntityKey, fields: FieldMap, owned: bool) -> TargetId {
            let mut inner = self.inner.lock().unwrap();
            inner.next_id += 1;
            let target_id = TargetId::new(inner.next_id);
            inner.rows.entry(account).or_default().push(TargetEntity {
                key,
                target_id,
                fields,
                owned,
            });
            target_id
        }

        /// Returns the current rows for an account.
        #[must_use]
        pub fn entities(&self, account: &AccountRef) -> Vec<TargetEntity> {
            self.inner
                .lock()
                .unwrap()
                .rows
                .get(account)
                .cloned()
                .unwrap_or_default()
        }

        /// Makes the next `n` snapshot reads fail with `StoreUnavailable`.
        pub fn fail_next_reads(&self, n: u32) {
            self.inner.lock().unwrap().fail_next_reads = n;
        }

        /// Makes the next `n` batch applies fail with `StoreUnavailable`.
        pub fn fail_next_applies(&self, n: u32) {
            self.inner.lock().unwrap().fail_next_applies = n;
        }

        /// Makes creates for `key` fail with a constraint violation.
        pub fn reject_key(&self, key: EntityKey) {
            self.inner.lock().unwrap().rejected_keys.insert(key);
        }

        /// Number of `apply_batch` calls observed (including failed ones).
        #[must_use]
        pub fn apply_calls(&self) -> u32 {
            self.inner.lock().unwrap().apply_calls
        }
    }

    #[async_trait]
    impl TargetStore for MemoryTargetStore {
        async fn current_entities(&self, account: &AccountRef) -> SyncResult<Vec<TargetEntity>> {
            let mut inner = self.inner.lock().unwrap();
            if inner.fail_next_reads > 0 {
                inner.fail_next_reads -= 1;
                return Err(SyncError::StoreUnavailable("target store offline".into()));
            }
            Ok(inner.rows.get(account).cloned().unwrap_or_default())
        }

        async fn apply_batch(
            &self,
            account: &AccountRef,
            operations: &[SyncOperation],
        ) -> SyncResult<Vec<OpOutcome>> {
            let mut inner = self.inner.lock().unwrap();
            inner.apply_calls += 1;
            if inner.fail_next_applies > 0 {
                inner.fail_next_applies -= 1;
                return Err(SyncError::StoreUnavailable("target store offline".into()));
            }

            let mut outcomes = Vec::with_capacity(operations.len());
            for operation in operations {
                let outcome = match operation {
                    SyncOperation::Create { key, fields } => {
                        if inner.rejected_keys.contains(key) {
                            OpOutcome::Failed {
                                error: format!("uniqueness violation on {key}"),
                            }
                        } else {
                            inner.next_id += 1;
                            let target_id = TargetId::new(inner.next_id);
                            inner
                                .rows
                                .entry(account.clone())
                                .or_default()
                                .push(TargetEntity {
                                    key: key.clone(),
                                    target_id,
                                    fields: fields.clone(),
                                    owned: true,
                                });
                            OpOutcome::Applied {
                                target_id: Some(target_id),
                            }
                        }
                    }
                    SyncOperation::Update { target_id, fields } => {
                        let row = inner
                            .rows
                            .entry(account.clone())
                            .or_default()
                            .iter_mut()
                            .find(|r| r.target_id == *target_id);
                        match row {
                            Some(row) => {
                                row.fields = fields.clone();
                                OpOutcome::Applied { target_id: None }
                            }
                            None => OpOutcome::Failed {
                                error: format!("no such row: #{target_id}"),
                            },
                        }
                    }
                    SyncOperation::Delete { target_id } => {
                        let rows = inner.rows.entry(account.clone()).or_default();
                        let before = rows.len();
                        rows.retain(|r| r.target_id != *target_id);
                        if rows.len() < before {
                            OpOutcome::Applied { target_id: None }
                        } else {
                            OpOutcome::Failed {
                                error: format!("no such row: #{target_id}"),
                            }
                        }
                    }
                };
                outcomes.push(outcome);
            }
            Ok(outcomes)
        }
    }
}
