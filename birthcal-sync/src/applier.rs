//! Batch applier — applies the operation list in bounded-size chunks.
//!
//! Each chunk goes to the target store as one unit. A chunk that fails
//! because the store is unreachable is retried a bounded number of times;
//! exhaustion aborts the remainder of the pass (the store is gone, further
//! chunks would only burn the retry budget again). Any other chunk-level
//! failure marks that chunk's operations failed and processing continues
//! with the next chunk. Per-operation constraint failures never abort
//! their siblings.

use crate::error::SyncError;
use crate::state::{CancelFlag, FailedOperation};
use crate::target::{OpOutcome, TargetStore};
use birthcal_types::{AccountRef, OperationKind, SyncOperation};
use tracing::{debug, warn};

/// Result of applying one operation list.
#[derive(Debug, Clone, Default)]
pub struct ApplyReport {
    /// Entities created.
    pub created: usize,
    /// Entities updated.
    pub updated: usize,
    /// Entities deleted.
    pub deleted: usize,
    /// Operations that could not be applied.
    pub failed: Vec<FailedOperation>,
    /// Cancellation was observed between chunks; remaining operations
    /// were not attempted and are not recorded as failed.
    pub cancelled: bool,
    /// The store stayed unreachable through the retry budget; the pass
    /// should be reported as failed.
    pub store_lost: bool,
}

/// Applies operation lists to a target store in bounded-size chunks.
#[derive(Debug, Clone)]
pub struct BatchApplier {
    batch_size: usize,
    max_store_retries: u32,
}

impl BatchApplier {
    /// Creates an applier. `batch_size` is clamped to at least 1.
    #[must_use]
    pub fn new(batch_size: usize, max_store_retries: u32) -> Self {
        Self {
            batch_size: batch_size.max(1),
            max_store_retries,
        }
    }

    /// Maximum operations per chunk.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Applies `operations` against `store`, checking `cancel` between
    /// chunks. Already-applied chunks are durable; nothing is rolled back.
    pub async fn apply(
        &self,
        store: &dyn TargetStore,
        account: &AccountRef,
        operations: &[SyncOperation],
        cancel: &CancelFlag,
    ) -> ApplyReport {
        let mut report = ApplyReport::default();

        for chunk in operations.chunks(self.batch_size) {
            if cancel.is_cancelled() {
                debug!("Cancellation observed; stopping before next chunk");
                report.cancelled = true;
                return report;
            }

            match self.apply_chunk(store, account, chunk).await {
                Ok(outcomes) => self.record_outcomes(chunk, &outcomes, &mut report),
                Err(e) => {
                    let store_lost = matches!(e, SyncError::StoreUnavailable(_));
                    warn!("Chunk of {} operations failed: {}", chunk.len(), e);
                    let cause = e.to_string();
                    for operation in chunk {
                        report.failed.push(FailedOperation {
                            operation: operation.clone(),
                            error: cause.clone(),
                        });
                    }
                    if store_lost {
                        report.store_lost = true;
                        return report;
                    }
                }
            }
        }

        report
    }

    /// Applies one chunk, retrying bounded times while the store is
    /// unreachable.
    async fn apply_chunk(
        &self,
        store: &dyn TargetStore,
        account: &AccountRef,
        chunk: &[SyncOperation],
    ) -> Result<Vec<OpOutcome>, SyncError> {
        let mut attempt = 0;
        loop {
            match store.apply_batch(account, chunk).await {
                Ok(outcomes) => return Ok(outcomes),
                Err(e) if e.is_retryable() && attempt < self.max_store_retries => {
                    attempt += 1;
                    warn!(
                        "Store unavailable applying chunk (attempt {}/{}): {}",
                        attempt, self.max_store_retries, e
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn record_outcomes(
        &self,
        chunk: &[SyncOperation],
        outcomes: &[OpOutcome],
        report: &mut ApplyReport,
    ) {
        for (index, operation) in chunk.iter().enumerate() {
            match outcomes.get(index) {
                Some(OpOutcome::Applied { .. }) => match operation.kind() {
                    OperationKind::Create => report.created += 1,
                    OperationKind::Update => report.updated += 1,
                    OperationKind::Delete => report.deleted += 1,
                },
                Some(OpOutcome::Failed { error }) => {
                    debug!("Operation {} failed: {}", operation, error);
                    report.failed.push(FailedOperation {
                        operation: operation.clone(),
                        error: error.clone(),
                    });
                }
                // Store returned fewer outcomes than operations.
                None => report.failed.push(FailedOperation {
                    operation: operation.clone(),
                    error: "store reported no outcome for operation".into(),
                }),
            }
        }
    }
}
