//! Pass state and result reporting.
//!
//! A sync pass always terminates with a summary; failures are surfaced as
//! counts and per-operation records, never as panics or hung passes.

use crate::diff::SyncMode;
use birthcal_types::{AccountRef, PassId, SyncOperation};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Lifecycle state of an account's sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncStatus {
    /// No pass has run, or the last one has been acknowledged.
    Idle,
    /// A pass is in flight.
    Running,
    /// The last pass applied its full operation list (individual
    /// operations may still have failed; see the summary counts).
    Completed,
    /// The last pass gave up after exhausting store retries or hitting a
    /// contract violation.
    Failed,
    /// The last pass was cancelled between batches.
    Cancelled,
}

/// One operation that could not be applied, with the causing error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedOperation {
    /// The operation that failed.
    pub operation: SyncOperation,
    /// Store-reported cause.
    pub error: String,
}

/// Result summary of one sync pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    /// Correlation id of the pass.
    pub pass_id: PassId,
    /// The account the pass ran for.
    pub account: AccountRef,
    /// The requested mode.
    pub mode: SyncMode,
    /// Terminal status of the pass.
    pub status: SyncStatus,
    /// Entities created.
    pub created: usize,
    /// Entities updated.
    pub updated: usize,
    /// Entities deleted.
    pub deleted: usize,
    /// Operations that could not be applied.
    pub failed: Vec<FailedOperation>,
}

impl SyncSummary {
    /// An empty summary with the given terminal status.
    #[must_use]
    pub fn empty(pass_id: PassId, account: AccountRef, mode: SyncMode, status: SyncStatus) -> Self {
        Self {
            pass_id,
            account,
            mode,
            status,
            created: 0,
            updated: 0,
            deleted: 0,
            failed: Vec::new(),
        }
    }

    /// Total operations applied.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.created + self.updated + self.deleted
    }

    /// Number of failed operations.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}

/// Outcome of a sync request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The pass ran to a terminal state; here is its summary.
    Completed(SyncSummary),
    /// A pass for this account was already running; at most one follow-up
    /// pass was queued and the request was otherwise a no-op.
    Coalesced,
}

/// Cooperative cancellation flag, observed between batches only.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates a fresh, uncancelled flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. The batch in flight still completes or
    /// fails atomically.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
