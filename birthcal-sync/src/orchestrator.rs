//! Sync orchestrator — drives one sync pass per account.
//!
//! A pass is strictly sequential: account check, source enumeration,
//! blacklist read, filter, target snapshot read, diff, batch apply. The
//! snapshot is read exactly once before the diff is computed; the
//! collaborator stores are shared and externally owned, so blacklist edits
//! made while a pass runs take effect on the next pass, never
//! retroactively.
//!
//! Passes for the same account are serialized. A request arriving while a
//! pass is active coalesces: at most one follow-up pass is queued (later
//! requests overwrite the queued mode), and the active runner drains it.
//! Distinct accounts run independently.

use crate::accounts::AccountDirectory;
use crate::applier::BatchApplier;
use crate::blacklist_store::BlacklistStore;
use crate::diff::{self, SyncMode};
use crate::error::{SyncError, SyncResult};
use crate::filter;
use crate::source::SourceEnumerator;
use crate::state::{CancelFlag, SyncOutcome, SyncStatus, SyncSummary};
use crate::target::TargetStore;
use birthcal_types::{AccountRef, ExclusionRule, PassId, TargetEntity};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Configuration for the sync orchestrator.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Maximum operations per target-store batch.
    pub batch_size: usize,
    /// Retries per store read/apply while the store is unreachable.
    pub max_store_retries: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            max_store_retries: 2,
        }
    }
}

/// Per-account pass bookkeeping.
struct PassSlot {
    running: bool,
    pending: Option<SyncMode>,
    cancel: CancelFlag,
    last_status: SyncStatus,
}

impl Default for PassSlot {
    fn default() -> Self {
        Self {
            running: false,
            pending: None,
            cancel: CancelFlag::new(),
            last_status: SyncStatus::Idle,
        }
    }
}

/// Drives sync passes and serializes them per account.
pub struct SyncOrchestrator {
    config: SyncConfig,
    source: Arc<dyn SourceEnumerator>,
    target: Arc<dyn TargetStore>,
    blacklist: Arc<BlacklistStore>,
    directory: Arc<dyn AccountDirectory>,
    applier: BatchApplier,
    slots: Mutex<HashMap<AccountRef, PassSlot>>,
}

impl SyncOrchestrator {
    /// Creates an orchestrator over the given collaborators.
    pub fn new(
        config: SyncConfig,
        source: Arc<dyn SourceEnumerator>,
        target: Arc<dyn TargetStore>,
        blacklist: Arc<BlacklistStore>,
        directory: Arc<dyn AccountDirectory>,
    ) -> Self {
        let applier = BatchApplier::new(config.batch_size, config.max_store_retries);
        Self {
            config,
            source,
            target,
            blacklist,
            directory,
            applier,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the configured batch size.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.applier.batch_size()
    }

    /// Requests a sync pass for one account.
    ///
    /// If no pass is active for the account, runs one (plus any follow-up
    /// passes queued while it was running) and returns the summary of the
    /// requested pass. If a pass is already active, queues at most one
    /// follow-up and returns [`SyncOutcome::Coalesced`].
    pub async fn request_sync(&self, account: &AccountRef, mode: SyncMode) -> SyncOutcome {
        let cancel = {
            let mut slots = self.slots.lock().unwrap();
            let slot = slots.entry(account.clone()).or_default();
            if slot.running {
                debug!("Pass already running for {}; coalescing request", account);
                slot.pending = Some(mode);
                return SyncOutcome::Coalesced;
            }
            slot.running = true;
            slot.pending = None;
            slot.cancel = CancelFlag::new();
            slot.last_status = SyncStatus::Running;
            slot.cancel.clone()
        };

        let first = self.run_pass(account, mode, &cancel).await;

        // Drain follow-up requests queued while we were running. Their
        // summaries are logged; the caller gets the summary of the pass
        // they asked for.
        let mut last_status = first.status;
        loop {
            let next = {
                let mut slots = self.slots.lock().unwrap();
                let slot = slots.entry(account.clone()).or_default();
                slot.last_status = last_status;
                match slot.pending.take() {
                    Some(next_mode) => {
                        slot.cancel = CancelFlag::new();
                        slot.last_status = SyncStatus::Running;
                        Some((next_mode, slot.cancel.clone()))
                    }
                    None => {
                        slot.running = false;
                        None
                    }
                }
            };

            match next {
                Some((next_mode, next_cancel)) => {
                    let summary = self.run_pass(account, next_mode, &next_cancel).await;
                    info!(
                        "Follow-up pass {} for {} finished: {:?}",
                        summary.pass_id, account, summary.status
                    );
                    last_status = summary.status;
                }
                None => break,
            }
        }

        SyncOutcome::Completed(first)
    }

    /// Requests a sync pass for every account of the given type.
    pub async fn request_sync_all(&self, kind: &str, mode: SyncMode) -> Vec<SyncOutcome> {
        let accounts = match self.directory.accounts_of_type(kind).await {
            Ok(accounts) => accounts,
            Err(e) => {
                warn!("Failed to list accounts of type {}: {}", kind, e);
                return Vec::new();
            }
        };

        let mut outcomes = Vec::with_capacity(accounts.len());
        for account in &accounts {
            outcomes.push(self.request_sync(account, mode).await);
        }
        outcomes
    }

    /// Requests cooperative cancellation of the account's active pass.
    /// The batch in flight still completes or fails atomically.
    pub fn cancel(&self, account: &AccountRef) {
        let slots = self.slots.lock().unwrap();
        if let Some(slot) = slots.get(account) {
            if slot.running {
                info!("Cancelling active pass for {}", account);
                slot.cancel.cancel();
            }
        }
    }

    /// Current lifecycle state for the account.
    #[must_use]
    pub fn status(&self, account: &AccountRef) -> SyncStatus {
        let slots = self.slots.lock().unwrap();
        match slots.get(account) {
            Some(slot) if slot.running => SyncStatus::Running,
            Some(slot) => slot.last_status,
            None => SyncStatus::Idle,
        }
    }

    // ── One pass ─────────────────────────────────────────────────

    /// Runs one pass to a terminal summary. Errors never escape: contract
    /// violations and exhausted retries fold into a `Failed` summary.
    async fn run_pass(
        &self,
        account: &AccountRef,
        mode: SyncMode,
        cancel: &CancelFlag,
    ) -> SyncSummary {
        let pass_id = PassId::new();
        info!("Starting {:?} pass {} for {}", mode, pass_id, account);

        match self.directory.account_exists(account).await {
            Ok(true) => {}
            Ok(false) => {
                // The platform removed the account; treat as cancellation.
                warn!("Account {} no longer exists; pass {} cancelled", account, pass_id);
                return SyncSummary::empty(pass_id, account.clone(), mode, SyncStatus::Cancelled);
            }
            Err(e) => {
                warn!("Account lookup failed for {}: {}", account, e);
                return SyncSummary::empty(pass_id, account.clone(), mode, SyncStatus::Failed);
            }
        }

        let source_entities = match self.source.enumerate(account).await {
            Ok(entities) => entities,
            Err(e) => {
                warn!("Source enumeration failed for {}: {}", account, e);
                return SyncSummary::empty(pass_id, account.clone(), mode, SyncStatus::Failed);
            }
        };

        let rules = match self.read_rules(account).await {
            Ok(rules) => rules,
            Err(e) => {
                warn!("Blacklist read failed for {}: {}", account, e);
                return SyncSummary::empty(pass_id, account.clone(), mode, SyncStatus::Failed);
            }
        };

        let filtered = filter::apply_exclusions(&source_entities, &rules);

        let snapshot = match self.read_snapshot(account).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Target snapshot read failed for {}: {}", account, e);
                return SyncSummary::empty(pass_id, account.clone(), mode, SyncStatus::Failed);
            }
        };

        let operations = match diff::diff(&filtered, &snapshot, mode) {
            Ok(operations) => operations,
            Err(e) => {
                warn!("Diff failed for {}: {}", account, e);
                return SyncSummary::empty(pass_id, account.clone(), mode, SyncStatus::Failed);
            }
        };

        if cancel.is_cancelled() {
            info!("Pass {} cancelled before apply", pass_id);
            return SyncSummary::empty(pass_id, account.clone(), mode, SyncStatus::Cancelled);
        }

        let report = self
            .applier
            .apply(self.target.as_ref(), account, &operations, cancel)
            .await;

        let status = if report.cancelled {
            SyncStatus::Cancelled
        } else if report.store_lost {
            SyncStatus::Failed
        } else {
            SyncStatus::Completed
        };

        let summary = SyncSummary {
            pass_id,
            account: account.clone(),
            mode,
            status,
            created: report.created,
            updated: report.updated,
            deleted: report.deleted,
            failed: report.failed,
        };

        info!(
            "Pass {} for {} finished {:?}: {} created, {} updated, {} deleted, {} failed",
            pass_id,
            account,
            summary.status,
            summary.created,
            summary.updated,
            summary.deleted,
            summary.failed_count()
        );
        summary
    }

    /// Reads the exclusion rules for an account, retrying bounded times.
    /// The SQLite call is blocking and runs on a worker thread.
    async fn read_rules(&self, account: &AccountRef) -> SyncResult<Vec<ExclusionRule>> {
        let mut attempt = 0;
        loop {
            let store = self.blacklist.clone();
            let account_owned = account.clone();
            let result = tokio::task::spawn_blocking(move || {
                store.get_rules(Some(&account_owned))
            })
            .await
            .map_err(|e| SyncError::Storage(format!("blacklist read task panicked: {e}")))?;

            match result {
                Ok(rules) => return Ok(rules),
                Err(e) if e.is_retryable() && attempt < self.config.max_store_retries => {
                    attempt += 1;
                    warn!(
                        "Blacklist read failed (attempt {}/{}): {}",
                        attempt, self.config.max_store_retries, e
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Reads the target snapshot for an account, retrying bounded times.
    async fn read_snapshot(&self, account: &AccountRef) -> SyncResult<Vec<TargetEntity>> {
        let mut attempt = 0;
        loop {
            match self.target.current_entities(account).await {
                Ok(snapshot) => return Ok(snapshot),
                Err(e) if e.is_retryable() && attempt < self.config.max_store_retries => {
                    attempt += 1;
                    warn!(
                        "Target snapshot read failed (attempt {}/{}): {}",
                        attempt, self.config.max_store_retries, e
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }
}
