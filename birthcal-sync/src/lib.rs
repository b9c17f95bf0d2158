//! Calendar reconciliation engine for birthcal.
//!
//! Given the current set of source entities for an account (e.g., one
//! birthday occurrence per contact) and the set of entities currently
//! materialized in a target store, computes and applies the minimal set of
//! create/update/delete operations that brings the target in sync, while
//! honoring a user-edited exclusion blacklist.
//!
//! # Components
//!
//! - **Filter**: removes blacklisted entities before they reach the diff
//! - **Diff**: computes create/update/delete operations, keyed by stable
//!   entity keys, with no-op suppression for unchanged records
//! - **Applier**: applies operations in bounded-size chunks with partial
//!   failure reporting
//! - **Blacklist store**: SQLite-persisted exclusion rules
//! - **Orchestrator**: drives one pass per account, serializing and
//!   coalescing concurrent requests
//!
//! # Sync pass
//!
//! 1. **Enumerate**: read the source set for the account
//! 2. **Filter**: drop entities matched by exclusion rules
//! 3. **Snapshot**: read the target store state, once
//! 4. **Diff**: compute operations (creates, then updates, then deletes)
//! 5. **Apply**: write batched chunks; report counts, never panic
//!
//! # Example
//!
//! ```
//! use birthcal_sync::diff::{diff, SyncMode};
//! use birthcal_types::{AccountRef, EntityKey, FieldMap, SourceEntity, FIELD_TITLE};
//!
//! let account = AccountRef::new("user@example.com", "com.example");
//! let key = EntityKey::new("contact-1/birthday").unwrap();
//! let mut fields = FieldMap::new();
//! fields.insert(FIELD_TITLE.into(), "Alice's birthday".into());
//!
//! let source = vec![SourceEntity::new(key, account, fields)];
//! let operations = diff(&source, &[], SyncMode::Incremental).unwrap();
//! assert_eq!(operations.len(), 1);
//! ```

pub mod accounts;
pub mod applier;
pub mod blacklist_store;
pub mod diff;
mod error;
pub mod filter;
mod orchestrator;
pub mod source;
mod state;
pub mod target;

pub use accounts::AccountDirectory;
pub use applier::{ApplyReport, BatchApplier};
pub use blacklist_store::BlacklistStore;
pub use diff::{diff, SyncMode};
pub use error::{SyncError, SyncResult};
pub use filter::{apply_exclusions, is_excluded};
pub use orchestrator::{SyncConfig, SyncOrchestrator};
pub use source::SourceEnumerator;
pub use state::{CancelFlag, FailedOperation, SyncOutcome, SyncStatus, SyncSummary};
pub use target::{OpOutcome, TargetStore};
