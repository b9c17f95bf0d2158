//! Account directory abstraction.
//!
//! The platform owns account creation and removal; the core only asks
//! which accounts exist. An account disappearing mid-pass is surfaced as
//! cancellation, not an error.

use crate::error::SyncResult;
use async_trait::async_trait;
use birthcal_types::AccountRef;

/// Read-only view of the platform's account database.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Lists the accounts of one account type.
    async fn accounts_of_type(&self, kind: &str) -> SyncResult<Vec<AccountRef>>;

    /// Whether the account currently exists.
    async fn account_exists(&self, account: &AccountRef) -> SyncResult<bool>;
}

/// An in-memory account directory for testing.
pub mod memory {
    use super::*;
    use std::collections::BTreeSet;
    use std::sync::Mutex;

    /// In-memory [`AccountDirectory`].
    #[derive(Debug, Default)]
    pub struct MemoryAccountDirectory {
        accounts: Mutex<BTreeSet<AccountRef>>,
    }

    impl MemoryAccountDirectory {
        /// Creates an empty directory.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Adds an account.
        pub fn add(&self, account: AccountRef) {
            self.accounts.lock().unwrap().insert(account);
        }

        /// Removes an account.
        pub fn remove(&self, account: &AccountRef) {
            self.accounts.lock().unwrap().remove(account);
        }
    }

    #[async_trait]
    impl AccountDirectory for MemoryAccountDirectory {
        async fn accounts_of_type(&self, kind: &str) -> SyncResult<Vec<AccountRef>> {
            Ok(self
                .accounts
                .lock()
                .unwrap()
                .iter()
                .filter(|a| a.kind == kind)
                .cloned()
                .collect())
        }

        async fn account_exists(&self, account: &AccountRef) -> SyncResult<bool> {
            Ok(self.accounts.lock().unwrap().contains(account))
        }
    }
}
