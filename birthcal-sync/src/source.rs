//! Source enumeration abstraction.
//!
//! Produces the current set of source entities for an account, before any
//! blacklist filtering. The real implementation reads the platform contact
//! store; the in-memory implementation backs tests.

use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use birthcal_types::{AccountRef, SourceEntity};

/// Enumerates the source entities of an account.
#[async_trait]
pub trait SourceEnumerator: Send + Sync {
    /// Returns the current source set for the account, unfiltered.
    async fn enumerate(&self, account: &AccountRef) -> SyncResult<Vec<SourceEntity>>;
}

/// An in-memory source enumerator for testing.
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory [`SourceEnumerator`] with per-account entity lists and
    /// fault injection.
    #[derive(Debug, Default)]
    pub struct MemorySourceEnumerator {
        entities: Mutex<HashMap<AccountRef, Vec<SourceEntity>>>,
        fail_next: Mutex<u32>,
    }

    impl MemorySourceEnumerator {
        /// Creates an empty enumerator.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Replaces the entity list for an account.
        pub fn set_entities(&self, account: AccountRef, entities: Vec<SourceEntity>) {
            self.entities.lock().unwrap().insert(account, entities);
        }

        /// Makes the next `n` enumerations fail with `StoreUnavailable`.
        pub fn fail_next(&self, n: u32) {
            *self.fail_next.lock().unwrap() = n;
        }
    }

    #[async_trait]
    impl SourceEnumerator for MemorySourceEnumerator {
        async fn enumerate(&self, account: &AccountRef) -> SyncResult<Vec<SourceEntity>> {
            {
                let mut remaining = self.fail_next.lock().unwrap();
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(SyncError::StoreUnavailable(
                        "source enumerator offline".into(),
                    ));
                }
            }
            Ok(self
                .entities
                .lock()
                .unwrap()
                .get(account)
                .cloned()
                .unwrap_or_default())
        }
    }
}
