//! Persistent storage for exclusion rules (the account/group blacklist).
//!
//! Uses its own SQLite file so user-edited exclusion state survives
//! restarts independently of any target-store state. The persisted schema
//! is one row per rule: account name, account type, optional group label.

use crate::error::SyncError;
use birthcal_types::{AccountRef, ExclusionRule};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

/// Persistent store for exclusion rules backed by SQLite.
pub struct BlacklistStore {
    conn: Arc<Mutex<Connection>>,
}

impl BlacklistStore {
    /// Opens (or creates) a blacklist store at the given path.
    pub fn new(path: &str) -> Result<Self, SyncError> {
        let conn = Connection::open(path)
            .map_err(|e| SyncError::Storage(format!("failed to open blacklist store: {e}")))?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Opens an in-memory blacklist store (for testing).
    pub fn open_in_memory() -> Result<Self, SyncError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            SyncError::Storage(format!("failed to open in-memory blacklist store: {e}"))
        })?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), SyncError> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS blacklist (
                account_name TEXT NOT NULL,
                account_type TEXT NOT NULL,
                group_label TEXT,
                UNIQUE(account_name, account_type, group_label)
            );
            ",
        )
        .map_err(|e| SyncError::Storage(format!("failed to init blacklist schema: {e}")))?;
        Ok(())
    }

    /// Loads rules, optionally restricted to one account.
    pub fn get_rules(&self, account: Option<&AccountRef>) -> Result<Vec<ExclusionRule>, SyncError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT account_name, account_type, group_label FROM blacklist
                 WHERE ?1 IS NULL OR (account_name = ?1 AND account_type = ?2)
                 ORDER BY account_type, account_name, group_label",
            )
            .map_err(|e| SyncError::Storage(format!("failed to prepare blacklist query: {e}")))?;

        let rows = stmt
            .query_map(
                params![
                    account.map(|a| a.name.as_str()),
                    account.map(|a| a.kind.as_str()),
                ],
                |row| {
                    let name: String = row.get(0)?;
                    let kind: String = row.get(1)?;
                    let group: Option<String> = row.get(2)?;
                    Ok((name, kind, group))
                },
            )
            .map_err(|e| SyncError::Storage(format!("failed to query blacklist: {e}")))?;

        let mut result = Vec::new();
        for row in rows {
            let (name, kind, group) =
                row.map_err(|e| SyncError::Storage(format!("failed to read blacklist row: {e}")))?;
            result.push(ExclusionRule {
                account: AccountRef::new(name, kind),
                group,
            });
        }
        Ok(result)
    }

    /// Replaces the entire rule set: clear then bulk insert, in one
    /// transaction. Callers pass the complete desired rule set each time.
    pub fn set_rules(&self, rules: &[ExclusionRule]) -> Result<(), SyncError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn
            .transaction()
            .map_err(|e| SyncError::Storage(format!("failed to begin transaction: {e}")))?;

        tx.execute("DELETE FROM blacklist", [])
            .map_err(|e| SyncError::Storage(format!("failed to clear blacklist: {e}")))?;
        for rule in rules {
            tx.execute(
                "INSERT OR IGNORE INTO blacklist (account_name, account_type, group_label) VALUES (?1, ?2, ?3)",
                params![rule.account.name, rule.account.kind, rule.group],
            )
            .map_err(|e| SyncError::Storage(format!("failed to insert blacklist rule: {e}")))?;
        }

        tx.commit()
            .map_err(|e| SyncError::Storage(format!("failed to commit blacklist: {e}")))?;
        Ok(())
    }

    /// Adds a single rule. No-op if it already exists.
    pub fn add_rule(&self, rule: &ExclusionRule) -> Result<(), SyncError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO blacklist (account_name, account_type, group_label) VALUES (?1, ?2, ?3)",
            params![rule.account.name, rule.account.kind, rule.group],
        )
        .map_err(|e| SyncError::Storage(format!("failed to add blacklist rule: {e}")))?;
        Ok(())
    }

    /// Removes a single rule.
    pub fn remove_rule(&self, rule: &ExclusionRule) -> Result<(), SyncError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM blacklist
             WHERE account_name = ?1 AND account_type = ?2
               AND (group_label = ?3 OR (group_label IS NULL AND ?3 IS NULL))",
            params![rule.account.name, rule.account.kind, rule.group],
        )
        .map_err(|e| SyncError::Storage(format!("failed to remove blacklist rule: {e}")))?;
        Ok(())
    }

    /// Removes every rule.
    pub fn clear(&self) -> Result<(), SyncError> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM blacklist", [])
            .map_err(|e| SyncError::Storage(format!("failed to clear blacklist: {e}")))?;
        Ok(())
    }

    /// Returns the number of persisted rules.
    pub fn rule_count(&self) -> Result<usize, SyncError> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM blacklist", [], |row| row.get(0))
            .map_err(|e| SyncError::Storage(format!("failed to count blacklist: {e}")))?;
        Ok(count as usize)
    }
}
