//! Source and target entity records, and exclusion rules.
//!
//! A source entity is one record eligible for materialization (e.g., one
//! birthday occurrence for one contact). A target entity is the record
//! currently materialized in the target store. Both carry the same stable
//! key scheme so the diff engine can correlate them.

use crate::{AccountRef, EntityKey, TargetId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Deterministic, ordered mapping of field name to value.
///
/// `BTreeMap` keeps iteration order stable so two entities built from the
/// same source data always compare (and serialize) identically.
pub type FieldMap = BTreeMap<String, String>;

/// Well-known field name: event title.
pub const FIELD_TITLE: &str = "title";
/// Well-known field name: event date (`MM-DD` or `YYYY-MM-DD`).
pub const FIELD_DATE: &str = "date";
/// Well-known field name: reminder lead time in minutes.
pub const FIELD_REMINDER_MINUTES: &str = "reminder_minutes";
/// Well-known field name: display color.
pub const FIELD_COLOR: &str = "color";

/// One record eligible for materialization in the target store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntity {
    /// Stable identifier, unique per entity within one sync session.
    pub key: EntityKey,
    /// The owning account.
    pub account: AccountRef,
    /// Group labels the entity belongs to (may be empty).
    #[serde(default)]
    pub groups: BTreeSet<String>,
    /// Field values, deterministic given the same source data.
    pub fields: FieldMap,
}

impl SourceEntity {
    /// Creates a source entity with no group memberships.
    #[must_use]
    pub fn new(key: EntityKey, account: AccountRef, fields: FieldMap) -> Self {
        Self {
            key,
            account,
            groups: BTreeSet::new(),
            fields,
        }
    }

    /// Adds a group membership.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.insert(group.into());
        self
    }
}

/// One record currently materialized in the target store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetEntity {
    /// Stable identifier, same scheme as [`SourceEntity::key`].
    pub key: EntityKey,
    /// Opaque handle assigned by the target store on creation.
    pub target_id: TargetId,
    /// Last-known materialized field values.
    pub fields: FieldMap,
    /// Whether this record was created by this sync adapter.
    /// Records created by other sources are never deleted in incremental
    /// mode.
    pub owned: bool,
}

impl TargetEntity {
    /// Creates a target entity owned by this adapter.
    #[must_use]
    pub fn owned(key: EntityKey, target_id: TargetId, fields: FieldMap) -> Self {
        Self {
            key,
            target_id,
            fields,
            owned: true,
        }
    }

    /// Creates a target entity owned by some other source.
    #[must_use]
    pub fn foreign(key: EntityKey, target_id: TargetId, fields: FieldMap) -> Self {
        Self {
            key,
            target_id,
            fields,
            owned: false,
        }
    }
}

/// One blacklist entry.
///
/// A rule with `group = None` suppresses all entities for the account,
/// regardless of any group-specific rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExclusionRule {
    /// The account the rule applies to.
    pub account: AccountRef,
    /// Group label, or `None` for "entire account excluded".
    pub group: Option<String>,
}

impl ExclusionRule {
    /// Creates a whole-account exclusion.
    #[must_use]
    pub fn account(account: AccountRef) -> Self {
        Self {
            account,
            group: None,
        }
    }

    /// Creates a single-group exclusion under an account.
    #[must_use]
    pub fn group(account: AccountRef, group: impl Into<String>) -> Self {
        Self {
            account,
            group: Some(group.into()),
        }
    }

    /// Returns true if this rule suppresses the given entity.
    #[must_use]
    pub fn excludes(&self, entity: &SourceEntity) -> bool {
        if self.account != entity.account {
            return false;
        }
        match &self.group {
            None => true,
            Some(group) => entity.groups.contains(group),
        }
    }
}
