use birthcal_types::{AccountRef, EntityKey, PassId, TargetId};
use proptest::prelude::*;
use std::collections::HashSet;
use std::str::FromStr;

// ── EntityKey ────────────────────────────────────────────────────

#[test]
fn entity_key_new() {
    let key = EntityKey::new("contact-42/birthday").unwrap();
    assert_eq!(key.as_str(), "contact-42/birthday");
}

#[test]
fn entity_key_empty_rejected() {
    assert!(EntityKey::new("").is_err());
}

#[test]
fn entity_key_display_and_parse() {
    let key = EntityKey::new("contact-7/anniversary").unwrap();
    let parsed = EntityKey::from_str(&key.to_string()).unwrap();
    assert_eq!(key, parsed);
}

#[test]
fn entity_key_hash_and_eq() {
    let a = EntityKey::new("k").unwrap();
    let b = EntityKey::new("k").unwrap();
    let mut set = HashSet::new();
    set.insert(a);
    set.insert(b);
    assert_eq!(set.len(), 1);
}

#[test]
fn entity_key_ordering_is_lexicographic() {
    let a = EntityKey::new("a").unwrap();
    let b = EntityKey::new("b").unwrap();
    assert!(a < b);
}

// ── TargetId ─────────────────────────────────────────────────────

#[test]
fn target_id_roundtrip() {
    let id = TargetId::new(42);
    assert_eq!(id.as_i64(), 42);
    assert_eq!(id.to_string(), "42");
}

#[test]
fn target_id_eq() {
    assert_eq!(TargetId::new(7), TargetId::new(7));
    assert_ne!(TargetId::new(7), TargetId::new(8));
}

// ── AccountRef ───────────────────────────────────────────────────

#[test]
fn account_ref_display() {
    let account = AccountRef::new("user@example.com", "com.example.provider");
    assert_eq!(account.to_string(), "com.example.provider:user@example.com");
}

#[test]
fn account_ref_parse_roundtrip() {
    let account = AccountRef::new("user@example.com", "com.example.provider");
    let parsed = AccountRef::from_str(&account.to_string()).unwrap();
    assert_eq!(account, parsed);
}

#[test]
fn account_ref_parse_keeps_colons_in_name() {
    // Only the first colon separates kind from name.
    let parsed = AccountRef::from_str("com.example:user:alias").unwrap();
    assert_eq!(parsed.kind, "com.example");
    assert_eq!(parsed.name, "user:alias");
}

#[test]
fn account_ref_parse_invalid() {
    assert!(AccountRef::from_str("no-separator").is_err());
    assert!(AccountRef::from_str(":name-only").is_err());
    assert!(AccountRef::from_str("kind-only:").is_err());
}

#[test]
fn account_ref_same_name_different_kind_is_distinct() {
    let a = AccountRef::new("user", "com.a");
    let b = AccountRef::new("user", "com.b");
    assert_ne!(a, b);
}

// ── PassId ───────────────────────────────────────────────────────

#[test]
fn pass_id_new_is_unique() {
    assert_ne!(PassId::new(), PassId::new());
}

#[test]
fn pass_id_display_and_parse() {
    let id = PassId::new();
    let parsed = PassId::from_str(&id.to_string()).unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn pass_id_from_uuid_roundtrip() {
    let uuid = uuid::Uuid::now_v7();
    let id = PassId::from_uuid(uuid);
    assert_eq!(id.as_uuid(), uuid);
}

// ── Properties ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn entity_key_roundtrips_any_nonempty_string(s in ".+") {
        let key = EntityKey::new(s.clone()).unwrap();
        prop_assert_eq!(key.as_str(), s.as_str());
        let parsed = EntityKey::from_str(&s).unwrap();
        prop_assert_eq!(key, parsed);
    }

    #[test]
    fn account_ref_display_parse_roundtrip(
        kind in "[a-z][a-z.]{0,20}",
        name in "[a-zA-Z0-9@._-]{1,30}",
    ) {
        let account = AccountRef::new(name, kind);
        let parsed = AccountRef::from_str(&account.to_string()).unwrap();
        prop_assert_eq!(account, parsed);
    }
}
