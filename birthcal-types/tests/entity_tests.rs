use birthcal_types::{
    AccountRef, EntityKey, ExclusionRule, FieldMap, SourceEntity, TargetEntity, TargetId,
    FIELD_DATE, FIELD_TITLE,
};

fn account() -> AccountRef {
    AccountRef::new("user@example.com", "com.example")
}

fn other_account() -> AccountRef {
    AccountRef::new("other@example.com", "com.example")
}

fn entity(key: &str) -> SourceEntity {
    let mut fields = FieldMap::new();
    fields.insert(FIELD_TITLE.into(), "Birthday".into());
    fields.insert(FIELD_DATE.into(), "03-14".into());
    SourceEntity::new(EntityKey::new(key).unwrap(), account(), fields)
}

// ── SourceEntity ─────────────────────────────────────────────────

#[test]
fn source_entity_starts_with_no_groups() {
    assert!(entity("k").groups.is_empty());
}

#[test]
fn with_group_accumulates() {
    let e = entity("k").with_group("Family").with_group("Friends");
    assert_eq!(e.groups.len(), 2);
    assert!(e.groups.contains("Family"));
    assert!(e.groups.contains("Friends"));
}

#[test]
fn with_group_deduplicates() {
    let e = entity("k").with_group("Family").with_group("Family");
    assert_eq!(e.groups.len(), 1);
}

#[test]
fn field_map_iteration_is_sorted() {
    let e = entity("k");
    let names: Vec<&str> = e.fields.keys().map(String::as_str).collect();
    assert_eq!(names, vec![FIELD_DATE, FIELD_TITLE]);
}

// ── TargetEntity ─────────────────────────────────────────────────

#[test]
fn owned_and_foreign_constructors() {
    let key = EntityKey::new("k").unwrap();
    let owned = TargetEntity::owned(key.clone(), TargetId::new(1), FieldMap::new());
    let foreign = TargetEntity::foreign(key, TargetId::new(2), FieldMap::new());
    assert!(owned.owned);
    assert!(!foreign.owned);
}

// ── ExclusionRule ────────────────────────────────────────────────

#[test]
fn account_rule_excludes_everything_under_account() {
    let rule = ExclusionRule::account(account());
    assert!(rule.excludes(&entity("a")));
    assert!(rule.excludes(&entity("b").with_group("Family")));
}

#[test]
fn account_rule_ignores_other_accounts() {
    let rule = ExclusionRule::account(other_account());
    assert!(!rule.excludes(&entity("a")));
}

#[test]
fn group_rule_matches_only_that_group() {
    let rule = ExclusionRule::group(account(), "Family");
    assert!(rule.excludes(&entity("a").with_group("Family")));
    assert!(!rule.excludes(&entity("b").with_group("Friends")));
    assert!(!rule.excludes(&entity("c")));
}

#[test]
fn group_rule_requires_matching_account() {
    let rule = ExclusionRule::group(other_account(), "Family");
    assert!(!rule.excludes(&entity("a").with_group("Family")));
}

#[test]
fn rule_serde_roundtrip() {
    let rule = ExclusionRule::group(account(), "Family");
    let json = serde_json::to_string(&rule).unwrap();
    let back: ExclusionRule = serde_json::from_str(&json).unwrap();
    assert_eq!(rule, back);

    let rule = ExclusionRule::account(account());
    let json = serde_json::to_string(&rule).unwrap();
    let back: ExclusionRule = serde_json::from_str(&json).unwrap();
    assert_eq!(rule, back);
    assert!(back.group.is_none());
}
