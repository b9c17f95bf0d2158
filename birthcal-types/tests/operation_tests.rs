use birthcal_types::{EntityKey, FieldMap, OperationKind, SyncOperation, TargetId};

fn fields() -> FieldMap {
    let mut f = FieldMap::new();
    f.insert("title".into(), "Birthday".into());
    f
}

#[test]
fn kind_matches_variant() {
    let create = SyncOperation::Create {
        key: EntityKey::new("k").unwrap(),
        fields: fields(),
    };
    let update = SyncOperation::Update {
        target_id: TargetId::new(1),
        fields: fields(),
    };
    let delete = SyncOperation::Delete {
        target_id: TargetId::new(1),
    };

    assert_eq!(create.kind(), OperationKind::Create);
    assert_eq!(update.kind(), OperationKind::Update);
    assert_eq!(delete.kind(), OperationKind::Delete);
}

#[test]
fn display_is_compact() {
    let create = SyncOperation::Create {
        key: EntityKey::new("contact-1/birthday").unwrap(),
        fields: fields(),
    };
    assert_eq!(create.to_string(), "create(contact-1/birthday)");

    let delete = SyncOperation::Delete {
        target_id: TargetId::new(9),
    };
    assert_eq!(delete.to_string(), "delete(#9)");
}

#[test]
fn operation_kind_display() {
    assert_eq!(OperationKind::Create.to_string(), "create");
    assert_eq!(OperationKind::Update.to_string(), "update");
    assert_eq!(OperationKind::Delete.to_string(), "delete");
}

#[test]
fn serde_roundtrip_all_variants() {
    let operations = vec![
        SyncOperation::Create {
            key: EntityKey::new("k").unwrap(),
            fields: fields(),
        },
        SyncOperation::Update {
            target_id: TargetId::new(3),
            fields: fields(),
        },
        SyncOperation::Delete {
            target_id: TargetId::new(4),
        },
    ];
    let json = serde_json::to_string(&operations).unwrap();
    let back: Vec<SyncOperation> = serde_json::from_str(&json).unwrap();
    assert_eq!(operations, back);
}

#[test]
fn serde_is_tagged() {
    let delete = SyncOperation::Delete {
        target_id: TargetId::new(4),
    };
    let json = serde_json::to_string(&delete).unwrap();
    assert!(json.contains("\"op\""), "expected tagged representation: {json}");
}
