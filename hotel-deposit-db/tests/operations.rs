use hotel_deposit_catalog::types::*;
use hotel_deposit_db::*;

fn test_hotel(name: &str, city: &str) -> NewHotel {
    NewHotel {
        name: name.to_string(),
        brand_id: None,
        address: Some("1 Main St".to_string()),
        city: Some(city.to_string()),
        state: Some("CA".to_string()),
        zip: Some("94105".to_string()),
        country: DEFAULT_COUNTRY.to_string(),
        phone: Some("555-0100".to_string()),
        slug: hotel_deposit_catalog::hotel_slug(name, Some(city)),
    }
}

fn fixed_policy(amount: f64) -> NewPolicy {
    NewPolicy {
        deposit_amount: RawValue::Float(amount),
        is_percentage: false,
        hold_duration_days: Some(RawValue::Integer(3)),
        refund_terms: Some("Refunded at checkout".to_string()),
    }
}

fn count(conn: &rusqlite::Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .unwrap()
}

#[test]
fn upsert_brand_returns_stable_id() {
    let conn = open_memory().unwrap();
    let first = upsert_brand(&conn, "Hilton").unwrap();
    let second = upsert_brand(&conn, "Hilton").unwrap();
    assert_eq!(first, second);
    assert_eq!(count(&conn, "brands"), 1);
    assert_eq!(find_brand_by_name(&conn, "Hilton").unwrap(), Some(first));
}

#[test]
fn brand_lookup_is_case_sensitive() {
    let conn = open_memory().unwrap();
    let upper = upsert_brand(&conn, "Hilton").unwrap();
    let lower = upsert_brand(&conn, "hilton").unwrap();
    assert_ne!(upper, lower);
    assert_eq!(find_brand_by_name(&conn, "HILTON").unwrap(), None);
}

#[test]
fn upsert_hotel_inserts_then_updates_in_place() {
    let conn = open_memory().unwrap();
    let hotel = test_hotel("Bay Inn", "San Francisco");
    let id = upsert_hotel(&conn, &hotel, &ConflictFields::file_import())
        .unwrap()
        .unwrap();

    let renamed = NewHotel {
        name: "Bay Inn & Suites".to_string(),
        ..hotel.clone()
    };
    let again = upsert_hotel(&conn, &renamed, &ConflictFields::file_import())
        .unwrap()
        .unwrap();
    assert_eq!(id, again);
    assert_eq!(count(&conn, "hotels"), 1);

    let stored = find_hotel(&conn, &hotel.slug).unwrap().unwrap();
    assert_eq!(stored.name, "Bay Inn & Suites");
}

#[test]
fn file_import_conflict_keeps_brand_when_absent() {
    let conn = open_memory().unwrap();
    let brand = upsert_brand(&conn, "Marriott").unwrap();
    let branded = NewHotel {
        brand_id: Some(brand),
        ..test_hotel("Bay Inn", "San Francisco")
    };
    upsert_hotel(&conn, &branded, &ConflictFields::file_import()).unwrap();

    let unbranded = NewHotel {
        brand_id: None,
        ..branded.clone()
    };
    upsert_hotel(&conn, &unbranded, &ConflictFields::file_import()).unwrap();

    let stored = find_hotel(&conn, &branded.slug).unwrap().unwrap();
    assert_eq!(stored.brand_id, Some(brand));
}

#[test]
fn file_import_conflict_leaves_contact_fields_alone() {
    let conn = open_memory().unwrap();
    let hotel = test_hotel("Bay Inn", "San Francisco");
    upsert_hotel(&conn, &hotel, &ConflictFields::file_import()).unwrap();

    let changed = NewHotel {
        phone: Some("555-9999".to_string()),
        address: None,
        ..hotel.clone()
    };
    upsert_hotel(&conn, &changed, &ConflictFields::file_import()).unwrap();

    let stored = find_hotel(&conn, &hotel.slug).unwrap().unwrap();
    assert_eq!(stored.phone.as_deref(), Some("555-0100"));
    assert_eq!(stored.address.as_deref(), Some("1 Main St"));
}

#[test]
fn admin_conflict_fields_coalesce_and_replace() {
    let conn = open_memory().unwrap();
    let hotel = test_hotel("Bay Inn", "San Francisco");
    upsert_hotel(&conn, &hotel, &ConflictFields::admin()).unwrap();

    let changed = NewHotel {
        phone: Some("555-9999".to_string()),
        address: None,
        state: None,
        ..hotel.clone()
    };
    upsert_hotel(&conn, &changed, &ConflictFields::admin()).unwrap();

    let stored = find_hotel(&conn, &hotel.slug).unwrap().unwrap();
    assert_eq!(stored.phone.as_deref(), Some("555-9999"));
    // address coalesces, state is replaced outright
    assert_eq!(stored.address.as_deref(), Some("1 Main St"));
    assert_eq!(stored.state, None);
}

#[test]
fn empty_conflict_set_touches_nothing() {
    let conn = open_memory().unwrap();
    let hotel = test_hotel("Bay Inn", "San Francisco");
    let id = upsert_hotel(&conn, &hotel, &ConflictFields::new()).unwrap();
    let renamed = NewHotel {
        name: "Other".to_string(),
        ..hotel.clone()
    };
    let again = upsert_hotel(&conn, &renamed, &ConflictFields::new()).unwrap();
    assert_eq!(id, again);
    assert_eq!(find_hotel(&conn, &hotel.slug).unwrap().unwrap().name, "Bay Inn");
}

#[test]
fn insert_hotel_rejects_duplicate_slug() {
    let conn = open_memory().unwrap();
    let hotel = test_hotel("Bay Inn", "San Francisco");
    insert_hotel(&conn, &hotel).unwrap();
    let err = insert_hotel(&conn, &hotel).unwrap_err();
    assert!(err.is_constraint_violation());
}

#[test]
fn policy_is_replaced_wholesale() {
    let conn = open_memory().unwrap();
    let id = insert_hotel(&conn, &test_hotel("Bay Inn", "San Francisco")).unwrap();
    upsert_policy(&conn, id, &fixed_policy(100.0), "2024-01-01T00:00:00Z").unwrap();

    let replacement = NewPolicy {
        deposit_amount: RawValue::Float(150.0),
        is_percentage: false,
        hold_duration_days: None,
        refund_terms: None,
    };
    upsert_policy(&conn, id, &replacement, "2024-02-01T00:00:00Z").unwrap();

    assert_eq!(count(&conn, "policies"), 1);
    let policy = find_policy(&conn, id).unwrap().unwrap();
    assert_eq!(policy.deposit_amount, 150.0);
    assert_eq!(policy.hold_duration_days, None);
    assert_eq!(policy.refund_terms, None);
    assert_eq!(policy.last_updated, "2024-02-01T00:00:00Z");
}

#[test]
fn policy_accepts_numeric_text() {
    let conn = open_memory().unwrap();
    let id = insert_hotel(&conn, &test_hotel("Bay Inn", "San Francisco")).unwrap();
    let policy = NewPolicy {
        deposit_amount: RawValue::Text("75.50".to_string()),
        is_percentage: false,
        hold_duration_days: Some(RawValue::Text("2".to_string())),
        refund_terms: None,
    };
    upsert_policy(&conn, id, &policy, "2024-01-01T00:00:00Z").unwrap();
    let stored = find_policy(&conn, id).unwrap().unwrap();
    assert_eq!(stored.deposit_amount, 75.5);
    assert_eq!(stored.hold_duration_days, Some(2));
}

#[test]
fn policy_rejects_non_numeric_amount() {
    let conn = open_memory().unwrap();
    let id = insert_hotel(&conn, &test_hotel("Bay Inn", "San Francisco")).unwrap();
    let policy = NewPolicy {
        deposit_amount: RawValue::Text("call hotel".to_string()),
        ..fixed_policy(0.0)
    };
    let err = upsert_policy(&conn, id, &policy, "2024-01-01T00:00:00Z").unwrap_err();
    assert!(err.is_constraint_violation());
    assert_eq!(count(&conn, "policies"), 0);
}

#[test]
fn policy_for_missing_hotel_violates_foreign_key() {
    let conn = open_memory().unwrap();
    let err = upsert_policy(&conn, 999, &fixed_policy(10.0), "2024-01-01T00:00:00Z").unwrap_err();
    assert!(err.is_constraint_violation());
}

#[test]
fn deleting_hotel_cascades_to_policy() {
    let conn = open_memory().unwrap();
    let id = insert_hotel(&conn, &test_hotel("Bay Inn", "San Francisco")).unwrap();
    upsert_policy(&conn, id, &fixed_policy(100.0), "2024-01-01T00:00:00Z").unwrap();
    delete_hotel(&conn, id).unwrap();
    assert_eq!(count(&conn, "policies"), 0);

    let err = delete_hotel(&conn, id).unwrap_err();
    assert!(matches!(err, OperationError::NotFound { .. }));
}

#[test]
fn deleting_brand_unlinks_hotels() {
    let conn = open_memory().unwrap();
    let brand = upsert_brand(&conn, "Hyatt").unwrap();
    let hotel = NewHotel {
        brand_id: Some(brand),
        ..test_hotel("Bay Inn", "San Francisco")
    };
    insert_hotel(&conn, &hotel).unwrap();
    delete_brand(&conn, brand).unwrap();

    let stored = find_hotel(&conn, &hotel.slug).unwrap().unwrap();
    assert_eq!(stored.brand_id, None);
}

#[test]
fn update_hotel_requires_existing_row() {
    let conn = open_memory().unwrap();
    let err = update_hotel(&conn, 42, &test_hotel("Bay Inn", "San Francisco")).unwrap_err();
    assert!(matches!(err, OperationError::NotFound { .. }));
}

#[test]
fn import_log_roundtrip() {
    let conn = open_memory().unwrap();
    let entry = ImportLog {
        id: 0,
        source_type: "csv".to_string(),
        source_name: "hotels.csv".to_string(),
        imported_at: "2024-01-01T00:00:00Z".to_string(),
        records_created: 4,
        records_updated: 0,
        records_skipped: 1,
    };
    let id = insert_import_log(&conn, &entry).unwrap();
    assert!(id > 0);
    let logs = list_import_logs(&conn, None).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].records_skipped, 1);
}
