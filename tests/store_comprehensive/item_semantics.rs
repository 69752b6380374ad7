//! Item semantics through the public API: overwrite, merge, idempotent
//! delete, scan/query bounds, and the exact-decimal read-back scenario.

use serde_json::json;
use stashdb::{Attr, Number, ScanFilter, StashError};

use crate::test_utils::{active_table, stash, string_key};

#[test]
fn put_get_exact_decimal_scenario() {
    let stash = stash();
    active_table(&stash, "t1");
    let items = stash.items("t1");

    items.put_json(&json!({"id": "1", "score": 3.14})).unwrap();

    let shown = items.get_json(&string_key("id", "1")).unwrap().unwrap();
    assert_eq!(shown, json!({"id": "1", "score": 3.14}));

    let exact = items.get(&string_key("id", "1")).unwrap().unwrap();
    assert_eq!(
        exact.get("score").and_then(Attr::as_n).map(Number::as_str),
        Some("3.14")
    );
}

#[test]
fn put_overwrites_not_merges() {
    let stash = stash();
    active_table(&stash, "t1");
    let items = stash.items("t1");

    items.put_json(&json!({"id": "k", "a": 1, "b": 2})).unwrap();
    items.put_json(&json!({"id": "k", "c": 3})).unwrap();

    assert_eq!(
        items.get_json(&string_key("id", "k")).unwrap().unwrap(),
        json!({"id": "k", "c": 3})
    );
}

#[test]
fn update_merges_named_attributes_only() {
    let stash = stash();
    active_table(&stash, "t1");
    let items = stash.items("t1");

    items.put_json(&json!({"id": "k", "a": 1, "b": 2})).unwrap();
    items
        .update_json(&string_key("id", "k"), &json!({"b": 3}))
        .unwrap();

    assert_eq!(
        items.get_json(&string_key("id", "k")).unwrap().unwrap(),
        json!({"id": "k", "a": 1, "b": 3})
    );
}

#[test]
fn update_upserts_when_absent() {
    let stash = stash();
    active_table(&stash, "t1");
    let items = stash.items("t1");

    items
        .update_json(&string_key("id", "fresh"), &json!({"status": "active"}))
        .unwrap();
    assert_eq!(
        items.get_json(&string_key("id", "fresh")).unwrap().unwrap(),
        json!({"id": "fresh", "status": "active"})
    );
}

#[test]
fn delete_is_idempotent() {
    let stash = stash();
    active_table(&stash, "t1");
    let items = stash.items("t1");

    items.put_json(&json!({"id": "k"})).unwrap();
    assert!(items.delete(&string_key("id", "k")).is_ok());
    assert!(items.delete(&string_key("id", "k")).is_ok());
    assert!(items.get(&string_key("id", "k")).unwrap().is_none());
}

#[test]
fn absence_is_a_value_not_an_error() {
    let stash = stash();
    active_table(&stash, "t1");

    let got = stash.items("t1").get(&string_key("id", "never")).unwrap();
    assert_eq!(got, None);
}

#[test]
fn put_without_key_is_a_validation_error() {
    let stash = stash();
    active_table(&stash, "t1");

    let err = stash
        .items("t1")
        .put_json(&json!({"name": "no key here"}))
        .unwrap_err();
    match err {
        StashError::Validation { reason } => assert!(reason.contains("id")),
        other => panic!("expected Validation, got {:?}", other),
    }
}

#[test]
fn scan_bounds_and_filters() {
    let stash = stash();
    active_table(&stash, "t1");
    let items = stash.items("t1");

    for i in 0..20 {
        let mut doc = json!({"id": format!("{:02}", i)});
        if i < 5 {
            doc["email"] = json!(format!("user{}@example.com", i));
        }
        items.put_json(&doc).unwrap();
    }

    assert_eq!(items.scan(Some(7), None).unwrap().len(), 7);

    let with_email = items
        .scan(Some(10), Some(&ScanFilter::AttrExists("email".into())))
        .unwrap();
    assert_eq!(with_email.len(), 5);
    assert!(with_email.iter().all(|i| i.contains_key("email")));
}

#[test]
fn query_is_partition_equality_only() {
    let stash = stash();
    active_table(&stash, "t1");
    let items = stash.items("t1");

    items.put_json(&json!({"id": "123", "name": "John Doe"})).unwrap();

    let hits = items.query(&Attr::from("123"), Some(10)).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].get("name").and_then(Attr::as_s), Some("John Doe"));

    assert!(items.query(&Attr::from("999"), Some(10)).unwrap().is_empty());
}

#[test]
fn operations_on_absent_table_fail_with_table_not_found() {
    let stash = stash();
    let items = stash.items("ghost");

    assert!(matches!(
        items.put_json(&json!({"id": "1"})),
        Err(StashError::TableNotFound { .. })
    ));
    assert!(matches!(
        items.scan(None, None),
        Err(StashError::TableNotFound { .. })
    ));
}
