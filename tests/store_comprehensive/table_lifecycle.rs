//! Table lifecycle: create/describe/delete and the ensure-exists race.

use std::time::Duration;

use stashdb::{StashError, TableSpec, TableStatus};

use crate::test_utils::{active_table, slow_stash, stash};

#[test]
fn create_then_ensure_is_noop() {
    let stash = stash();
    active_table(&stash, "t1");

    // EnsureExists on an Active table returns immediately with no second
    // creation
    let description = stash
        .tables()
        .ensure_exists(&TableSpec::simple("t1", "id"))
        .unwrap();
    assert_eq!(description.status, TableStatus::Active);
    assert_eq!(stash.tables().list().unwrap(), vec!["t1"]);
}

#[test]
fn describe_absent_table_fails() {
    let stash = stash();
    assert!(matches!(
        stash.tables().describe("ghost"),
        Err(StashError::TableNotFound { .. })
    ));
}

#[test]
fn create_existing_table_fails_cleanly() {
    let stash = stash();
    active_table(&stash, "t1");
    let err = stash
        .tables()
        .create(&TableSpec::simple("t1", "id"))
        .unwrap_err();
    assert_eq!(err, StashError::TableAlreadyExists { table: "t1".into() });
}

#[test]
fn lifecycle_passes_through_creating_and_deleting() {
    let stash = slow_stash(Duration::from_millis(60));
    let tables = stash.tables();

    let created = tables.create(&TableSpec::simple("t1", "id")).unwrap();
    assert_eq!(created.status, TableStatus::Creating);
    assert_eq!(tables.describe("t1").unwrap().status, TableStatus::Creating);

    std::thread::sleep(Duration::from_millis(80));
    assert_eq!(tables.describe("t1").unwrap().status, TableStatus::Active);

    let deleted = tables.delete("t1").unwrap();
    assert_eq!(deleted.status, TableStatus::Deleting);

    std::thread::sleep(Duration::from_millis(80));
    assert!(matches!(
        tables.describe("t1"),
        Err(StashError::TableNotFound { .. })
    ));
}

#[test]
fn concurrent_ensure_exists_creates_exactly_one_table() {
    let stash = slow_stash(Duration::from_millis(40));
    let spec = TableSpec::simple("shared", "id");

    let handles: Vec<_> = (0..12)
        .map(|_| {
            let tables = stash.tables();
            let spec = spec.clone();
            std::thread::spawn(move || tables.ensure_exists(&spec))
        })
        .collect();

    // Every caller succeeds; no duplicate-table error escapes
    for handle in handles {
        let description = handle.join().unwrap().unwrap();
        assert_eq!(description.status, TableStatus::Active);
    }
    assert_eq!(stash.tables().list().unwrap(), vec!["shared"]);
}

#[test]
fn ensure_exists_respects_ceiling() {
    let stash = slow_stash(Duration::from_secs(120));
    let tables = stash.tables().with_create_timeout(Duration::from_millis(200));

    let err = tables
        .ensure_exists(&TableSpec::simple("never-active", "id"))
        .unwrap_err();
    match err {
        StashError::TableCreateTimeout { table, waited_ms } => {
            assert_eq!(table, "never-active");
            assert!(waited_ms >= 200);
        }
        other => panic!("expected TableCreateTimeout, got {:?}", other),
    }
}
