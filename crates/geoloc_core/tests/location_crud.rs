use geoloc_core::db::migrations::latest_version;
use geoloc_core::db::open_db_in_memory;
use geoloc_core::{
    Geo, LocationDraft, LocationPatch, LocationStore, ManualClock, SqliteLocationStore,
    StoreError,
};
use rusqlite::Connection;
use std::collections::HashSet;
use uuid::Uuid;

const T: i64 = 1_700_000_000_000;

fn draft(name: &str, rate: u8) -> LocationDraft {
    LocationDraft::new(name, rate, Geo::new(35.68, 139.69, "Tokyo, Japan", 12))
}

#[test]
fn create_assigns_id_and_equal_timestamps() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(T);
    let store = SqliteLocationStore::with_clock(&conn, &clock).unwrap();

    let created = store.create(&draft("Tokyo", 5)).unwrap();
    assert!(!created.id.is_nil());
    assert_eq!(created.created_at, T);
    assert_eq!(created.updated_at, T);

    let loaded = store.get_by_id(created.id).unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn create_ignores_caller_supplied_id() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteLocationStore::try_new(&conn).unwrap();

    let requested = Uuid::new_v4();
    let created = store.create(&draft("Tokyo", 5).with_id(requested)).unwrap();
    assert_ne!(created.id, requested);
}

#[test]
fn create_generates_unique_ids() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteLocationStore::try_new(&conn).unwrap();

    let ids: HashSet<_> = (0..50)
        .map(|idx| store.create(&draft(&format!("spot {idx}"), 3)).unwrap().id)
        .collect();
    assert_eq!(ids.len(), 50);
}

#[test]
fn validation_failure_blocks_create_and_update() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteLocationStore::try_new(&conn).unwrap();

    let err = store.create(&draft("  ", 3)).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    let err = store.create(&draft("Tokyo", 0)).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(store.count().unwrap(), 0);

    let created = store.create(&draft("Tokyo", 3)).unwrap();
    let patch = LocationPatch {
        rate: Some(7),
        ..LocationPatch::default()
    };
    let err = store.update(created.id, &patch).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(store.get_by_id(created.id).unwrap(), created);
}

#[test]
fn update_merges_patch_and_refreshes_updated_at() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(T);
    let store = SqliteLocationStore::with_clock(&conn, &clock).unwrap();

    let created = store.create(&draft("Tokyo", 3)).unwrap();
    clock.advance(5_000);

    let patch = LocationPatch {
        rate: Some(5),
        ..LocationPatch::default()
    };
    let updated = store.update(created.id, &patch).unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Tokyo");
    assert_eq!(updated.rate, 5);
    assert_eq!(updated.created_at, T);
    assert_eq!(updated.updated_at, T + 5_000);
    assert_eq!(store.get_by_id(created.id).unwrap(), updated);
}

#[test]
fn update_within_same_millisecond_still_marks_record_updated() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(T);
    let store = SqliteLocationStore::with_clock(&conn, &clock).unwrap();

    let created = store.create(&draft("Tokyo", 3)).unwrap();
    let patch = LocationPatch {
        name: Some("Tokyo Tower".to_string()),
        ..LocationPatch::default()
    };
    let updated = store.update(created.id, &patch).unwrap();
    assert!(updated.was_updated());
    assert_eq!(updated.updated_at, T + 1);
}

#[test]
fn update_not_found_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteLocationStore::try_new(&conn).unwrap();

    let missing = Uuid::new_v4();
    let err = store.update(missing, &LocationPatch::default()).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == missing));
}

#[test]
fn second_remove_surfaces_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteLocationStore::try_new(&conn).unwrap();

    let created = store.create(&draft("Tokyo", 3)).unwrap();
    store.remove(created.id).unwrap();

    let err = store.remove(created.id).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == created.id));
    let err = store.get_by_id(created.id).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn list_returns_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(T);
    let store = SqliteLocationStore::with_clock(&conn, &clock).unwrap();

    let c = store.create(&draft("c", 1)).unwrap();
    let a = store.create(&draft("a", 1)).unwrap();
    let b = store.create(&draft("b", 1)).unwrap();

    // Updating must not move a record.
    clock.advance(10);
    store
        .update(
            c.id,
            &LocationPatch {
                rate: Some(2),
                ..LocationPatch::default()
            },
        )
        .unwrap();

    let ids: Vec<_> = store.list().unwrap().into_iter().map(|loc| loc.id).collect();
    assert_eq!(ids, vec![c.id, a.id, b.id]);
}

#[test]
fn writes_are_visible_through_a_reopened_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("geoloc.db");

    let created = {
        let conn = geoloc_core::db::open_db(&path).unwrap();
        let store = SqliteLocationStore::try_new(&conn).unwrap();
        store.create(&draft("Tokyo", 4)).unwrap()
    };

    let conn = geoloc_core::db::open_db(&path).unwrap();
    let store = SqliteLocationStore::try_new(&conn).unwrap();
    assert_eq!(store.get_by_id(created.id).unwrap(), created);
}

#[test]
fn read_rejects_corrupted_rows() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO locations (id, name, rate, lat, lng, address, zoom, created_at, updated_at)
         VALUES ('not-a-uuid', 'Tokyo', 3, 0, 0, '', 1, 1, 1);",
        [],
    )
    .unwrap();
    let store = SqliteLocationStore::try_new(&conn).unwrap();

    let err = store.list().unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}

#[test]
fn read_reports_rows_breaking_location_rules_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("PRAGMA ignore_check_constraints = ON;").unwrap();
    let bad_rate = Uuid::new_v4();
    let bad_order = Uuid::new_v4();
    conn.execute(
        "INSERT INTO locations (id, name, rate, lat, lng, address, zoom, created_at, updated_at)
         VALUES (?1, 'Tokyo', 9, 0, 0, '', 1, 1, 1),
                (?2, 'Osaka', 3, 0, 0, '', 1, 10, 5);",
        [bad_rate.to_string(), bad_order.to_string()],
    )
    .unwrap();
    let store = SqliteLocationStore::try_new(&conn).unwrap();

    let err = store.get_by_id(bad_rate).unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(message) if message.contains('9')));
    let err = store.get_by_id(bad_order).unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
    assert!(matches!(store.list(), Err(StoreError::InvalidData(_))));
}

#[test]
fn update_of_record_created_at_max_timestamp_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO locations (id, name, rate, lat, lng, address, zoom, created_at, updated_at)
         VALUES (?1, 'Tokyo', 3, 0, 0, '', 1, ?2, ?2);",
        rusqlite::params![id.to_string(), i64::MAX],
    )
    .unwrap();
    let store = SqliteLocationStore::try_new(&conn).unwrap();

    let patch = LocationPatch {
        rate: Some(4),
        ..LocationPatch::default()
    };
    let err = store.update(id, &patch).unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
    assert_eq!(store.get_by_id(id).unwrap().rate, 3);
}

#[test]
fn store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteLocationStore::try_new(&conn) {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn store_rejects_connection_without_locations_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteLocationStore::try_new(&conn);
    assert!(matches!(
        result,
        Err(StoreError::MissingRequiredTable("locations"))
    ));
}

#[test]
fn store_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE locations (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            rate INTEGER NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteLocationStore::try_new(&conn);
    assert!(matches!(
        result,
        Err(StoreError::MissingRequiredColumn {
            table: "locations",
            column: "lat"
        })
    ));
}
