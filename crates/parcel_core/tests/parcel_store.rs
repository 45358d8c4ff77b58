use parcel_core::db::open_db_in_memory;
use parcel_core::{NewParcel, ParcelStatus, ParcelStore, SqliteParcelStore, StoreError};
use rusqlite::Connection;

#[test]
fn add_assigns_number_and_forces_registered_status() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();

    let number = store.add(&NewParcel::new(1, "Pskov, Pushkina st. 5")).unwrap();

    let loaded = store.get(number).unwrap();
    assert_eq!(loaded.number, number);
    assert_eq!(loaded.client, 1);
    assert_eq!(loaded.status, ParcelStatus::Registered);
    assert_eq!(loaded.address, "Pskov, Pushkina st. 5");
    assert!(chrono::DateTime::parse_from_rfc3339(&loaded.created_at).is_ok());
}

#[test]
fn created_at_text_sorts_in_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();

    let first = store.add(&NewParcel::new(1, "a")).unwrap();
    let second = store.add(&NewParcel::new(1, "b")).unwrap();

    let first = store.get(first).unwrap();
    let second = store.get(second).unwrap();
    assert!(first.created_at <= second.created_at);
}

#[test]
fn get_missing_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();

    let err = store.get(42).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(42)));
    assert!(err.is_not_found());
}

#[test]
fn get_by_client_filters_and_keeps_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();

    let a = store.add(&NewParcel::new(1, "a")).unwrap();
    store.add(&NewParcel::new(2, "other client")).unwrap();
    let b = store.add(&NewParcel::new(1, "b")).unwrap();

    let numbers: Vec<_> = store
        .get_by_client(1)
        .unwrap()
        .into_iter()
        .map(|parcel| parcel.number)
        .collect();
    assert_eq!(numbers, vec![a, b]);

    assert!(store.get_by_client(99).unwrap().is_empty());
}

#[test]
fn setters_overwrite_without_lifecycle_checks() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();

    let number = store.add(&NewParcel::new(1, "a")).unwrap();
    store.set_status(number, ParcelStatus::Delivered).unwrap();
    store.set_address(number, "changed after delivery").unwrap();

    let loaded = store.get(number).unwrap();
    assert_eq!(loaded.status, ParcelStatus::Delivered);
    assert_eq!(loaded.address, "changed after delivery");

    store.delete(number).unwrap();
    assert!(store.get(number).unwrap_err().is_not_found());
}

#[test]
fn mutations_on_missing_parcel_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();

    assert!(matches!(
        store.set_status(5, ParcelStatus::Sent),
        Err(StoreError::NotFound(5))
    ));
    assert!(matches!(
        store.set_address(5, "nowhere"),
        Err(StoreError::NotFound(5))
    ));
    assert!(matches!(store.delete(5), Err(StoreError::NotFound(5))));
}

#[test]
fn deleted_numbers_are_not_reused() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();

    let first = store.add(&NewParcel::new(1, "a")).unwrap();
    store.delete(first).unwrap();
    let second = store.add(&NewParcel::new(1, "b")).unwrap();

    assert!(second > first);
}

#[test]
fn unknown_persisted_status_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();

    let number = store.add(&NewParcel::new(1, "a")).unwrap();
    conn.execute("UPDATE parcel SET status = 'lost' WHERE number = ?1;", [number])
        .unwrap();

    let err = store.get(number).unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(message) if message.contains("lost")));
}

#[test]
fn missing_address_or_timestamp_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteParcelStore::try_new(&conn).unwrap();

    conn.execute(
        "INSERT INTO parcel (number, client, status, address, created_at)
         VALUES (1, 1, 'registered', NULL, '2024-01-01T00:00:00.000Z');",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO parcel (number, client, status, address, created_at)
         VALUES (2, 1, 'registered', 'Pskov', NULL);",
        [],
    )
    .unwrap();

    let err = store.get(1).unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(message) if message.contains("parcel.address")));
    let err = store.get(2).unwrap_err();
    assert!(
        matches!(err, StoreError::InvalidData(message) if message.contains("parcel.created_at"))
    );
    assert!(matches!(
        store.get_by_client(1),
        Err(StoreError::InvalidData(_))
    ));
}

#[test]
fn store_accepts_externally_created_table_without_user_version() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS parcel (
            number INTEGER PRIMARY KEY AUTOINCREMENT,
            client INTEGER,
            status TEXT,
            address TEXT,
            created_at TEXT
        );",
    )
    .unwrap();

    let store = SqliteParcelStore::try_new(&conn).unwrap();
    let number = store.add(&NewParcel::new(1, "a")).unwrap();
    assert_eq!(store.get(number).unwrap().status, ParcelStatus::Registered);
}

#[test]
fn store_rejects_connection_without_parcel_table() {
    let conn = Connection::open_in_memory().unwrap();

    assert!(matches!(
        SqliteParcelStore::try_new(&conn),
        Err(StoreError::MissingRequiredTable("parcel"))
    ));
}

#[test]
fn store_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE parcel (
            number INTEGER PRIMARY KEY AUTOINCREMENT,
            client INTEGER,
            status TEXT,
            address TEXT
        );",
    )
    .unwrap();

    assert!(matches!(
        SqliteParcelStore::try_new(&conn),
        Err(StoreError::MissingRequiredColumn {
            table: "parcel",
            column: "created_at"
        })
    ));
}
