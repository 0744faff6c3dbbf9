use rusqlite::Connection;
use staffbook_core::db::migrations::latest_version;
use staffbook_core::db::{open_db, open_db_in_memory, DbError};
use staffbook_core::{EmployeeRepository, NewEmployee, SqliteEmployeeRepository};

#[test]
fn open_db_in_memory_creates_employee_schema() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "employees");

    let columns = table_columns(&conn, "employees");
    assert_eq!(
        columns,
        vec![
            "id",
            "full_name",
            "address",
            "phone_number",
            "email",
            "department",
            "entry_date",
            "departure_date",
        ]
    );
}

#[test]
fn reopening_file_database_keeps_data_and_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("employees.db");

    let conn_first = open_db(&path).unwrap();
    SqliteEmployeeRepository::try_new(&conn_first)
        .unwrap()
        .insert(&NewEmployee::new(
            "Persisted",
            "Disk Lane",
            "555",
            "persisted@example.com",
            None,
            chrono::NaiveDate::from_ymd_opt(2022, 2, 2).unwrap(),
        ))
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let repo = SqliteEmployeeRepository::try_new(&conn_second).unwrap();
    assert_eq!(repo.count_total().unwrap(), 1);
}

#[test]
fn unversioned_file_with_legacy_rows_is_adopted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE employees (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            full_name TEXT NOT NULL,
            address TEXT NOT NULL,
            phone_number TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            department TEXT,
            entry_date TEXT NOT NULL,
            departure_date TEXT
        );
        INSERT INTO employees (full_name, address, phone_number, email, department, entry_date)
        VALUES ('Legacy', 'x', 'y', 'legacy', '', '2018-04-01');",
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();
    let groups = repo.group_by_department().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].department, None);
    assert_eq!(repo.get(1).unwrap().unwrap().email, "legacy");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert!(err.is_fatal());
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn opening_a_non_database_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "not an sqlite database\n".repeat(256)).unwrap();

    let err = open_db(&path).unwrap_err();
    assert!(err.is_fatal(), "unexpected error: {err}");
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn table_columns(conn: &Connection, table: &str) -> Vec<String> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table});"))
        .unwrap();
    stmt.query_map([], |row| row.get::<_, String>("name"))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
