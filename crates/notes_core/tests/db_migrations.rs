use notes_core::db::migrations::{apply_migrations, latest_version, pending, schema_version};
use notes_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn fresh_database_runs_every_step_in_order() {
    let conn = open_db_in_memory().unwrap();

    let steps: Vec<_> = pending(0).map(|step| (step.version, step.name)).collect();
    assert_eq!(steps, [(1, "users"), (2, "notes"), (3, "sessions")]);
    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_eq!(table_names(&conn), ["notes", "sessions", "users"]);
}

#[test]
fn reopening_file_keeps_users_and_runs_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.sqlite3");

    let first = open_db(&path).unwrap();
    first
        .execute("INSERT INTO users (username) VALUES ('Автор');", [])
        .unwrap();
    drop(first);

    let mut second = open_db(&path).unwrap();
    assert_eq!(apply_migrations(&mut second).unwrap(), 0);
    let username: String = second
        .query_row("SELECT username FROM users;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(username, "Автор");
}

#[test]
fn database_behind_latest_gets_missing_steps_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("behind.sqlite3");

    let conn = open_db(&path).unwrap();
    conn.execute_batch("DROP TABLE sessions; PRAGMA user_version = 2;")
        .unwrap();
    drop(conn);

    let mut reopened = Connection::open(&path).unwrap();
    assert_eq!(apply_migrations(&mut reopened).unwrap(), 1);
    assert_eq!(schema_version(&reopened).unwrap(), 3);
    assert!(table_names(&reopened).contains(&"sessions".to_string()));
}

#[test]
fn database_from_newer_build_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    Connection::open(&path)
        .unwrap()
        .execute_batch("PRAGMA user_version = 999;")
        .unwrap();

    match open_db(&path).unwrap_err() {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn failed_step_names_itself_and_keeps_previous_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conflict.sqlite3");
    Connection::open(&path)
        .unwrap()
        .execute_batch("CREATE TABLE notes (legacy TEXT); PRAGMA user_version = 1;")
        .unwrap();

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::Migration {
            version: 2,
            name: "notes",
            ..
        }
    ));
    assert!(err.to_string().starts_with("migration 0002_notes failed"));

    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), 1);
}

#[test]
fn schema_rejects_second_note_with_same_slug() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO users (username) VALUES ('Автор');
         INSERT INTO notes (title, text, slug, author_id) VALUES ('a', 'b', 'dup', 1);",
    )
    .unwrap();

    let second = conn.execute(
        "INSERT INTO notes (title, text, slug, author_id) VALUES ('c', 'd', 'dup', 1);",
        [],
    );
    assert!(second.is_err());
}

fn table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name;",
        )
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}
