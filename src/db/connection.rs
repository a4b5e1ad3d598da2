use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::debug;

/// Path spelling that opens a private in-memory database instead of a file.
pub const IN_MEMORY: &str = ":memory:";

/// Open (creating if needed) the database at `path`, apply connection pragmas,
/// and make sure every table exists.
pub fn open_database(path: &Path, busy_timeout: Duration) -> Result<Connection> {
    if path.as_os_str() == IN_MEMORY {
        return open_in_memory();
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(path)
        .with_context(|| format!("failed to open SQLite database at {}", path.display()))?;
    conn.busy_timeout(busy_timeout)
        .context("failed to set busy timeout")?;
    prepare(&conn)?;
    debug!(path = %path.display(), "opened course database");
    Ok(conn)
}

/// Fresh in-memory database with the full schema. Used by tests and by the
/// `:memory:` database path.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    prepare(&conn)?;
    Ok(conn)
}

fn prepare(conn: &Connection) -> Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign keys")?;
    ensure_schema(conn)
}

/// Create the four tables if they are missing. References use `ON DELETE
/// RESTRICT`: removing a row that is still referenced fails instead of
/// cascading or leaving dangling ids.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS course_types (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL CHECK (length(trim(name)) > 0),
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
        )",
        [],
    )
    .context("failed to create course_types table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS courses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL CHECK (length(trim(name)) > 0),
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
        )",
        [],
    )
    .context("failed to create courses table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS course_offerings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            course_id INTEGER NOT NULL,
            course_type_id INTEGER NOT NULL,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
            FOREIGN KEY(course_id) REFERENCES courses(id) ON DELETE RESTRICT,
            FOREIGN KEY(course_type_id) REFERENCES course_types(id) ON DELETE RESTRICT
        )",
        [],
    )
    .context("failed to create course_offerings table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS registrations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            course_offering_id INTEGER NOT NULL,
            student_name TEXT NOT NULL CHECK (length(trim(student_name)) > 0),
            email TEXT NOT NULL CHECK (length(trim(email)) > 0),
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
            FOREIGN KEY(course_offering_id) REFERENCES course_offerings(id) ON DELETE RESTRICT
        )",
        [],
    )
    .context("failed to create registrations table")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap()
    }

    #[test]
    fn in_memory_database_has_all_tables() {
        let conn = open_in_memory().unwrap();
        assert_eq!(
            table_names(&conn),
            vec!["course_offerings", "course_types", "courses", "registrations"]
        );
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let conn = open_in_memory().unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn file_database_creates_parent_directories_and_is_reopenable() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("courses.sqlite");

        let conn = open_database(&path, Duration::from_millis(100)).unwrap();
        conn.execute("INSERT INTO courses (name) VALUES ('Algebra')", [])
            .unwrap();
        drop(conn);

        let reopened = open_database(&path, Duration::from_millis(100)).unwrap();
        let count: i64 = reopened
            .query_row("SELECT COUNT(*) FROM courses", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn memory_path_spelling_opens_in_memory() {
        let conn = open_database(Path::new(IN_MEMORY), Duration::from_millis(100)).unwrap();
        assert_eq!(table_names(&conn).len(), 4);
    }
}
