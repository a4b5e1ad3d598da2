use std::path::{Path, PathBuf};
use std::time::Duration;

use course_manager::open_database;
use rusqlite::Connection;
use tempfile::TempDir;

/// File-backed store inside a fresh temp directory. Keep the `TempDir` alive
/// for as long as the connection is used.
pub fn temp_store() -> (TempDir, PathBuf, Connection) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data").join("courses.sqlite");
    let conn = open_database(&path, Duration::from_millis(200)).unwrap();
    (dir, path, conn)
}

pub fn reopen(path: &Path) -> Connection {
    open_database(path, Duration::from_millis(200)).unwrap()
}
