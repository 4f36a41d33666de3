use std::path::Path;
use std::time::Instant;

use log::{error, info};
use rusqlite::Connection;

use crate::error::ContactResult;

/// Initialize the database schema. Creates the contacts table if it doesn't exist.
pub fn initialize(conn: &Connection) -> ContactResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS contacts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            phone TEXT NOT NULL,
            email TEXT NOT NULL,
            address TEXT,
            created_at TEXT NOT NULL,
            UNIQUE(name, phone, email)
        );

        CREATE INDEX IF NOT EXISTS idx_contacts_created_at ON contacts(created_at);
        ",
    )?;
    Ok(())
}

/// Open (or create) the database file and make sure the schema exists.
pub fn open(path: &Path) -> ContactResult<Connection> {
    let started_at = Instant::now();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path).map_err(|e| {
        error!(
            "event=db_open module=db status=error path={} error={}",
            path.display(),
            e
        );
        e
    })?;
    initialize(&conn)?;

    info!(
        "event=db_open module=db status=ok path={} duration_ms={}",
        path.display(),
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

/// Create an in-memory connection for testing. Available in test builds.
pub fn test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    initialize(&conn).unwrap();
    conn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_is_idempotent() {
        let conn = test_connection();
        initialize(&conn).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn schema_rejects_duplicate_triple() {
        let conn = test_connection();
        let insert = "INSERT INTO contacts (name, phone, email, created_at) VALUES ('A', '1', 'a@x.io', '2024')";
        conn.execute(insert, []).unwrap();
        assert!(conn.execute(insert, []).is_err());
    }

    #[test]
    fn open_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("contacts.db");
        let conn = open(&path).unwrap();
        drop(conn);
        assert!(path.exists());
    }
}
