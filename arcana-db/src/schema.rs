//! SQLite schema creation and connection opening.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use crate::operations::StoreError;

/// Create the `spells` table and indexes if they don't exist.
///
/// Idempotent; safe to call on an existing database.
pub fn create_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Open or create a spell database at the given path, ensuring the schema.
pub fn open_database(path: &Path) -> Result<Connection, StoreError> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Open an existing spell database without creating it.
///
/// A missing file is an error rather than a silently created empty database.
pub fn open_existing(path: &Path) -> Result<Connection, StoreError> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    Ok(conn)
}

/// Open an in-memory database with the full schema. Useful for testing.
pub fn open_memory() -> Result<Connection, StoreError> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn)?;
    Ok(conn)
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS spells (
    book TEXT NOT NULL,
    name TEXT NOT NULL,
    level INTEGER NOT NULL CHECK (level >= 0),
    school TEXT NOT NULL,
    ritual INTEGER NOT NULL DEFAULT 0,
    guild INTEGER NOT NULL DEFAULT 0,
    category TEXT,
    "range" TEXT NOT NULL,
    duration TEXT NOT NULL,
    casting_time TEXT NOT NULL,
    description TEXT NOT NULL,
    casters TEXT NOT NULL,
    components TEXT NOT NULL,
    PRIMARY KEY (book, name)
);
CREATE INDEX IF NOT EXISTS idx_spells_level ON spells(level);
CREATE INDEX IF NOT EXISTS idx_spells_school ON spells(school);
"#;
