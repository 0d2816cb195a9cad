//! SQLite schema for printers and their service logs
//!
//! Older data files predate the `nozzle_type` and `ams` columns. They are
//! upgraded in place on open by adding whatever columns are missing.

use std::collections::HashSet;
use std::path::Path;

use rusqlite::{Connection, Result};
use tracing::info;

/// Columns added to `printers` after the first release, with their DDL type
const PRINTER_MIGRATIONS: &[(&str, &str)] = &[
    ("nozzle_type", "TEXT"),
    ("ams", "INTEGER DEFAULT 0"),
];

/// Open a connection with foreign key enforcement enabled
///
/// SQLite turns foreign keys off per connection by default, so every
/// connection used by the store goes through here.
pub fn open_connection(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Printers table
        CREATE TABLE IF NOT EXISTS printers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            printer_id TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            manufacturer TEXT,
            model TEXT,
            hours INTEGER DEFAULT 0,
            nozzle_type TEXT,
            ams INTEGER DEFAULT 0
        );

        -- Service logs (many-to-one with printers)
        CREATE TABLE IF NOT EXISTS service_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            printer_id_fk INTEGER NOT NULL,
            note TEXT NOT NULL,
            created_at TEXT DEFAULT (datetime('now')),
            FOREIGN KEY (printer_id_fk) REFERENCES printers(id) ON DELETE CASCADE
        );
        "#,
    )?;

    migrate(conn)?;

    // Logs are always read per printer, newest first
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_service_logs_printer_created
            ON service_logs(printer_id_fk, created_at);",
    )?;

    Ok(())
}

/// Add any optional `printers` columns that are missing
///
/// Existing rows are left untouched and pick up the column default.
/// Running this on an up-to-date database does nothing.
pub fn migrate(conn: &Connection) -> Result<()> {
    let cols = printer_columns(conn)?;
    for (col, ty) in PRINTER_MIGRATIONS {
        if add_column_if_missing(conn, &cols, "printers", col, ty)? {
            info!("Migrated printers table: added column {}", col);
        }
    }
    Ok(())
}

/// Check if the printers table is missing any optional column
pub fn needs_migration(conn: &Connection) -> bool {
    match printer_columns(conn) {
        Ok(cols) => PRINTER_MIGRATIONS
            .iter()
            .any(|(col, _)| !cols.contains(*col)),
        Err(_) => true,
    }
}

/// Column names currently present on the printers table
pub fn printer_columns(conn: &Connection) -> Result<HashSet<String>> {
    let mut stmt = conn.prepare("PRAGMA table_info(printers)")?;
    let cols = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<HashSet<String>>>()?;
    Ok(cols)
}

/// Returns true if the column was added
fn add_column_if_missing(
    conn: &Connection,
    cols: &HashSet<String>,
    table: &str,
    col: &str,
    ty: &str,
) -> Result<bool> {
    if cols.contains(col) {
        return Ok(false);
    }
    conn.execute(&format!("ALTER TABLE {} ADD COLUMN {} {}", table, col, ty), [])?;
    Ok(true)
}
