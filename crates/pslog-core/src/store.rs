//! Persistence gateway
//!
//! `Store` is the only way the presentation layer reads or writes data.
//! It remembers nothing but the data file path: each operation opens its own
//! connection (with foreign keys on), does its work, and drops the
//! connection before returning.
//!
//! ## Usage
//!
//! ```ignore
//! let store = Store::open("printer_service.db")?;
//!
//! let id = store.insert_printer(&PrinterInput {
//!     printer_id: "mk4-a".into(),
//!     name: "Workhorse".into(),
//!     ..Default::default()
//! })?;
//! store.insert_log(id, "Replaced PTFE tube")?;
//!
//! let printers = store.list_printers(HoursSort::Descending)?;
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::{
    HoursSort, Printer, PrinterFields, PrinterInput, ServiceLog, DEFAULT_PRINTER_ID,
};
use crate::storage::error::{StoreError, StoreResult};
use crate::storage::schema::{init_schema, open_connection};

const PRINTER_COLUMNS: &str = "id, printer_id, name, manufacturer, model, hours, nozzle_type, ams";

const LOG_COLUMNS: &str = "id, printer_id_fk, note, created_at";

/// Timestamp layouts SQLite's date functions produce; `%.f` also accepts
/// values without fractional seconds
const SQLITE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Column index of `created_at` in `LOG_COLUMNS`
const CREATED_AT_COLUMN: usize = 3;

/// Persistence gateway for printers and service logs
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Open the store at `path`, creating or upgrading the data file
    ///
    /// The parent directory is created if needed, both tables are created
    /// if absent, and missing optional columns are added.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = open_connection(&path)?;
        init_schema(&conn)?;
        debug!("Opened store at {:?}", path);

        Ok(Self { path })
    }

    /// Open the store at the configured data file
    pub fn open_with_config(config: &Config) -> StoreResult<Self> {
        Self::open(config.database_path())
    }

    /// Path of the SQLite data file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> StoreResult<Connection> {
        Ok(open_connection(&self.path)?)
    }

    // ==================== Printer Operations ====================

    /// All printers in the requested order
    pub fn list_printers(&self, sort: HoursSort) -> StoreResult<Vec<Printer>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM printers {}",
            PRINTER_COLUMNS,
            sort.order_clause()
        ))?;

        let printers = stmt
            .query_map([], printer_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(printers)
    }

    /// Get a printer by surrogate id
    pub fn get_printer(&self, id: i64) -> StoreResult<Option<Printer>> {
        let conn = self.connect()?;
        fetch_printer(&conn, id)
    }

    /// Insert a printer, returning its surrogate id
    pub fn insert_printer(&self, input: &PrinterInput) -> StoreResult<i64> {
        let fields = input.normalize().inspect_err(log_rejected)?;
        let conn = self.connect()?;
        let id = insert_printer_row(&conn, &fields).inspect_err(log_rejected)?;
        debug!("Inserted printer {} as id {}", fields.printer_id, id);
        Ok(id)
    }

    /// Replace every mutable field of an existing printer
    pub fn update_printer(&self, id: i64, input: &PrinterInput) -> StoreResult<()> {
        let fields = input.normalize().inspect_err(log_rejected)?;
        let conn = self.connect()?;

        let changed = conn
            .execute(
                r#"
                UPDATE printers
                SET printer_id = ?, name = ?, manufacturer = ?, model = ?,
                    hours = ?, nozzle_type = ?, ams = ?
                WHERE id = ?
                "#,
                params![
                    fields.printer_id,
                    fields.name,
                    fields.manufacturer,
                    fields.model,
                    fields.hours,
                    fields.nozzle_type,
                    fields.ams,
                    id,
                ],
            )
            .map_err(|e| StoreError::from_sqlite(e, Some(fields.printer_id.as_str())))
            .inspect_err(log_rejected)?;

        if changed == 0 {
            return Err(StoreError::PrinterNotFound { id });
        }
        debug!("Updated printer id {}", id);
        Ok(())
    }

    /// Delete a printer together with all of its service logs
    ///
    /// The logs go with the printer through `ON DELETE CASCADE`, in the same
    /// statement. Deleting an id that does not exist does nothing.
    pub fn delete_printer(&self, id: i64) -> StoreResult<()> {
        let conn = self.connect()?;
        let removed = conn.execute("DELETE FROM printers WHERE id = ?", params![id])?;
        if removed == 0 {
            debug!("Delete of printer id {} matched nothing", id);
        } else {
            debug!("Deleted printer id {}", id);
        }
        Ok(())
    }

    /// First free printer ID among `base`, `base-2`, `base-3`, ...
    ///
    /// A blank `base` is replaced with "printer".
    pub fn ensure_unique_printer_id(&self, base: &str) -> StoreResult<String> {
        let conn = self.connect()?;
        unique_printer_id(&conn, base)
    }

    /// Copy a printer under a fresh ID, returning the new surrogate id
    ///
    /// The new printer ID derives from "<source>-copy" and the name gets a
    /// " (Copy)" suffix.
    pub fn duplicate_printer(&self, id: i64) -> StoreResult<i64> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let source = fetch_printer(&tx, id)?.ok_or(StoreError::PrinterNotFound { id })?;
        let printer_id = unique_printer_id(&tx, &format!("{}-copy", source.printer_id))?;
        let fields = PrinterFields::duplicate_of(&source, printer_id)?;
        let new_id = insert_printer_row(&tx, &fields)?;

        tx.commit()?;
        debug!(
            "Duplicated printer {} as {} (id {})",
            source.printer_id, fields.printer_id, new_id
        );
        Ok(new_id)
    }

    pub fn printer_count(&self) -> StoreResult<i64> {
        let conn = self.connect()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM printers", [], |row| row.get(0))?)
    }

    // ==================== Service Log Operations ====================

    /// Service logs for a printer, newest first
    pub fn list_logs_for(&self, printer_id: i64) -> StoreResult<Vec<ServiceLog>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM service_logs WHERE printer_id_fk = ? ORDER BY created_at DESC, id DESC",
            LOG_COLUMNS
        ))?;

        let mut logs = Vec::new();
        for row in stmt.query_map(params![printer_id], log_from_row)? {
            match row {
                Ok(log) => logs.push(log),
                Err(rusqlite::Error::FromSqlConversionFailure(CREATED_AT_COLUMN, _, err)) => {
                    warn!(
                        "Skipping note with unreadable timestamp for printer id {}: {}",
                        printer_id, err
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(logs)
    }

    /// Get a service log by surrogate id
    pub fn get_log(&self, log_id: i64) -> StoreResult<Option<ServiceLog>> {
        let conn = self.connect()?;
        let log = conn
            .query_row(
                &format!("SELECT {} FROM service_logs WHERE id = ?", LOG_COLUMNS),
                params![log_id],
                log_from_row,
            )
            .optional()?;
        Ok(log)
    }

    /// Attach a trimmed note to a printer, returning the log id
    ///
    /// Callers skip this for blank notes; see `models::normalize_note`.
    pub fn insert_log(&self, printer_id: i64, text: &str) -> StoreResult<i64> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        if !printer_exists(&tx, printer_id)? {
            warn!("Rejected note for missing printer id {}", printer_id);
            return Err(StoreError::PrinterNotFound { id: printer_id });
        }

        tx.execute(
            "INSERT INTO service_logs (printer_id_fk, note) VALUES (?, ?)",
            params![printer_id, text.trim()],
        )
        .map_err(|e| StoreError::from_sqlite(e, None))?;
        let log_id = tx.last_insert_rowid();

        tx.commit()?;
        debug!("Inserted log {} for printer id {}", log_id, printer_id);
        Ok(log_id)
    }

    /// Replace the text of a note, leaving its timestamp alone
    pub fn update_log(&self, log_id: i64, text: &str) -> StoreResult<()> {
        let conn = self.connect()?;
        let changed = conn.execute(
            "UPDATE service_logs SET note = ? WHERE id = ?",
            params![text.trim(), log_id],
        )?;

        if changed == 0 {
            return Err(StoreError::LogNotFound { id: log_id });
        }
        debug!("Updated log {}", log_id);
        Ok(())
    }

    /// Delete one note; an unknown id is a no-op
    pub fn delete_log(&self, log_id: i64) -> StoreResult<()> {
        let conn = self.connect()?;
        let removed = conn.execute("DELETE FROM service_logs WHERE id = ?", params![log_id])?;
        debug!("Deleted {} log row(s) for id {}", removed, log_id);
        Ok(())
    }

    pub fn log_count(&self) -> StoreResult<i64> {
        let conn = self.connect()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM service_logs", [], |row| row.get(0))?)
    }
}

// ==================== Connection helpers ====================

fn fetch_printer(conn: &Connection, id: i64) -> StoreResult<Option<Printer>> {
    let printer = conn
        .query_row(
            &format!("SELECT {} FROM printers WHERE id = ?", PRINTER_COLUMNS),
            params![id],
            printer_from_row,
        )
        .optional()?;
    Ok(printer)
}

fn printer_exists(conn: &Connection, id: i64) -> StoreResult<bool> {
    let mut stmt = conn.prepare("SELECT 1 FROM printers WHERE id = ?")?;
    Ok(stmt.exists(params![id])?)
}

fn insert_printer_row(conn: &Connection, fields: &PrinterFields) -> StoreResult<i64> {
    conn.execute(
        r#"
        INSERT INTO printers (printer_id, name, manufacturer, model, hours, nozzle_type, ams)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
        params![
            fields.printer_id,
            fields.name,
            fields.manufacturer,
            fields.model,
            fields.hours,
            fields.nozzle_type,
            fields.ams,
        ],
    )
    .map_err(|e| StoreError::from_sqlite(e, Some(fields.printer_id.as_str())))?;
    Ok(conn.last_insert_rowid())
}

/// Probe `base`, then `base-2`, `base-3`, ... until one is free
fn unique_printer_id(conn: &Connection, base: &str) -> StoreResult<String> {
    let base = match base.trim() {
        "" => DEFAULT_PRINTER_ID,
        trimmed => trimmed,
    };

    let mut stmt = conn.prepare("SELECT 1 FROM printers WHERE printer_id = ? LIMIT 1")?;
    let mut candidate = base.to_string();
    let mut idx = 1;
    while stmt.exists(params![candidate])? {
        idx += 1;
        candidate = format!("{}-{}", base, idx);
    }
    Ok(candidate)
}

fn log_rejected(err: &StoreError) {
    warn!("Rejected printer write: {}", err);
}

// ==================== Row mapping ====================

/// Columns added by migration may hold NULL on rows written before it
fn printer_from_row(row: &Row) -> rusqlite::Result<Printer> {
    Ok(Printer {
        id: row.get(0)?,
        printer_id: row.get(1)?,
        name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        manufacturer: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        model: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        hours: row.get::<_, Option<i64>>(5)?.unwrap_or(0),
        nozzle_type: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        ams: row.get::<_, Option<i64>>(7)?.unwrap_or(0) != 0,
    })
}

fn log_from_row(row: &Row) -> rusqlite::Result<ServiceLog> {
    let created_at: String = row.get(CREATED_AT_COLUMN)?;
    let created_at = parse_created_at(&created_at).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(CREATED_AT_COLUMN, Type::Text, Box::new(e))
    })?;

    Ok(ServiceLog {
        id: row.get(0)?,
        printer_id_fk: row.get(1)?,
        note: row.get(2)?,
        created_at,
    })
}

fn parse_created_at(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let text = text.trim();
    SQLITE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|dt| Ok(Utc.from_utc_datetime(&dt)))
        .unwrap_or_else(|| DateTime::parse_from_rfc3339(text).map(|dt| dt.with_timezone(&Utc)))
}
