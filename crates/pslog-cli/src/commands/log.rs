//! Service log command handlers
//!
//! Blank notes are skipped here rather than sent to the store.

use anyhow::Result;

use pslog_core::{normalize_note, Store, StoreError};

use super::report;
use crate::output::Output;
use crate::prompt::confirm;

/// List the notes of a printer, newest first
pub fn list(store: &Store, printer_id: i64, output: &Output) -> Result<()> {
    let printer = store
        .get_printer(printer_id)
        .map_err(report)?
        .ok_or_else(|| report(StoreError::PrinterNotFound { id: printer_id }))?;
    let logs = store.list_logs_for(printer_id).map_err(report)?;

    output.print_logs(&printer, &logs);
    Ok(())
}

/// Add a note to a printer
pub fn add(store: &Store, printer_id: i64, text: &str, output: &Output) -> Result<()> {
    let Some(note) = normalize_note(text) else {
        output.message("Note is empty; nothing saved.");
        return Ok(());
    };

    let log_id = store.insert_log(printer_id, &note).map_err(report)?;
    output.created(log_id, &format!("Added note {} to printer {}", log_id, printer_id));
    Ok(())
}

/// Replace the text of a note
pub fn edit(store: &Store, log_id: i64, text: &str, output: &Output) -> Result<()> {
    let Some(note) = normalize_note(text) else {
        output.message("Note is empty; left unchanged.");
        return Ok(());
    };

    store.update_log(log_id, &note).map_err(report)?;
    output.success(&format!("Updated note {}", log_id));
    Ok(())
}

/// Delete a note
pub fn delete(store: &Store, log_id: i64, yes: bool, output: &Output) -> Result<()> {
    let log = store
        .get_log(log_id)
        .map_err(report)?
        .ok_or_else(|| report(StoreError::LogNotFound { id: log_id }))?;

    if !yes && output.should_prompt() {
        println!("Delete note {}: {}", log.id, log.note.replace('\n', " "));
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.delete_log(log_id).map_err(report)?;
    output.success(&format!("Deleted note {}", log_id));
    Ok(())
}
