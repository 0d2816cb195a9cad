//! Printer command handlers

use anyhow::Result;
use clap::Args;

use pslog_core::{HoursSort, Printer, PrinterInput, Store, StoreError};

use super::report;
use crate::output::Output;
use crate::prompt::confirm;

/// Printer fields shared by `printer add` and `printer edit`
#[derive(Args, Debug, Default, Clone)]
pub struct PrinterDetails {
    /// Display name
    #[arg(short, long)]
    pub name: Option<String>,
    #[arg(long)]
    pub manufacturer: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    /// Usage hours (whole number)
    #[arg(long, allow_hyphen_values = true)]
    pub hours: Option<String>,
    /// Nozzle type, e.g. "0.4 mm hardened"
    #[arg(long = "nozzle")]
    pub nozzle_type: Option<String>,
    /// Multi-material unit fitted (true/false)
    #[arg(long)]
    pub ams: Option<bool>,
}

impl PrinterDetails {
    /// Input for a new printer; missing fields are empty
    pub fn into_input(self, printer_id: String) -> PrinterInput {
        PrinterInput {
            printer_id,
            name: self.name.unwrap_or_default(),
            manufacturer: self.manufacturer.unwrap_or_default(),
            model: self.model.unwrap_or_default(),
            hours: self.hours.unwrap_or_default(),
            nozzle_type: self.nozzle_type.unwrap_or_default(),
            ams: self.ams.unwrap_or(false),
        }
    }

    /// Input for an update; missing fields keep their current value
    pub fn apply_to(self, printer_id: Option<String>, current: &Printer) -> PrinterInput {
        let mut input = PrinterInput::from(current);
        if let Some(printer_id) = printer_id {
            input.printer_id = printer_id;
        }
        if let Some(name) = self.name {
            input.name = name;
        }
        if let Some(manufacturer) = self.manufacturer {
            input.manufacturer = manufacturer;
        }
        if let Some(model) = self.model {
            input.model = model;
        }
        if let Some(hours) = self.hours {
            input.hours = hours;
        }
        if let Some(nozzle_type) = self.nozzle_type {
            input.nozzle_type = nozzle_type;
        }
        if let Some(ams) = self.ams {
            input.ams = ams;
        }
        input
    }
}

/// List all printers
pub fn list(store: &Store, sort: HoursSort, output: &Output) -> Result<()> {
    let printers = store.list_printers(sort).map_err(report)?;
    output.print_printers(&printers);
    Ok(())
}

/// Show one printer and its service log
pub fn show(store: &Store, id: i64, output: &Output) -> Result<()> {
    let printer = require_printer(store, id)?;
    let logs = store.list_logs_for(id).map_err(report)?;
    output.print_printer(&printer, &logs);
    Ok(())
}

/// Add a new printer
pub fn add(store: &Store, input: PrinterInput, output: &Output) -> Result<()> {
    let id = store.insert_printer(&input).map_err(report)?;
    output.created(id, &format!("Added printer {} (id {})", input.printer_id.trim(), id));
    Ok(())
}

/// Edit an existing printer
pub fn edit(
    store: &Store,
    id: i64,
    printer_id: Option<String>,
    details: PrinterDetails,
    output: &Output,
) -> Result<()> {
    let current = require_printer(store, id)?;
    let input = details.apply_to(printer_id, &current);

    store.update_printer(id, &input).map_err(report)?;

    output.success(&format!("Updated printer {}", input.printer_id.trim()));
    Ok(())
}

/// Delete a printer and all of its notes
pub fn delete(store: &Store, id: i64, yes: bool, output: &Output) -> Result<()> {
    let printer = require_printer(store, id)?;

    if !yes && output.should_prompt() {
        let notes = store.list_logs_for(id).map_err(report)?.len();
        println!(
            "Delete printer: {} - {} ({} note(s))",
            printer.printer_id, printer.name, notes
        );
        if !confirm("Delete this printer and all its notes?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.delete_printer(id).map_err(report)?;

    output.success(&format!("Deleted printer {}", printer.printer_id));
    Ok(())
}

/// Duplicate a printer under a fresh printer ID
pub fn duplicate(store: &Store, id: i64, output: &Output) -> Result<()> {
    let new_id = store.duplicate_printer(id).map_err(report)?;
    let copy = require_printer(store, new_id)?;

    output.created(
        new_id,
        &format!("Duplicated printer as {} (id {})", copy.printer_id, new_id),
    );
    Ok(())
}

/// Print the first free printer ID derived from `base`
pub fn unique_id(store: &Store, base: &str, output: &Output) -> Result<()> {
    let printer_id = store.ensure_unique_printer_id(base).map_err(report)?;
    output.value(&printer_id);
    Ok(())
}

fn require_printer(store: &Store, id: i64) -> Result<Printer> {
    store
        .get_printer(id)
        .map_err(report)?
        .ok_or_else(|| report(StoreError::PrinterNotFound { id }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current() -> Printer {
        Printer {
            id: 4,
            printer_id: "k1-a".to_string(),
            name: "Kitchen".to_string(),
            manufacturer: "Creality".to_string(),
            model: "K1".to_string(),
            hours: 80,
            nozzle_type: "0.4 mm".to_string(),
            ams: false,
        }
    }

    #[test]
    fn test_into_input_defaults() {
        let input = PrinterDetails::default().into_input("p1".to_string());
        assert_eq!(input.printer_id, "p1");
        assert_eq!(input.hours, "");
        assert!(!input.ams);
    }

    #[test]
    fn test_apply_to_keeps_unspecified_fields() {
        let details = PrinterDetails {
            hours: Some("95".to_string()),
            ams: Some(true),
            ..Default::default()
        };
        let input = details.apply_to(None, &current());

        assert_eq!(input.printer_id, "k1-a");
        assert_eq!(input.name, "Kitchen");
        assert_eq!(input.manufacturer, "Creality");
        assert_eq!(input.hours, "95");
        assert!(input.ams);
    }

    #[test]
    fn test_apply_to_renames() {
        let details = PrinterDetails {
            name: Some("Garage".to_string()),
            ..Default::default()
        };
        let input = details.apply_to(Some("k1-b".to_string()), &current());
        assert_eq!(input.printer_id, "k1-b");
        assert_eq!(input.name, "Garage");
        assert_eq!(input.hours, "80");
    }

    #[test]
    fn test_handlers_against_store() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = Store::open(temp_dir.path().join("cli.db")).unwrap();
        let output = Output::new(crate::output::OutputFormat::Quiet);

        let details = PrinterDetails {
            name: Some("Unit A".to_string()),
            hours: Some("3".to_string()),
            ..Default::default()
        };
        add(&store, details.into_input("printer-1".to_string()), &output).unwrap();
        let id = store.list_printers(HoursSort::None).unwrap()[0].id;

        duplicate(&store, id, &output).unwrap();
        assert_eq!(store.printer_count().unwrap(), 2);

        let err = add(
            &store,
            PrinterDetails::default().into_input("printer-1".to_string()),
            &output,
        )
        .unwrap_err();
        assert!(err.to_string().contains("already in use"));

        delete(&store, id, true, &output).unwrap();
        assert!(store.get_printer(id).unwrap().is_none());

        let err = show(&store, id, &output).unwrap_err();
        assert!(err.to_string().contains("Printer not found"));
    }
}
