//! Data models for pslog
//!
//! `Printer` and `ServiceLog` mirror stored rows. `PrinterInput` is what the
//! presentation layer hands in (raw text as typed); `PrinterInput::normalize`
//! is the one place where that text is trimmed and validated.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::error::{StoreError, StoreResult};

/// Identifier used when a duplicated or generated ID would otherwise be blank
pub const DEFAULT_PRINTER_ID: &str = "printer";

/// Suffix appended to the display name of a duplicated printer
pub const COPY_NAME_SUFFIX: &str = " (Copy)";

/// A physical printer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Printer {
    /// Surrogate key assigned by the store
    pub id: i64,
    /// User-facing identifier, unique across printers
    pub printer_id: String,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    /// Usage hours
    pub hours: i64,
    pub nozzle_type: String,
    /// Multi-material unit fitted
    pub ams: bool,
}

/// A free-text service note attached to one printer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceLog {
    pub id: i64,
    /// Surrogate key of the owning printer
    pub printer_id_fk: i64,
    pub note: String,
    /// Assigned by the store on insert, never changed afterwards
    pub created_at: DateTime<Utc>,
}

/// Printer fields as entered by the user, before normalization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrinterInput {
    pub printer_id: String,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    /// Hours as typed; empty means 0
    pub hours: String,
    pub nozzle_type: String,
    pub ams: bool,
}

impl PrinterInput {
    /// Trim every text field and validate the result
    ///
    /// Fails with `StoreError::Validation` when the printer ID is blank or
    /// hours is not a non-negative integer.
    pub fn normalize(&self) -> StoreResult<PrinterFields> {
        let printer_id = self.printer_id.trim();
        if printer_id.is_empty() {
            return Err(StoreError::validation("printer_id", "must not be empty"));
        }

        Ok(PrinterFields {
            printer_id: printer_id.to_string(),
            name: self.name.trim().to_string(),
            manufacturer: self.manufacturer.trim().to_string(),
            model: self.model.trim().to_string(),
            hours: parse_hours(&self.hours)?,
            nozzle_type: self.nozzle_type.trim().to_string(),
            ams: self.ams,
        })
    }
}

impl From<&Printer> for PrinterInput {
    fn from(printer: &Printer) -> Self {
        Self {
            printer_id: printer.printer_id.clone(),
            name: printer.name.clone(),
            manufacturer: printer.manufacturer.clone(),
            model: printer.model.clone(),
            hours: printer.hours.to_string(),
            nozzle_type: printer.nozzle_type.clone(),
            ams: printer.ams,
        }
    }
}

/// Validated, trimmed printer fields ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterFields {
    pub printer_id: String,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub hours: i64,
    pub nozzle_type: String,
    pub ams: bool,
}

impl PrinterFields {
    /// Fields for a copy of `source` stored under `printer_id`
    ///
    /// The name gets a " (Copy)" suffix, then the copy goes through the
    /// same normalization as any other write.
    pub fn duplicate_of(source: &Printer, printer_id: String) -> StoreResult<Self> {
        let mut input = PrinterInput::from(source);
        input.printer_id = printer_id;
        input.name = format!("{}{}", source.name.trim(), COPY_NAME_SUFFIX);
        input.normalize()
    }
}

/// Parse usage hours; blank input counts as zero
pub fn parse_hours(text: &str) -> StoreResult<i64> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0);
    }

    let hours: i64 = text
        .parse()
        .map_err(|_| StoreError::validation("hours", format!("'{}' is not an integer", text)))?;

    if hours < 0 {
        return Err(StoreError::validation(
            "hours",
            format!("'{}' must not be negative", text),
        ));
    }
    Ok(hours)
}

/// Trim a service note, returning `None` when nothing is left
///
/// Callers skip the insert entirely for blank notes.
pub fn normalize_note(text: &str) -> Option<String> {
    let note = text.trim();
    if note.is_empty() {
        None
    } else {
        Some(note.to_string())
    }
}

/// Sort selector for the printer list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoursSort {
    /// By name only
    #[default]
    None,
    /// Fewest hours first, ties by name
    #[serde(rename = "asc")]
    Ascending,
    /// Most hours first, ties by name
    #[serde(rename = "desc")]
    Descending,
}

impl HoursSort {
    /// The ORDER BY clause for this selector
    pub fn order_clause(self) -> &'static str {
        match self {
            HoursSort::None => "ORDER BY name",
            HoursSort::Ascending => "ORDER BY hours ASC, name",
            HoursSort::Descending => "ORDER BY hours DESC, name",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HoursSort::None => "none",
            HoursSort::Ascending => "asc",
            HoursSort::Descending => "desc",
        }
    }
}

impl fmt::Display for HoursSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HoursSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "name" => Ok(HoursSort::None),
            "asc" | "ascending" => Ok(HoursSort::Ascending),
            "desc" | "descending" => Ok(HoursSort::Descending),
            other => Err(format!(
                "Unknown sort order '{}'. Use none, asc or desc.",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> PrinterInput {
        PrinterInput {
            printer_id: "  printer-1 ".to_string(),
            name: " Unit A ".to_string(),
            manufacturer: "Bambu Lab\n".to_string(),
            model: "\tX1C".to_string(),
            hours: " 42 ".to_string(),
            nozzle_type: " 0.4 mm hardened ".to_string(),
            ams: true,
        }
    }

    #[test]
    fn test_normalize_trims_all_text() {
        let fields = sample_input().normalize().unwrap();
        assert_eq!(fields.printer_id, "printer-1");
        assert_eq!(fields.name, "Unit A");
        assert_eq!(fields.manufacturer, "Bambu Lab");
        assert_eq!(fields.model, "X1C");
        assert_eq!(fields.hours, 42);
        assert_eq!(fields.nozzle_type, "0.4 mm hardened");
        assert!(fields.ams);
    }

    #[test]
    fn test_normalize_defaults() {
        let input = PrinterInput {
            printer_id: "p".to_string(),
            ..Default::default()
        };
        let fields = input.normalize().unwrap();
        assert_eq!(fields.name, "");
        assert_eq!(fields.hours, 0);
        assert!(!fields.ams);
    }

    #[test]
    fn test_normalize_rejects_blank_printer_id() {
        let input = PrinterInput {
            printer_id: "   ".to_string(),
            ..sample_input()
        };
        let err = input.normalize().unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation {
                field: "printer_id",
                ..
            }
        ));
    }

    #[test]
    fn test_parse_hours() {
        assert_eq!(parse_hours("").unwrap(), 0);
        assert_eq!(parse_hours("   ").unwrap(), 0);
        assert_eq!(parse_hours("17").unwrap(), 17);
        assert_eq!(parse_hours(" 17 ").unwrap(), 17);

        assert!(matches!(
            parse_hours("abc"),
            Err(StoreError::Validation { field: "hours", .. })
        ));
        assert!(parse_hours("1.5").is_err());
        assert!(parse_hours("-3").is_err());
    }

    #[test]
    fn test_normalize_note() {
        assert_eq!(normalize_note("  nozzle swap \n"), Some("nozzle swap".to_string()));
        assert_eq!(normalize_note(""), None);
        assert_eq!(normalize_note(" \t\n"), None);
    }

    #[test]
    fn test_duplicate_of() {
        let source = Printer {
            id: 3,
            printer_id: "printer-1".to_string(),
            name: "Unit A".to_string(),
            manufacturer: "Prusa".to_string(),
            model: "MK4".to_string(),
            hours: 310,
            nozzle_type: "0.6 mm".to_string(),
            ams: true,
        };

        let fields = PrinterFields::duplicate_of(&source, "printer-1-copy".to_string()).unwrap();
        assert_eq!(fields.printer_id, "printer-1-copy");
        assert_eq!(fields.name, "Unit A (Copy)");
        assert_eq!(fields.manufacturer, "Prusa");
        assert_eq!(fields.model, "MK4");
        assert_eq!(fields.hours, 310);
        assert_eq!(fields.nozzle_type, "0.6 mm");
        assert!(fields.ams);
    }

    #[test]
    fn test_duplicate_of_blank_name_is_trimmed() {
        let source = Printer {
            id: 5,
            printer_id: "p".to_string(),
            name: String::new(),
            manufacturer: String::new(),
            model: String::new(),
            hours: 0,
            nozzle_type: String::new(),
            ams: false,
        };

        let fields = PrinterFields::duplicate_of(&source, "p-copy".to_string()).unwrap();
        assert_eq!(fields.name, "(Copy)");
    }

    #[test]
    fn test_input_from_printer_round_trips_through_normalize() {
        let source = Printer {
            id: 1,
            printer_id: "p1".to_string(),
            name: "One".to_string(),
            manufacturer: String::new(),
            model: String::new(),
            hours: 9,
            nozzle_type: String::new(),
            ams: false,
        };
        let fields = PrinterInput::from(&source).normalize().unwrap();
        assert_eq!(fields.hours, 9);
        assert_eq!(fields.name, "One");
    }

    #[test]
    fn test_hours_sort_parse_and_clause() {
        assert_eq!("asc".parse::<HoursSort>().unwrap(), HoursSort::Ascending);
        assert_eq!("DESC".parse::<HoursSort>().unwrap(), HoursSort::Descending);
        assert_eq!("none".parse::<HoursSort>().unwrap(), HoursSort::None);
        assert!("sideways".parse::<HoursSort>().is_err());

        assert_eq!(HoursSort::default().order_clause(), "ORDER BY name");
        assert_eq!(
            HoursSort::Descending.order_clause(),
            "ORDER BY hours DESC, name"
        );
        assert_eq!(HoursSort::Ascending.to_string(), "asc");
    }

    #[test]
    fn test_printer_serialization() {
        let printer = Printer {
            id: 1,
            printer_id: "p1".to_string(),
            name: "One".to_string(),
            manufacturer: "Creality".to_string(),
            model: "K1".to_string(),
            hours: 5,
            nozzle_type: "0.4".to_string(),
            ams: false,
        };
        let json = serde_json::to_string(&printer).unwrap();
        let deserialized: Printer = serde_json::from_str(&json).unwrap();
        assert_eq!(printer, deserialized);
    }
}
