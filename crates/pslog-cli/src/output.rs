//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use pslog_core::{Printer, ServiceLog};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single printer with its service history
    pub fn print_printer(&self, printer: &Printer, logs: &[ServiceLog]) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:           {}", printer.id);
                println!("Printer ID:   {}", printer.printer_id);
                println!("Name:         {}", printer.name);
                println!("Manufacturer: {}", printer.manufacturer);
                println!("Model:        {}", printer.model);
                println!("Hours:        {}", printer.hours);
                println!("Nozzle:       {}", printer.nozzle_type);
                println!("AMS:          {}", yes_no(printer.ams));

                if !logs.is_empty() {
                    println!();
                    println!("── Service Log ({}) ──", logs.len());
                    for log in logs {
                        println!(
                            "[{}] #{} {}",
                            log.created_at.format("%Y-%m-%d %H:%M"),
                            log.id,
                            truncate_line(&log.note, 60)
                        );
                    }
                }
            }
            OutputFormat::Json => {
                print_json(&serde_json::json!({ "printer": printer, "logs": logs }));
            }
            OutputFormat::Quiet => {
                println!("{}", printer.id);
            }
        }
    }

    /// Print a list of printers
    pub fn print_printers(&self, printers: &[Printer]) {
        match self.format {
            OutputFormat::Human => {
                if printers.is_empty() {
                    println!("No printers found.");
                    return;
                }
                println!(
                    "{:>4} | {:<16} | {:<20} | {:<14} | {:<14} | {:>6} | {:<10} | AMS",
                    "ID", "Printer ID", "Name", "Manufacturer", "Model", "Hours", "Nozzle"
                );
                for p in printers {
                    println!(
                        "{:>4} | {:<16} | {:<20} | {:<14} | {:<14} | {:>6} | {:<10} | {}",
                        p.id,
                        truncate(&p.printer_id, 16),
                        truncate(&p.name, 20),
                        truncate(&p.manufacturer, 14),
                        truncate(&p.model, 14),
                        p.hours,
                        truncate(&p.nozzle_type, 10),
                        yes_no(p.ams)
                    );
                }
                println!("\n{} printer(s)", printers.len());
            }
            OutputFormat::Json => {
                print_json(printers);
            }
            OutputFormat::Quiet => {
                for p in printers {
                    println!("{}", p.id);
                }
            }
        }
    }

    /// Print the service log of one printer
    pub fn print_logs(&self, printer: &Printer, logs: &[ServiceLog]) {
        match self.format {
            OutputFormat::Human => {
                println!("Service log for: {} - {}", printer.printer_id, printer.name);
                println!();

                if logs.is_empty() {
                    println!("No notes for this printer.");
                    return;
                }

                for log in logs {
                    println!("────────────────────────────────────────");
                    println!(
                        "ID: {}  Date: {}",
                        log.id,
                        log.created_at.format("%Y-%m-%d %H:%M:%S")
                    );
                    println!();
                    println!("{}", log.note);
                    println!();
                }
                println!("{} note(s)", logs.len());
            }
            OutputFormat::Json => {
                print_json(logs);
            }
            OutputFormat::Quiet => {
                for log in logs {
                    println!("{}", log.id);
                }
            }
        }
    }

    /// Print a bare value such as a generated printer ID
    pub fn value(&self, value: &str) {
        match self.format {
            OutputFormat::Json => print_json(&serde_json::json!({ "value": value })),
            OutputFormat::Human | OutputFormat::Quiet => println!("{}", value),
        }
    }

    /// Print a success message, with the affected id in quiet mode
    pub fn created(&self, id: i64, message: &str) {
        match self.format {
            OutputFormat::Quiet => println!("{}", id),
            OutputFormat::Json => print_json(&serde_json::json!({
                "status": "success",
                "id": id,
                "message": message
            })),
            OutputFormat::Human => println!("✓ {}", message),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                print_json(&serde_json::json!({"status": "success", "message": message}));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                print_json(&serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Truncate to first line and max length
fn truncate_line(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
        // Multi-byte characters are never split
        assert_eq!(truncate("düsenwechsel", 6), "düs...");
    }

    #[test]
    fn test_truncate_line() {
        assert_eq!(truncate_line("single line", 20), "single line");
        assert_eq!(truncate_line("line one\nline two", 20), "line one");
        assert_eq!(truncate_line("", 20), "");
    }

    #[test]
    fn test_should_prompt_only_for_humans() {
        assert!(Output::new(OutputFormat::Human).should_prompt());
        assert!(!Output::new(OutputFormat::Json).should_prompt());
        assert!(!Output::new(OutputFormat::Quiet).should_prompt());
    }
}
