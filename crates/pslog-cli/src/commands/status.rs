//! Status command handler

use anyhow::Result;

use pslog_core::Store;

use super::report;
use crate::output::{Output, OutputFormat};

/// Show where data lives and how much of it there is
pub fn show(store: &Store, output: &Output) -> Result<()> {
    let printers = store.printer_count().map_err(report)?;
    let logs = store.log_count().map_err(report)?;
    let size = std::fs::metadata(store.path()).map(|m| m.len()).unwrap_or(0);

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "database_path": store.path(),
                    "database_size": size,
                    "counts": {
                        "printers": printers,
                        "service_logs": logs
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", store.path().display());
        }
        OutputFormat::Human => {
            println!("pslog Status");
            println!("============");
            println!();
            println!("Storage:");
            println!("  Location: {}", store.path().display());
            println!("  Size:     {} bytes", size);
            println!();
            println!("Contents:");
            println!("  Printers:     {}", printers);
            println!("  Service logs: {}", logs);
        }
    }

    Ok(())
}
