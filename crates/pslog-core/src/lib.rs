//! pslog Core Library
//!
//! Persistence for a 3D printer inventory and the free-text service notes
//! kept against each printer.
//!
//! # Architecture
//!
//! - **SQLite**: single data file with `printers` and `service_logs` tables,
//!   foreign keys enforced so deleting a printer removes its notes
//! - **Store**: stateless gateway; every operation opens and closes its own
//!   connection
//!
//! # Quick Start
//!
//! ```text
//! let store = Store::open_with_config(&Config::load()?)?;
//!
//! let id = store.insert_printer(&PrinterInput {
//!     printer_id: "x1c-1".into(),
//!     name: "Unit A".into(),
//!     hours: "120".into(),
//!     ..Default::default()
//! })?;
//! store.insert_log(id, "Cleaned carbon rods")?;
//!
//! let copy = store.duplicate_printer(id)?;
//! ```
//!
//! # Modules
//!
//! - `store`: Persistence operations (main entry point)
//! - `models`: Printers, service logs, input normalization, sort order
//! - `storage`: Schema, migration and error types
//! - `config`: Application configuration

pub mod config;
pub mod models;
pub mod storage;
pub mod store;

pub use config::Config;
pub use models::{normalize_note, HoursSort, Printer, PrinterFields, PrinterInput, ServiceLog};
pub use storage::{StoreError, StoreResult};
pub use store::Store;
