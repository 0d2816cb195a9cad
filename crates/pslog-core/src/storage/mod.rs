//! Storage layer
//!
//! SQLite schema, in-place migration of older data files, and the error
//! type shared by every persistence operation.
//!
//! ## Tables
//!
//! - `printers` - One row per device; `printer_id` is unique
//! - `service_logs` - Notes, each owned by one printer (`ON DELETE CASCADE`)

pub mod error;
pub mod schema;

pub use error::{StoreError, StoreResult};
pub use schema::{init_schema, migrate, needs_migration, open_connection};
