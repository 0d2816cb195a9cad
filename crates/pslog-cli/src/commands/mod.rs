//! Command handlers
//!
//! Each handler calls into `pslog_core::Store` and renders the result.

pub mod config;
pub mod log;
pub mod printer;
pub mod status;

use anyhow::anyhow;

use pslog_core::StoreError;

/// Turn a store error into a user-facing error with a hint attached
///
/// Keeps the kinds distinguishable: a taken printer ID reads differently
/// from a bad value or a stale id.
pub fn report(err: StoreError) -> anyhow::Error {
    match err.recovery_suggestion() {
        Some(hint) => anyhow!("{}\n{}", err, hint),
        None => anyhow::Error::new(err),
    }
}
