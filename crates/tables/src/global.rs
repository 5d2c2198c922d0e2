//! Process-wide NSE table.
//!
//! The table is loaded once during startup with [`init`] and then read
//! without locking from any thread through [`table`].

use std::sync::OnceLock;

use log::warn;

use crate::{NseTable, TableConfig, TableError};

static NSE_TABLE: OnceLock<NseTable> = OnceLock::new();

/// Loads the process-wide table described by `config`.
///
/// If a table is already loaded it is returned unchanged and `config` is
/// ignored.
///
/// # Errors
///
/// Returns a [`TableError`] if the table cannot be loaded. Nothing is stored
/// in that case, so a later call may retry.
pub fn init(config: &TableConfig, num_spec: usize) -> Result<&'static NseTable, TableError> {
    if let Some(table) = NSE_TABLE.get() {
        warn!(
            "NSE table already loaded, ignoring `{}`",
            config.path.display()
        );
        return Ok(table);
    }

    let table = NseTable::load(config, num_spec)?;
    Ok(NSE_TABLE.get_or_init(|| table))
}

/// Returns the process-wide table, if [`init`] has succeeded.
#[must_use]
pub fn table() -> Option<&'static NseTable> {
    NSE_TABLE.get()
}
