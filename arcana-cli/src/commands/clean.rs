use std::path::Path;

use super::existing_store;
use crate::CliError;

/// Remove every spell, keeping the database file and schema.
pub(crate) fn run_clean(db_path: &Path) -> Result<(), CliError> {
    let store = existing_store(db_path)?;
    log::info!("Cleaning the database ({})...", db_path.display());

    let removed = store
        .clear()
        .map_err(|e| CliError::database(format!("Failed to clean database: {}", e)))?;

    log::info!("Removed {} spells.", removed);
    Ok(())
}
