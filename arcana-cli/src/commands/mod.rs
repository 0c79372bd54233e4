pub(crate) mod clean;
pub(crate) mod config;
pub(crate) mod convert;
pub(crate) mod find;
pub(crate) mod info;
pub(crate) mod install;

use std::path::Path;

use arcana_db::SpellStore;

use crate::CliError;

/// Open the store at `db_path`, failing with a hint when it does not exist yet.
pub(crate) fn existing_store(db_path: &Path) -> Result<SpellStore, CliError> {
    if !db_path.exists() {
        return Err(CliError::database(format!(
            "No spell database found at {} (run 'arcana install <dir>' first)",
            db_path.display()
        )));
    }
    Ok(SpellStore::new(db_path))
}
