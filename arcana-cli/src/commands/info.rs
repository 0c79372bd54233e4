use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use super::existing_store;
use crate::table::{Column, Table};
use crate::CliError;

/// Report spell counts by book, school, caster and level.
pub(crate) fn run_info(db_path: &Path) -> Result<(), CliError> {
    let store = existing_store(db_path)?;
    let stats = store
        .aggregate()
        .map_err(|e| CliError::database(format!("Failed to query database stats: {}", e)))?;

    log::info!(
        "{}",
        "Spell Database Statistics".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Database: {}", db_path.display());
    crate::log_blank();
    log::info!("There are {} spells in the database.", stats.total);

    if stats.total == 0 {
        return Ok(());
    }

    log_counts("Book", stats.books.iter().map(|(k, v)| (k.clone(), *v)));
    log_counts("School", stats.schools.iter().map(|(k, v)| (k.label().to_string(), *v)));
    log_counts("Caster", stats.casters.iter().map(|(k, v)| (k.label().to_string(), *v)));
    log_counts("Level", stats.levels.iter().map(|(k, v)| (k.to_string(), *v)));
    Ok(())
}

fn log_counts(label: &'static str, counts: impl Iterator<Item = (String, i64)>) {
    crate::log_blank();
    log::info!(
        "{}",
        format!("By {label}").if_supports_color(Stdout, |t| t.cyan()),
    );
    let mut table = Table::new(vec![Column::left(label).max(40), Column::right("Count")]);
    for (key, count) in counts {
        table.add_row(vec![key, count.to_string()]);
    }
    table.log();
}
