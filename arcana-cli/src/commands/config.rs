use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::settings::{load_settings_string, resolve_db_path, save_db_path, settings_path};
use crate::CliError;

/// Show the resolved database path, where it came from, and the settings file.
pub(crate) fn run_config_show(db_override: Option<PathBuf>) {
    let (db_path, source) = resolve_db_path(db_override);
    let settings = settings_path();

    log::info!("{}", "Arcana Configuration".if_supports_color(Stdout, |t| t.bold()));
    crate::log_blank();
    log::info!(
        "  Database:      {} {}",
        db_path.display().if_supports_color(Stdout, |t| t.cyan()),
        format!("(from {source})").if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::info!(
        "  Settings file: {} {}",
        settings.display().if_supports_color(Stdout, |t| t.cyan()),
        if settings.exists() {
            "(exists)".if_supports_color(Stdout, |t| t.green()).to_string()
        } else {
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()).to_string()
        },
    );

    if let Some(contents) = load_settings_string() {
        crate::log_blank();
        for line in contents.lines() {
            log::info!("  {}", line);
        }
    }
}

/// Print the settings file path.
pub(crate) fn run_config_path() {
    log::info!("{}", settings_path().display());
}

/// Save the default database path.
pub(crate) fn run_config_set_db(path: &Path) -> Result<(), CliError> {
    let absolute = std::path::absolute(path)
        .map_err(|e| CliError::config(format!("Invalid path {}: {}", path.display(), e)))?;
    save_db_path(&absolute)?;
    log::info!("Default database set to {}", absolute.display());
    Ok(())
}
