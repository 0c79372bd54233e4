//! Settings file and database path resolution.
//!
//! The settings file is `<config_dir>/arcana/settings.toml`:
//!
//! ```toml
//! [database]
//! path = "/home/me/spells.db"
//! ```

use std::io;
use std::path::{Path, PathBuf};

use crate::CliError;

/// Environment variable that overrides the saved database path.
pub(crate) const DB_ENV_VAR: &str = "ARCANA_DB";

/// Canonical path to the settings file: `~/.config/arcana/settings.toml`.
pub(crate) fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("arcana").join("settings.toml")
}

/// Default database location: `~/.arcana/arcana.db`.
pub(crate) fn default_db_path() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".arcana").join("arcana.db")
}

/// Where a resolved database path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DbPathSource {
    Flag,
    Env,
    Settings,
    Default,
}

impl std::fmt::Display for DbPathSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag => write!(f, "--db"),
            Self::Env => write!(f, "{DB_ENV_VAR}"),
            Self::Settings => write!(f, "settings.toml"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Resolve the database path using a priority chain:
///
/// 1. `--db` flag (if `Some`)
/// 2. `ARCANA_DB` environment variable
/// 3. Saved `database.path` in `settings.toml`
/// 4. `~/.arcana/arcana.db`
pub(crate) fn resolve_db_path(cli_override: Option<PathBuf>) -> (PathBuf, DbPathSource) {
    resolve_from(
        cli_override,
        std::env::var_os(DB_ENV_VAR).map(PathBuf::from),
        &settings_path(),
    )
}

fn resolve_from(
    cli_override: Option<PathBuf>,
    env: Option<PathBuf>,
    settings: &Path,
) -> (PathBuf, DbPathSource) {
    if let Some(p) = cli_override {
        return (p, DbPathSource::Flag);
    }
    if let Some(p) = env.filter(|p| !p.as_os_str().is_empty()) {
        return (p, DbPathSource::Env);
    }
    if let Some(p) = load_db_path(settings) {
        return (p, DbPathSource::Settings);
    }
    (default_db_path(), DbPathSource::Default)
}

/// Read `database.path` from a settings file, if set.
fn load_db_path(settings: &Path) -> Option<PathBuf> {
    let contents = std::fs::read_to_string(settings).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    let path = doc.get("database")?.get("path")?.as_str()?;
    if path.is_empty() {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

/// Save the database path in `settings.toml`.
pub(crate) fn save_db_path(path: &Path) -> Result<(), CliError> {
    save_db_path_to(&settings_path(), path)
}

/// Uses `toml::Value` for a surgical update so unrelated settings survive.
/// An existing file that does not parse is left untouched and reported.
fn save_db_path_to(settings: &Path, path: &Path) -> Result<(), CliError> {
    let mut doc: toml::Value = match std::fs::read_to_string(settings) {
        Ok(contents) => contents.parse::<toml::Value>().map_err(|e| {
            CliError::config(format!(
                "{} is not valid TOML, fix or remove it first: {}",
                settings.display(),
                e
            ))
        })?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => toml::Value::Table(Default::default()),
        Err(e) => {
            return Err(CliError::config(format!(
                "Failed to read {}: {}",
                settings.display(),
                e
            )));
        }
    };

    let table = doc
        .as_table_mut()
        .ok_or_else(|| CliError::config("settings.toml root is not a table"))?;
    let database = table
        .entry("database")
        .or_insert_with(|| toml::Value::Table(Default::default()));
    let db_table = database
        .as_table_mut()
        .ok_or_else(|| CliError::config("[database] in settings.toml is not a table"))?;
    db_table.insert(
        "path".to_string(),
        toml::Value::String(path.to_string_lossy().into_owned()),
    );

    let serialized = toml::to_string_pretty(&doc)
        .map_err(|e| CliError::config(format!("Failed to serialize settings: {}", e)))?;
    write_atomically(settings, &serialized).map_err(|e| {
        CliError::config(format!("Failed to write {}: {}", settings.display(), e))
    })
}

fn write_atomically(settings: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = settings.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = settings.with_extension("toml.tmp");
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, settings)
}

/// Load the full settings file as a pretty-printed TOML string for display.
pub(crate) fn load_settings_string() -> Option<String> {
    let contents = std::fs::read_to_string(settings_path()).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}

/// Create the parent directory of a database path if it is missing.
pub(crate) fn ensure_parent_dir(db_path: &Path) -> io::Result<()> {
    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
