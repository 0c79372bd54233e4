use std::path::Path;
use std::time::Instant;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use arcana_db::SpellStore;
use arcana_xml::LoadProgress;

use crate::CliError;
use crate::settings::ensure_parent_dir;
use crate::spinner::Spinner;

/// Replace the database contents with every spellbook in `source_dir`.
pub(crate) fn run_install(db_path: &Path, source_dir: &Path, quiet: bool) -> Result<(), CliError> {
    let start = Instant::now();
    log::info!(
        "{}",
        format!(
            "Installing spells from {} into {}",
            source_dir.display(),
            db_path.display()
        )
        .if_supports_color(Stdout, |t| t.bold()),
    );

    let spinner = Spinner::new(quiet, "Loading spellbooks...");
    let mut files = 0usize;
    let parsed = arcana_xml::load_all_spellbooks(source_dir, |event| match event {
        LoadProgress::Loading { path } => {
            spinner.set_message(format!("Loading {}", path.display()));
        }
        LoadProgress::Loaded { path, spells } => {
            files += 1;
            spinner.suspend(|| {
                log::info!(
                    "  {} {} spells from {}",
                    "\u{2713}".if_supports_color(Stdout, |t| t.green()),
                    spells,
                    path.display(),
                );
            });
        }
    });
    let spells = match parsed {
        Ok(spells) => spells,
        Err(e) => {
            spinner.finish();
            return Err(CliError::source_file(e.to_string()));
        }
    };
    if files == 0 {
        log::warn!("No .xml or .xml.gz spellbooks found in {}", source_dir.display());
    }
    spinner.set_message(format!("Writing {} spells", spells.len()));

    // Clearing and loading share one transaction, so a failed load keeps
    // the previous catalog.
    let written = ensure_parent_dir(db_path)
        .map_err(CliError::from)
        .and_then(|()| {
            let store = SpellStore::new(db_path);
            store
                .initialize()
                .and_then(|()| store.replace_all(&spells))
                .map_err(|e| CliError::database(format!("Failed to install spells: {}", e)))
        });
    spinner.finish();
    let loaded = written?;

    crate::log_blank();
    log::info!(
        "{}",
        format!(
            "Installed {} spells from {} spellbook(s) in {:.2} s",
            loaded,
            files,
            start.elapsed().as_secs_f64()
        )
        .if_supports_color(Stdout, |t| t.green()),
    );
    Ok(())
}
