use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::spinner::Spinner;
use crate::CliError;

/// Convert every spellbook in `source_dir` to `.sbk` (or `.sbk.gz`) in `dest_dir`.
pub(crate) fn run_convert(
    source_dir: &Path,
    dest_dir: &Path,
    compress: bool,
    quiet: bool,
) -> Result<(), CliError> {
    log::info!(
        "Converting files in '{}' to {}files in '{}'...",
        source_dir.display(),
        if compress { "compressed " } else { "" },
        dest_dir.display(),
    );

    let files = arcana_xml::spellbook_files(source_dir).map_err(|e| {
        CliError::source_file(format!("Failed to read {}: {}", source_dir.display(), e))
    })?;
    if files.is_empty() {
        log::warn!("No .xml or .xml.gz spellbooks found in {}", source_dir.display());
        return Ok(());
    }

    let spinner = Spinner::new(quiet, "Converting...");
    let mut converted = 0usize;
    let mut failed = 0usize;
    for path in &files {
        spinner.set_message(format!("Converting {}", path.display()));
        match arcana_xml::convert_file(path, dest_dir, compress) {
            Ok(done) => {
                converted += 1;
                spinner.suspend(|| {
                    log::info!(
                        "  {} Wrote {} spells into {}",
                        "\u{2713}".if_supports_color(Stdout, |t| t.green()),
                        done.spells,
                        done.dest.display(),
                    );
                });
            }
            Err(e) => {
                failed += 1;
                spinner.suspend(|| log::warn!("  Skipped {}", e));
            }
        }
    }
    spinner.finish();

    crate::log_blank();
    log::info!("Converted {} file(s), {} skipped.", converted, failed);
    if failed > 0 {
        return Err(CliError::source_file(format!(
            "{} spellbook(s) could not be converted",
            failed
        )));
    }
    Ok(())
}
