//! Loading spellbook files from disk.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

use arcana_catalog::Spell;
use flate2::read::GzDecoder;

use crate::error::XmlError;
use crate::spellbook::parse_spellbook;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Load one spellbook file, plain or gzip-compressed.
///
/// Compression is detected from the file's leading bytes, not its extension.
pub fn load_spellbook(path: &Path) -> Result<Vec<Spell>, XmlError> {
    let start = Instant::now();
    log::debug!("Loading {}", path.display());

    let spells = read_spellbook(path).map_err(|e| XmlError::in_file(path, e))?;

    log::debug!(
        "Loaded {} spells from {} ({:.2} s)",
        spells.len(),
        path.display(),
        start.elapsed().as_secs_f64()
    );
    Ok(spells)
}

fn read_spellbook(path: &Path) -> Result<Vec<Spell>, XmlError> {
    let mut reader = BufReader::new(File::open(path)?);
    if reader.fill_buf()?.starts_with(&GZIP_MAGIC) {
        parse_spellbook(BufReader::new(GzDecoder::new(reader)))
    } else {
        parse_spellbook(reader)
    }
}

/// True for `.xml` and `.xml.gz` file names (case-insensitive).
pub fn is_spellbook_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| {
            let lower = n.to_ascii_lowercase();
            lower.ends_with(".xml") || lower.ends_with(".xml.gz")
        })
        .unwrap_or(false)
}

/// List the spellbook files directly inside `dir`, sorted by path.
pub fn spellbook_files(dir: &Path) -> Result<Vec<PathBuf>, XmlError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_spellbook_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Progress reported by [`load_all_spellbooks`] for each file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadProgress<'a> {
    /// About to parse this file.
    Loading { path: &'a Path },
    /// Finished parsing this file.
    Loaded { path: &'a Path, spells: usize },
}

/// Load every spellbook in `dir`, in sorted order.
///
/// Stops at the first file that fails to load.
pub fn load_all_spellbooks(
    dir: &Path,
    mut on_progress: impl FnMut(LoadProgress<'_>),
) -> Result<Vec<Spell>, XmlError> {
    let start = Instant::now();
    let mut spells = Vec::new();
    for path in spellbook_files(dir)? {
        on_progress(LoadProgress::Loading { path: &path });
        let book = load_spellbook(&path)?;
        on_progress(LoadProgress::Loaded {
            path: &path,
            spells: book.len(),
        });
        spells.extend(book);
    }
    log::debug!(
        "Done loading {} spells from {} ({:.2} s)",
        spells.len(),
        dir.display(),
        start.elapsed().as_secs_f64()
    );
    Ok(spells)
}

/// File name with its `.xml` / `.xml.gz` suffix removed.
pub fn spellbook_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let lower = name.to_ascii_lowercase();
    for suffix in [".xml.gz", ".xml"] {
        if lower.ends_with(suffix) {
            return name[..name.len() - suffix.len()].to_string();
        }
    }
    name
}

#[cfg(test)]
#[path = "tests/loader_tests.rs"]
mod tests;
