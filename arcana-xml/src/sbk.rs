//! Writer for the plain-text `.sbk` spellbook format.
//!
//! ```text
//! book: Player's Handbook
//! guild: N
//!
//!
//! name: Fireball
//! level: 3
//! school: EVOCATION
//! category:
//! casting-time: 1 action
//! ritual: N
//! range: 150 feet
//! duration: Instantaneous
//! components: V, S, M (a tiny ball of bat guano)
//! casters: Sorcerer, Wizard
//! description:
//! A bright streak flashes...
//! ^^^
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use arcana_catalog::Spell;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::XmlError;
use crate::loader::{load_spellbook, spellbook_stem};

/// Marks the end of a description block.
pub const DESCRIPTION_END: &str = "^^^";

/// Write spells in `.sbk` format. The header is taken from the first spell.
pub fn write_spellbook<W: Write>(mut writer: W, spells: &[Spell]) -> Result<(), XmlError> {
    let Some(first) = spells.first() else {
        return Err(XmlError::invalid_spellbook("Cannot write an empty spellbook"));
    };

    write_field(&mut writer, "book", &first.book)?;
    write_field(&mut writer, "guild", yes_no(first.guild))?;
    writer.write_all(b"\n\n")?;

    for spell in spells {
        write_field(&mut writer, "name", &spell.name)?;
        write_field(&mut writer, "level", &spell.level.to_string())?;
        write_field(&mut writer, "school", spell.school.as_str())?;
        write_field(&mut writer, "category", spell.category.as_deref().unwrap_or(""))?;
        write_field(&mut writer, "casting-time", &spell.casting_time)?;
        write_field(&mut writer, "ritual", yes_no(spell.ritual))?;
        write_field(&mut writer, "range", &spell.range)?;
        write_field(&mut writer, "duration", &spell.duration)?;
        write_field(&mut writer, "components", &spell.components_display(true))?;
        write_field(&mut writer, "casters", &spell.casters_display())?;
        writeln!(writer, "description:")?;
        writer.write_all(spell.description.as_bytes())?;
        write!(writer, "\n{DESCRIPTION_END}\n\n")?;
    }

    writer.flush()?;
    Ok(())
}

fn write_field<W: Write>(writer: &mut W, field: &str, value: &str) -> std::io::Result<()> {
    writeln!(writer, "{field}: {value}")
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Y" } else { "N" }
}

/// Result of converting one spellbook file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub spells: usize,
}

/// Convert one XML spellbook into `<dest_dir>/<stem>.sbk`, or `.sbk.gz` when
/// `compress` is set. `dest_dir` is created if needed.
pub fn convert_file(src: &Path, dest_dir: &Path, compress: bool) -> Result<Converted, XmlError> {
    let spells = load_spellbook(src)?;
    if spells.is_empty() {
        return Err(XmlError::in_file(
            src,
            XmlError::invalid_spellbook("Cannot write an empty spellbook"),
        ));
    }

    std::fs::create_dir_all(dest_dir)?;
    let extension = if compress { "sbk.gz" } else { "sbk" };
    let dest = dest_dir.join(format!("{}.{extension}", spellbook_stem(src)));

    let file = File::create(&dest)?;
    let written = if compress {
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        write_spellbook(&mut encoder, &spells).and_then(|()| {
            encoder.finish()?.flush()?;
            Ok(())
        })
    } else {
        write_spellbook(BufWriter::new(file), &spells)
    };
    written.map_err(|e| XmlError::in_file(src, e))?;

    log::debug!("Wrote {} spells into {}", spells.len(), dest.display());
    Ok(Converted {
        source: src.to_path_buf(),
        dest,
        spells: spells.len(),
    })
}

#[cfg(test)]
#[path = "tests/sbk_tests.rs"]
mod tests;
