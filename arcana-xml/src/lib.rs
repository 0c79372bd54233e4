//! Spellbook ingestion: XML parsing, directory discovery, and conversion to
//! the plain-text `.sbk` format.

pub mod error;
pub mod loader;
pub mod sbk;
pub mod spellbook;

pub use error::XmlError;
pub use loader::{
    is_spellbook_file, load_all_spellbooks, load_spellbook, spellbook_files, spellbook_stem,
    LoadProgress,
};
pub use sbk::{convert_file, write_spellbook, Converted};
pub use spellbook::parse_spellbook;
