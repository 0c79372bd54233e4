use std::path::PathBuf;

use arcana_catalog::VocabularyError;

/// Errors that can occur while reading or converting spellbook files.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Unknown vocabulary value ({0})")]
    Vocabulary(#[from] VocabularyError),

    #[error("Invalid spellbook: {0}")]
    InvalidSpellbook(String),

    #[error("{}: {source}", path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<XmlError>,
    },
}

impl XmlError {
    pub fn invalid_spellbook(msg: impl Into<String>) -> Self {
        Self::InvalidSpellbook(msg.into())
    }

    pub fn in_file(path: impl Into<PathBuf>, source: XmlError) -> Self {
        Self::InFile {
            path: path.into(),
            source: Box::new(source),
        }
    }
}
