//! Data model types for the spell catalog.
//!
//! These types represent the persistent catalog schema: spells, the closed
//! school and caster vocabularies, and spell components.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a string does not belong to a closed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: '{value}'")]
pub struct VocabularyError {
    pub kind: &'static str,
    pub value: String,
}

// ── School ──────────────────────────────────────────────────────────────────

/// School of magic a spell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum School {
    Abjuration,
    Conjuration,
    Divination,
    Enchantment,
    Evocation,
    Illusion,
    Necromancy,
    Transmutation,
}

const ALL_SCHOOLS: &[School] = &[
    School::Abjuration,
    School::Conjuration,
    School::Divination,
    School::Enchantment,
    School::Evocation,
    School::Illusion,
    School::Necromancy,
    School::Transmutation,
];

impl School {
    /// Upper-case token used in storage (e.g., "EVOCATION").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Abjuration => "ABJURATION",
            Self::Conjuration => "CONJURATION",
            Self::Divination => "DIVINATION",
            Self::Enchantment => "ENCHANTMENT",
            Self::Evocation => "EVOCATION",
            Self::Illusion => "ILLUSION",
            Self::Necromancy => "NECROMANCY",
            Self::Transmutation => "TRANSMUTATION",
        }
    }

    /// Human-readable label (e.g., "Evocation").
    pub fn label(&self) -> &'static str {
        match self {
            Self::Abjuration => "Abjuration",
            Self::Conjuration => "Conjuration",
            Self::Divination => "Divination",
            Self::Enchantment => "Enchantment",
            Self::Evocation => "Evocation",
            Self::Illusion => "Illusion",
            Self::Necromancy => "Necromancy",
            Self::Transmutation => "Transmutation",
        }
    }

    /// All 8 schools, in declaration order.
    pub fn all() -> &'static [School] {
        ALL_SCHOOLS
    }
}

impl std::fmt::Display for School {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for School {
    type Err = VocabularyError;

    /// Parse a school from its name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ALL_SCHOOLS
            .iter()
            .copied()
            .find(|school| school.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| VocabularyError {
                kind: "school",
                value: s.to_string(),
            })
    }
}

// ── Caster ──────────────────────────────────────────────────────────────────

/// A class able to cast a spell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Caster {
    Bard,
    Cleric,
    Druid,
    Paladin,
    Ranger,
    Sorcerer,
    Warlock,
    Wizard,
}

const ALL_CASTERS: &[Caster] = &[
    Caster::Bard,
    Caster::Cleric,
    Caster::Druid,
    Caster::Paladin,
    Caster::Ranger,
    Caster::Sorcerer,
    Caster::Warlock,
    Caster::Wizard,
];

impl Caster {
    /// Upper-case token used in storage (e.g., "WIZARD").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bard => "BARD",
            Self::Cleric => "CLERIC",
            Self::Druid => "DRUID",
            Self::Paladin => "PALADIN",
            Self::Ranger => "RANGER",
            Self::Sorcerer => "SORCERER",
            Self::Warlock => "WARLOCK",
            Self::Wizard => "WIZARD",
        }
    }

    /// Human-readable label (e.g., "Wizard").
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bard => "Bard",
            Self::Cleric => "Cleric",
            Self::Druid => "Druid",
            Self::Paladin => "Paladin",
            Self::Ranger => "Ranger",
            Self::Sorcerer => "Sorcerer",
            Self::Warlock => "Warlock",
            Self::Wizard => "Wizard",
        }
    }

    /// All 8 casters, in declaration order.
    pub fn all() -> &'static [Caster] {
        ALL_CASTERS
    }

    /// Stored representation of a caster list: `"WIZARD,CLERIC"`.
    pub fn join(casters: &[Caster]) -> String {
        casters
            .iter()
            .map(Caster::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Parse the stored representation produced by [`Caster::join`].
    pub fn split(stored: &str) -> Result<Vec<Caster>, VocabularyError> {
        stored
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(str::parse)
            .collect()
    }
}

impl std::fmt::Display for Caster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Caster {
    type Err = VocabularyError;

    /// Parse a caster from its name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ALL_CASTERS
            .iter()
            .copied()
            .find(|caster| caster.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| VocabularyError {
                kind: "caster",
                value: s.to_string(),
            })
    }
}

// ── Component ───────────────────────────────────────────────────────────────

/// A spell component: a simple tag ("verbal", "somatic") or a material
/// component with optional detail text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Component {
    pub const MATERIAL: &'static str = "material";

    pub fn simple(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            details: None,
        }
    }

    pub fn material(details: Option<String>) -> Self {
        Self {
            kind: Self::MATERIAL.to_string(),
            details,
        }
    }

    pub fn is_material(&self) -> bool {
        self.kind.eq_ignore_ascii_case(Self::MATERIAL)
    }

    /// Short form used in listings: "V", "S", "M" or "M (details)".
    pub fn abbreviation(&self, with_details: bool) -> String {
        if self.is_material() {
            match &self.details {
                Some(d) if with_details && !d.is_empty() => format!("M ({d})"),
                _ => "M".to_string(),
            }
        } else {
            self.kind
                .chars()
                .next()
                .map(|c| c.to_ascii_uppercase().to_string())
                .unwrap_or_default()
        }
    }
}

// ── Spell ───────────────────────────────────────────────────────────────────

/// A single catalog entry. `(book, name)` is the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
    pub book: String,
    pub name: String,
    pub level: u32,
    pub school: School,
    pub ritual: bool,
    pub guild: bool,
    pub category: Option<String>,
    pub range: String,
    pub duration: String,
    pub casting_time: String,
    /// Markdown body.
    pub description: String,
    pub casters: Vec<Caster>,
    pub components: Vec<Component>,
}

impl Spell {
    pub fn natural_key(&self) -> (&str, &str) {
        (&self.book, &self.name)
    }

    /// Stored caster representation, see [`Caster::join`].
    pub fn casters_str(&self) -> String {
        Caster::join(&self.casters)
    }

    /// Display labels joined with ", " (e.g., "Wizard, Cleric").
    pub fn casters_display(&self) -> String {
        self.casters
            .iter()
            .map(Caster::label)
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn components_display(&self, with_details: bool) -> String {
        self.components
            .iter()
            .map(|c| c.abbreviation(with_details))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for Spell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.book, self.level, self.name)
    }
}
