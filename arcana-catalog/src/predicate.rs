//! Compiled filter predicates and sort orders.
//!
//! A [`Predicate`] is the safe, executable form of a
//! [`Criteria`](crate::Criteria). Column names only ever come from the closed
//! [`Column`] enum and user values are carried as data, so the storage layer
//! can render a predicate with bound parameters. [`Predicate::matches`]
//! evaluates the same semantics in memory.

use std::borrow::Cow;
use std::cmp::Ordering;

use crate::error::CriteriaError;
use crate::types::Spell;

// ── Column ──────────────────────────────────────────────────────────────────

/// A filterable and sortable spell column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Book,
    Name,
    Level,
    School,
    Ritual,
    Guild,
    Category,
    Range,
    Duration,
    CastingTime,
    Description,
    Casters,
}

const ALL_COLUMNS: &[Column] = &[
    Column::Book,
    Column::Name,
    Column::Level,
    Column::School,
    Column::Ritual,
    Column::Guild,
    Column::Category,
    Column::Range,
    Column::Duration,
    Column::CastingTime,
    Column::Description,
    Column::Casters,
];

impl Column {
    /// Columns searched by the "general" filter.
    pub const GENERAL: &'static [Column] = &[
        Column::Book,
        Column::Name,
        Column::Category,
        Column::Range,
        Column::Duration,
        Column::CastingTime,
        Column::Description,
        Column::School,
        Column::Casters,
    ];

    pub fn all() -> &'static [Column] {
        ALL_COLUMNS
    }

    /// Column name in the `spells` table.
    pub fn sql_name(&self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::Name => "name",
            Self::Level => "level",
            Self::School => "school",
            Self::Ritual => "ritual",
            Self::Guild => "guild",
            Self::Category => "category",
            Self::Range => "range",
            Self::Duration => "duration",
            Self::CastingTime => "casting_time",
            Self::Description => "description",
            Self::Casters => "casters",
        }
    }

    /// The stored value of this column for a spell, as SQLite sees it.
    ///
    /// Flags are 0/1 integers, school and casters use their upper-case
    /// storage tokens, and a missing category is `None` (NULL).
    pub fn value_of(&self, spell: &Spell) -> Option<Value> {
        match self {
            Self::Level => Some(Value::Integer(i64::from(spell.level))),
            Self::Ritual => Some(Value::Integer(i64::from(spell.ritual))),
            Self::Guild => Some(Value::Integer(i64::from(spell.guild))),
            _ => self.text_of(spell).map(|t| Value::Text(t.into_owned())),
        }
    }

    /// Text form of the stored value, used for substring matching.
    pub fn text_of<'a>(&self, spell: &'a Spell) -> Option<Cow<'a, str>> {
        match self {
            Self::Book => Some(Cow::Borrowed(&spell.book)),
            Self::Name => Some(Cow::Borrowed(&spell.name)),
            Self::Level => Some(Cow::Owned(spell.level.to_string())),
            Self::School => Some(Cow::Borrowed(spell.school.as_str())),
            Self::Ritual => Some(Cow::Borrowed(if spell.ritual { "1" } else { "0" })),
            Self::Guild => Some(Cow::Borrowed(if spell.guild { "1" } else { "0" })),
            Self::Category => spell.category.as_deref().map(Cow::Borrowed),
            Self::Range => Some(Cow::Borrowed(&spell.range)),
            Self::Duration => Some(Cow::Borrowed(&spell.duration)),
            Self::CastingTime => Some(Cow::Borrowed(&spell.casting_time)),
            Self::Description => Some(Cow::Borrowed(&spell.description)),
            Self::Casters => Some(Cow::Owned(spell.casters_str())),
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sql_name())
    }
}

impl std::str::FromStr for Column {
    type Err = CriteriaError;

    /// Parse a column from its name (case-insensitive). Accepts `casting-time`
    /// and `caster` as aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "casting-time" => return Ok(Self::CastingTime),
            "caster" => return Ok(Self::Casters),
            _ => {}
        }
        ALL_COLUMNS
            .iter()
            .copied()
            .find(|c| c.sql_name() == lower)
            .ok_or_else(|| CriteriaError::invalid_sort(format!("unknown column '{}'", s.trim())))
    }
}

// ── Predicate ───────────────────────────────────────────────────────────────

/// A literal compared for equality.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Value {
    Integer(i64),
    Text(String),
}

/// A boolean predicate over spells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Matches everything (no WHERE restriction).
    True,
    /// Case-insensitive substring match. `needle` is stored ASCII-lowercased.
    Contains { column: Column, needle: String },
    /// Exact equality against the stored value.
    Equals { column: Column, value: Value },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn contains(column: Column, needle: &str) -> Self {
        Self::Contains {
            column,
            needle: needle.to_ascii_lowercase(),
        }
    }

    pub fn equals_int(column: Column, value: i64) -> Self {
        Self::Equals {
            column,
            value: Value::Integer(value),
        }
    }

    pub fn equals_flag(column: Column, flag: bool) -> Self {
        Self::equals_int(column, i64::from(flag))
    }

    /// Conjunction, collapsing a single term to itself.
    pub fn all(mut terms: Vec<Predicate>) -> Self {
        match terms.len() {
            0 => Self::True,
            1 => terms.swap_remove(0),
            _ => Self::And(terms),
        }
    }

    /// Disjunction, collapsing a single term to itself.
    pub fn any(mut terms: Vec<Predicate>) -> Self {
        match terms.len() {
            1 => terms.swap_remove(0),
            _ => Self::Or(terms),
        }
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Self::True)
    }

    /// Evaluate against a spell in memory.
    ///
    /// Case folding is ASCII-only, the same as SQLite's built-in `LOWER`, and a
    /// NULL column never matches.
    pub fn matches(&self, spell: &Spell) -> bool {
        match self {
            Self::True => true,
            Self::Contains { column, needle } => column
                .text_of(spell)
                .is_some_and(|text| text.to_ascii_lowercase().contains(needle.as_str())),
            Self::Equals { column, value } => column.value_of(spell).as_ref() == Some(value),
            Self::And(terms) => terms.iter().all(|t| t.matches(spell)),
            Self::Or(terms) => terms.iter().any(|t| t.matches(spell)),
        }
    }
}

// ── Sort Order ──────────────────────────────────────────────────────────────

/// Sort column and direction. Ties always fall back to `(book, name)`
/// ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: Column,
    pub descending: bool,
}

impl SortOrder {
    pub fn ascending(column: Column) -> Self {
        Self {
            column,
            descending: false,
        }
    }

    pub fn descending(column: Column) -> Self {
        Self {
            column,
            descending: true,
        }
    }

    /// Compare two spells the way the storage engine orders them.
    pub fn compare(&self, a: &Spell, b: &Spell) -> Ordering {
        let primary = self.column.value_of(a).cmp(&self.column.value_of(b));
        let primary = if self.descending {
            primary.reverse()
        } else {
            primary
        };
        primary.then_with(|| a.natural_key().cmp(&b.natural_key()))
    }

    pub fn sort(&self, spells: &mut [Spell]) {
        spells.sort_by(|a, b| self.compare(a, b));
    }
}

impl std::str::FromStr for SortOrder {
    type Err = CriteriaError;

    /// Parse `"level"`, `"level desc"` or `"level:desc"` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s
            .split(|c: char| c == ':' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .collect();

        let (column, direction) = match tokens.as_slice() {
            [column] => (*column, None),
            [column, direction] => (*column, Some(*direction)),
            _ => return Err(CriteriaError::invalid_sort(s.trim())),
        };

        let column: Column = column.parse()?;
        let descending = match direction.map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") | Some("ascending") => false,
            Some("desc") | Some("descending") => true,
            Some(other) => {
                return Err(CriteriaError::invalid_sort(format!(
                    "unknown direction '{other}'"
                )));
            }
        };

        Ok(Self { column, descending })
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let direction = if self.descending { "desc" } else { "asc" };
        write!(f, "{} {}", self.column, direction)
    }
}
