//! Filter criteria and their compilation into [`Predicate`]s.
//!
//! Every criteria field holds either a single value or a parenthesized,
//! comma-separated list of alternatives such as `(wizard, 'cleric')`. Lists
//! are parsed by a strict delimiter parser; nothing in a value is ever
//! interpreted as query text.

use crate::error::CriteriaError;
use crate::predicate::{Column, Predicate};

/// Tokens treated as "true" by [`parse_flag`] (case-insensitive).
pub const TRUTHY_TOKENS: &[&str] = &["true", "yes", "y"];

/// Tokens recognized as an explicit "false" by [`parse_flag_strict`].
pub const FALSY_TOKENS: &[&str] = &["false", "no", "n"];

/// A transient, multi-field filter request.
///
/// Text-valued fields match by case-insensitive substring, `level` by exact
/// equality, and the flags by equality. `general` searches every
/// text-comparable column at once. Unset and empty fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    pub book: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub range: Option<String>,
    pub duration: Option<String>,
    pub casting_time: Option<String>,
    pub description: Option<String>,
    /// `"1"` or `"(1, 3, 7)"`.
    pub level: Option<String>,
    pub ritual: Option<bool>,
    pub guild: Option<bool>,
    /// `"conjuration"` or `"(conjuration, evocation)"`.
    pub school: Option<String>,
    /// `"wizard"` or `"(wizard, warlock)"`.
    pub caster: Option<String>,
    pub general: Option<String>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no field would restrict the result set.
    pub fn is_empty(&self) -> bool {
        [
            &self.book,
            &self.name,
            &self.category,
            &self.range,
            &self.duration,
            &self.casting_time,
            &self.description,
            &self.level,
            &self.school,
            &self.caster,
            &self.general,
        ]
        .into_iter()
        .all(is_unset)
            && self.ritual.is_none()
            && self.guild.is_none()
    }

    /// Compile into a predicate. Empty criteria compile to [`Predicate::True`].
    ///
    /// Field terms are ANDed in a fixed order so the same criteria always
    /// produce the same predicate.
    pub fn compile(&self) -> Result<Predicate, CriteriaError> {
        let mut terms = Vec::new();

        text_term(&mut terms, "book", Column::Book, &self.book)?;
        text_term(&mut terms, "name", Column::Name, &self.name)?;
        text_term(&mut terms, "category", Column::Category, &self.category)?;
        text_term(&mut terms, "range", Column::Range, &self.range)?;
        text_term(&mut terms, "duration", Column::Duration, &self.duration)?;
        text_term(&mut terms, "casting_time", Column::CastingTime, &self.casting_time)?;
        text_term(&mut terms, "description", Column::Description, &self.description)?;
        level_term(&mut terms, &self.level)?;
        flag_term(&mut terms, Column::Ritual, self.ritual);
        flag_term(&mut terms, Column::Guild, self.guild);
        text_term(&mut terms, "school", Column::School, &self.school)?;
        text_term(&mut terms, "caster", Column::Casters, &self.caster)?;
        general_term(&mut terms, &self.general);

        Ok(Predicate::all(terms))
    }
}

/// Compile criteria into a predicate. See [`Criteria::compile`].
pub fn compile(criteria: &Criteria) -> Result<Predicate, CriteriaError> {
    criteria.compile()
}

/// Interpret a flag token: `true`, `yes` and `y` (any case) are true,
/// everything else is false.
pub fn parse_flag(token: &str) -> bool {
    let token = token.trim();
    TRUTHY_TOKENS.iter().any(|t| t.eq_ignore_ascii_case(token))
}

/// Like [`parse_flag`] but returns `None` for tokens in neither vocabulary.
pub fn parse_flag_strict(token: &str) -> Option<bool> {
    let token = token.trim();
    if TRUTHY_TOKENS.iter().any(|t| t.eq_ignore_ascii_case(token)) {
        Some(true)
    } else if FALSY_TOKENS.iter().any(|t| t.eq_ignore_ascii_case(token)) {
        Some(false)
    } else {
        None
    }
}

/// Split a criteria value into its alternatives.
///
/// Returns `Ok(None)` for blank values. A value starting with `(` must be a
/// well-formed list; anything else is a single value, trimmed.
pub fn parse_values(field: &'static str, raw: &str) -> Result<Option<Vec<String>>, CriteriaError> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if !value.starts_with('(') {
        return Ok(Some(vec![value.to_string()]));
    }
    let Some(inner) = value
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    else {
        return Err(CriteriaError::invalid_list(field, raw, "missing closing ')'"));
    };
    parse_list(field, raw, inner).map(Some)
}

fn parse_list(field: &'static str, raw: &str, inner: &str) -> Result<Vec<String>, CriteriaError> {
    let fail = |reason: String| CriteriaError::invalid_list(field, raw, reason);

    if inner.trim().is_empty() {
        return Err(fail("empty list".to_string()));
    }

    let mut items = Vec::new();
    let mut chars = inner.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let item = match chars.peek().copied() {
            None => return Err(fail(format!("empty item at position {}", items.len() + 1))),
            Some(quote @ ('\'' | '"')) => {
                chars.next();
                let mut token = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == quote {
                        closed = true;
                        break;
                    }
                    token.push(c);
                }
                if !closed {
                    return Err(fail("unterminated quote".to_string()));
                }
                while chars.next_if(|c| c.is_whitespace()).is_some() {}
                if chars.peek().is_some_and(|&c| c != ',') {
                    return Err(fail("unexpected text after quoted item".to_string()));
                }
                token
            }
            Some(_) => {
                let mut token = String::new();
                while let Some(c) = chars.next_if(|&c| c != ',') {
                    if c == '(' || c == ')' {
                        return Err(fail(format!("unexpected '{c}'")));
                    }
                    token.push(c);
                }
                token.trim_end().to_string()
            }
        };

        if item.is_empty() {
            return Err(fail(format!("empty item at position {}", items.len() + 1)));
        }
        items.push(item);

        // Only a comma or the end of input can follow an item.
        if chars.next().is_none() {
            break;
        }
    }

    Ok(items)
}

fn is_unset(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

fn text_term(
    terms: &mut Vec<Predicate>,
    field: &'static str,
    column: Column,
    value: &Option<String>,
) -> Result<(), CriteriaError> {
    let Some(raw) = value.as_deref() else {
        return Ok(());
    };
    if let Some(values) = parse_values(field, raw)? {
        let alternatives = values
            .iter()
            .map(|v| Predicate::contains(column, v))
            .collect();
        terms.push(Predicate::any(alternatives));
    }
    Ok(())
}

fn level_term(terms: &mut Vec<Predicate>, value: &Option<String>) -> Result<(), CriteriaError> {
    let Some(raw) = value.as_deref() else {
        return Ok(());
    };
    if let Some(values) = parse_values("level", raw)? {
        let alternatives = values
            .iter()
            .map(|v| {
                v.trim()
                    .parse::<u32>()
                    .map(|level| Predicate::equals_int(Column::Level, i64::from(level)))
                    .map_err(|_| CriteriaError::invalid_value("level", v.as_str()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        terms.push(Predicate::any(alternatives));
    }
    Ok(())
}

fn flag_term(terms: &mut Vec<Predicate>, column: Column, value: Option<bool>) {
    if let Some(flag) = value {
        terms.push(Predicate::equals_flag(column, flag));
    }
}

/// The general filter is never a list: its value is searched literally.
fn general_term(terms: &mut Vec<Predicate>, value: &Option<String>) {
    let Some(needle) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) else {
        return;
    };
    let alternatives = Column::GENERAL
        .iter()
        .map(|&column| Predicate::contains(column, needle))
        .collect();
    terms.push(Predicate::Or(alternatives));
}

#[cfg(test)]
#[path = "tests/criteria_tests.rs"]
mod tests;
