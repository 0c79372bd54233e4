//! Read queries for the spell database.
//!
//! Provides predicate-filtered lookup, counting, and catalog statistics.

use std::collections::BTreeMap;

use arcana_catalog::{Caster, Column, Component, Predicate, School, SortOrder, Spell};
use rusqlite::types::Type;
use rusqlite::{params_from_iter, Connection, Row};

use crate::operations::StoreError;
use crate::sql::SqlQuery;

const SPELL_COLUMNS: &str = r#"book, name, level, school, ritual, guild, category, "range",
    duration, casting_time, description, casters, components"#;

// ── Spell Lookups ───────────────────────────────────────────────────────────

/// Find spells matching `predicate`.
///
/// Results are ordered by `sort` (if any) and then by `(book, name)`.
/// `limit` caps the number of rows; `Some(0)` returns nothing.
pub fn find_spells(
    conn: &Connection,
    predicate: &Predicate,
    sort: Option<&SortOrder>,
    limit: Option<usize>,
) -> Result<Vec<Spell>, StoreError> {
    let query = SqlQuery::select(SPELL_COLUMNS, predicate, sort, limit);
    let mut stmt = conn.prepare(&query.sql)?;
    let rows = stmt.query_map(params_from_iter(query.params.iter()), row_to_spell)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Count spells matching `predicate`.
pub fn count_spells(conn: &Connection, predicate: &Predicate) -> Result<i64, StoreError> {
    let query = SqlQuery::count(predicate);
    let count = conn.query_row(&query.sql, params_from_iter(query.params.iter()), |r| {
        r.get(0)
    })?;
    Ok(count)
}

/// Find a single spell by its natural key.
pub fn find_spell(conn: &Connection, book: &str, name: &str) -> Result<Option<Spell>, StoreError> {
    let sql = format!("SELECT {SPELL_COLUMNS} FROM spells WHERE book = ?1 AND name = ?2");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query_map([book, name], row_to_spell)?;
    match rows.next() {
        Some(spell) => Ok(Some(spell?)),
        None => Ok(None),
    }
}

fn row_to_spell(row: &Row) -> rusqlite::Result<Spell> {
    let school: String = row.get(3)?;
    let casters: String = row.get(11)?;
    let components: String = row.get(12)?;
    Ok(Spell {
        book: row.get(0)?,
        name: row.get(1)?,
        level: row.get(2)?,
        school: school
            .parse::<School>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?,
        ritual: row.get(4)?,
        guild: row.get(5)?,
        category: row.get(6)?,
        range: row.get(7)?,
        duration: row.get(8)?,
        casting_time: row.get(9)?,
        description: row.get(10)?,
        casters: Caster::split(&casters)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(11, Type::Text, Box::new(e)))?,
        components: serde_json::from_str::<Vec<Component>>(&components)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(12, Type::Text, Box::new(e)))?,
    })
}

// ── Statistics ──────────────────────────────────────────────────────────────

/// Summary statistics for the catalog.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CatalogStats {
    pub total: i64,
    pub books: BTreeMap<String, i64>,
    pub levels: BTreeMap<u32, i64>,
    pub schools: BTreeMap<School, i64>,
    /// Every caster appears, including those with no spells.
    pub casters: BTreeMap<Caster, i64>,
}

/// Get overall catalog statistics.
pub fn catalog_stats(conn: &Connection) -> Result<CatalogStats, StoreError> {
    let total = count_spells(conn, &Predicate::True)?;

    let mut stmt = conn.prepare("SELECT book, COUNT(*) FROM spells GROUP BY book")?;
    let books = stmt
        .query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)?)))?
        .collect::<Result<BTreeMap<_, _>, _>>()?;

    let mut stmt = conn.prepare("SELECT level, COUNT(*) FROM spells GROUP BY level")?;
    let levels = stmt
        .query_map([], |r| Ok((r.get::<_, u32>(0)?, r.get::<_, i64>(1)?)))?
        .collect::<Result<BTreeMap<_, _>, _>>()?;

    let mut stmt = conn.prepare("SELECT school, COUNT(*) FROM spells GROUP BY school")?;
    let mut schools = BTreeMap::new();
    let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)?)))?;
    for row in rows {
        let (school, count) = row?;
        match school.parse::<School>() {
            Ok(school) => *schools.entry(school).or_insert(0) += count,
            Err(e) => log::warn!("Skipping unknown school in statistics: {}", e),
        }
    }

    let mut casters = BTreeMap::new();
    for &caster in Caster::all() {
        let matching = Predicate::contains(Column::Casters, caster.as_str());
        casters.insert(caster, count_spells(conn, &matching)?);
    }

    Ok(CatalogStats {
        total,
        books,
        levels,
        schools,
        casters,
    })
}
