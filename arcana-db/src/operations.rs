//! Write operations: clearing the catalog and bulk loading spells.

use arcana_catalog::{CriteriaError, Spell};
use rusqlite::{params, Connection, Transaction};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] rusqlite::Error),
    #[error("Duplicate spell '{name}' in book '{book}'")]
    DuplicateKey { book: String, name: String },
    #[error(transparent)]
    Criteria(#[from] CriteriaError),
}

const INSERT_SQL: &str = r#"
    INSERT INTO spells (book, name, level, school, ritual, guild, category, "range",
        duration, casting_time, description, casters, components)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
"#;

/// Delete every spell, leaving the table in place. Returns the number removed.
pub fn clear_spells(conn: &Connection) -> Result<usize, StoreError> {
    let removed = conn.execute("DELETE FROM spells", [])?;
    Ok(removed)
}

/// Insert all spells in a single transaction.
///
/// A natural-key collision, against stored spells or within `spells` itself,
/// rolls back the whole batch and returns [`StoreError::DuplicateKey`].
pub fn insert_spells(conn: &mut Connection, spells: &[Spell]) -> Result<usize, StoreError> {
    let tx = conn.transaction()?;
    insert_all(&tx, spells)?;
    tx.commit()?;
    Ok(spells.len())
}

/// Replace the whole catalog with `spells` in one transaction.
///
/// The delete and the inserts commit together, so a failed load (for
/// example a [`StoreError::DuplicateKey`]) leaves the previous catalog intact.
pub fn replace_spells(conn: &mut Connection, spells: &[Spell]) -> Result<usize, StoreError> {
    let tx = conn.transaction()?;
    let removed = tx.execute("DELETE FROM spells", [])?;
    log::debug!("Replacing {} stored spells with {}", removed, spells.len());
    insert_all(&tx, spells)?;
    tx.commit()?;
    Ok(spells.len())
}

// Dropping the caller's transaction on error rolls it back.
fn insert_all(tx: &Transaction, spells: &[Spell]) -> Result<(), StoreError> {
    let mut stmt = tx.prepare(INSERT_SQL)?;
    for spell in spells {
        let components = serde_json::to_string(&spell.components)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        let result = stmt.execute(params![
            spell.book,
            spell.name,
            spell.level,
            spell.school.as_str(),
            spell.ritual,
            spell.guild,
            spell.category,
            spell.range,
            spell.duration,
            spell.casting_time,
            spell.description,
            spell.casters_str(),
            components,
        ]);
        match result {
            Ok(_) => {}
            Err(e) if is_primary_key_violation(&e) => {
                return Err(StoreError::DuplicateKey {
                    book: spell.book.clone(),
                    name: spell.name.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

fn is_primary_key_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}
