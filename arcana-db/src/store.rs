//! File-backed spell store.
//!
//! Each public operation opens its own connection and drops it before
//! returning, so nothing is held open between calls.

use std::path::{Path, PathBuf};

use arcana_catalog::{Criteria, Predicate, SortOrder, Spell};

use crate::operations::{clear_spells, insert_spells, replace_spells, StoreError};
use crate::queries::{catalog_stats, find_spells, CatalogStats};
use crate::schema::{open_database, open_existing};

/// Handle to a spell database at a filesystem location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellStore {
    path: PathBuf,
}

impl SpellStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn location(&self) -> &Path {
        &self.path
    }

    /// Create the database file and schema if missing.
    pub fn initialize(&self) -> Result<(), StoreError> {
        log::debug!("Initializing spell store at {}", self.path.display());
        open_database(&self.path)?;
        Ok(())
    }

    /// Delete every spell. Returns the number removed.
    pub fn clear(&self) -> Result<usize, StoreError> {
        let conn = open_existing(&self.path)?;
        let removed = clear_spells(&conn)?;
        log::debug!("Cleared {} spells from {}", removed, self.path.display());
        Ok(removed)
    }

    /// Insert all spells atomically.
    pub fn bulk_load(&self, spells: &[Spell]) -> Result<usize, StoreError> {
        let mut conn = open_existing(&self.path)?;
        let inserted = insert_spells(&mut conn, spells)?;
        log::debug!("Loaded {} spells into {}", inserted, self.path.display());
        Ok(inserted)
    }

    /// Atomically replace every stored spell with `spells`. On error the
    /// previous contents are kept.
    pub fn replace_all(&self, spells: &[Spell]) -> Result<usize, StoreError> {
        let mut conn = open_existing(&self.path)?;
        let loaded = replace_spells(&mut conn, spells)?;
        log::debug!("Replaced catalog at {} with {} spells", self.path.display(), loaded);
        Ok(loaded)
    }

    /// Run a compiled predicate.
    pub fn query(
        &self,
        predicate: &Predicate,
        sort: Option<&SortOrder>,
        limit: Option<usize>,
    ) -> Result<Vec<Spell>, StoreError> {
        let conn = open_existing(&self.path)?;
        let spells = find_spells(&conn, predicate, sort, limit)?;
        log::debug!("Query returned {} spells", spells.len());
        Ok(spells)
    }

    /// Compile `criteria` and run it. Invalid criteria fail before the
    /// database is touched.
    pub fn find(
        &self,
        criteria: &Criteria,
        sort: Option<&SortOrder>,
        limit: Option<usize>,
    ) -> Result<Vec<Spell>, StoreError> {
        let predicate = criteria.compile()?;
        self.query(&predicate, sort, limit)
    }

    pub fn aggregate(&self) -> Result<CatalogStats, StoreError> {
        let conn = open_existing(&self.path)?;
        catalog_stats(&conn)
    }
}
