//! SQLite persistence layer for the spell catalog.
//!
//! Provides schema creation, bulk loading, predicate execution, and
//! aggregate statistics backed by SQLite (via rusqlite with bundled feature).

pub mod operations;
pub mod queries;
pub mod schema;
pub mod sql;
pub mod store;

pub use operations::{clear_spells, insert_spells, replace_spells, StoreError};
pub use queries::{catalog_stats, count_spells, find_spell, find_spells, CatalogStats};
pub use schema::{create_schema, open_database, open_existing, open_memory};
pub use sql::{where_clause, SqlQuery};
pub use store::SpellStore;
