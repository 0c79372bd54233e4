//! Spell catalog data model and the criteria-to-predicate compiler.
//!
//! This crate defines the record model without any database dependencies.
//! Filter requests ([`Criteria`]) compile into [`Predicate`] trees that
//! `arcana-db` renders as parameterized SQL and that can also be evaluated
//! in memory.

pub mod criteria;
pub mod error;
pub mod predicate;
pub mod types;

pub use criteria::{compile, parse_flag, parse_flag_strict, parse_values, Criteria};
pub use error::CriteriaError;
pub use predicate::{Column, Predicate, SortOrder, Value};
pub use types::*;
