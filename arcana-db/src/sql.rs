//! Rendering compiled predicates as parameterized SQL.
//!
//! Identifiers come only from [`Column::sql_name`]; every user-supplied value
//! becomes a numbered bound parameter.

use arcana_catalog::{Column, Predicate, SortOrder, Value};
use rusqlite::types::Value as SqlValue;

/// A SQL fragment together with the values bound to its `?N` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl SqlQuery {
    /// `SELECT <columns> FROM spells [WHERE ..] ORDER BY .. [LIMIT ?]`.
    pub fn select(
        columns: &str,
        predicate: &Predicate,
        sort: Option<&SortOrder>,
        limit: Option<usize>,
    ) -> Self {
        let mut params = Vec::new();
        let mut sql = format!("SELECT {columns} FROM spells");

        if let Some(clause) = where_clause(predicate, &mut params) {
            sql.push_str(" WHERE ");
            sql.push_str(&clause);
        }

        sql.push_str(" ORDER BY ");
        if let Some(order) = sort {
            let direction = if order.descending { "DESC" } else { "ASC" };
            sql.push_str(&format!("{} {direction}, ", quoted(order.column)));
        }
        sql.push_str("book ASC, name ASC");

        if let Some(limit) = limit {
            params.push(SqlValue::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
            sql.push_str(&format!(" LIMIT ?{}", params.len()));
        }

        Self { sql, params }
    }

    /// `SELECT COUNT(*) FROM spells [WHERE ..]`.
    pub fn count(predicate: &Predicate) -> Self {
        let mut params = Vec::new();
        let mut sql = "SELECT COUNT(*) FROM spells".to_string();
        if let Some(clause) = where_clause(predicate, &mut params) {
            sql.push_str(" WHERE ");
            sql.push_str(&clause);
        }
        Self { sql, params }
    }
}

/// Render a predicate as a WHERE condition, or `None` for [`Predicate::True`].
pub fn where_clause(predicate: &Predicate, params: &mut Vec<SqlValue>) -> Option<String> {
    if predicate.is_true() {
        return None;
    }
    let mut out = String::new();
    render(predicate, &mut out, params);
    Some(out)
}

fn render(predicate: &Predicate, out: &mut String, params: &mut Vec<SqlValue>) {
    match predicate {
        Predicate::True => out.push('1'),
        Predicate::Contains { column, needle } => {
            params.push(SqlValue::Text(format!("%{}%", escape_like(needle))));
            out.push_str(&format!(
                "LOWER({}) LIKE ?{} ESCAPE '\\'",
                quoted(*column),
                params.len()
            ));
        }
        Predicate::Equals { column, value } => {
            params.push(match value {
                Value::Integer(i) => SqlValue::Integer(*i),
                Value::Text(t) => SqlValue::Text(t.clone()),
            });
            out.push_str(&format!("{} = ?{}", quoted(*column), params.len()));
        }
        Predicate::And(terms) => render_joined(terms, " AND ", '1', out, params),
        Predicate::Or(terms) => render_joined(terms, " OR ", '0', out, params),
    }
}

fn render_joined(
    terms: &[Predicate],
    separator: &str,
    empty: char,
    out: &mut String,
    params: &mut Vec<SqlValue>,
) {
    if terms.is_empty() {
        out.push(empty);
        return;
    }
    out.push('(');
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        render(term, out, params);
    }
    out.push(')');
}

fn quoted(column: Column) -> String {
    format!("\"{}\"", column.sql_name())
}

/// Escape LIKE wildcards so the needle matches literally.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
