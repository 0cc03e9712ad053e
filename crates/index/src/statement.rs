//! SQL statement assembly.
//!
//! Compiled criteria only yield fragments. These functions wrap them into
//! complete statements over the product base table, always restricted to the
//! manager's site scope.

use chrono::NaiveDateTime;
use mshop_criteria::{CompiledCriteria, CompiledField, Slice};

use crate::product;

/// Format of timestamps in index tables.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn from_clause(joins: &[String]) -> String {
    let mut from = format!(r#"FROM "{}" AS {}"#, product::TABLE, product::ALIAS);
    for join in joins {
        from.push(' ');
        from.push_str(join);
    }
    from
}

fn where_clause(site_predicate: &str, conditions: &str) -> String {
    format!("WHERE {} AND ( {} )", site_predicate, conditions)
}

fn assemble(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// `SELECT` of the matching product ids, sorted and sliced.
pub fn search(compiled: &CompiledCriteria, site_predicate: &str, slice: Slice) -> String {
    assemble(&[
        &format!("SELECT DISTINCT {}", product::ID_COLUMN),
        &from_clause(&compiled.joins),
        &where_clause(site_predicate, &compiled.conditions),
        &compiled.order_clause(),
        &format!("LIMIT {} OFFSET {}", slice.size, slice.start),
    ])
}

/// `SELECT COUNT` of all matching products, ignoring sort and slice.
pub fn count(compiled: &CompiledCriteria, site_predicate: &str) -> String {
    assemble(&[
        &format!(r#"SELECT COUNT(DISTINCT {}) AS "count""#, product::ID_COLUMN),
        &from_clause(&compiled.joins),
        &where_clause(site_predicate, &compiled.conditions),
    ])
}

/// Number of matching products per distinct key value.
pub fn aggregate(
    compiled: &CompiledCriteria,
    key: &CompiledField,
    site_predicate: &str,
    slice: Slice,
) -> String {
    let mut joins = key.joins.clone();
    for join in &compiled.joins {
        if !joins.contains(join) {
            joins.push(join.clone());
        }
    }

    assemble(&[
        &format!(
            r#"SELECT {} AS "key", COUNT(DISTINCT {}) AS "count""#,
            key.sql,
            product::ID_COLUMN
        ),
        &from_clause(&joins),
        &where_clause(site_predicate, &compiled.conditions),
        &format!("GROUP BY {}", key.sql),
        r#"ORDER BY "count" DESC"#,
        &format!("LIMIT {} OFFSET {}", slice.size, slice.start),
    ])
}

/// Removes index rows of the site that were not refreshed since `before`.
pub fn cleanup(table: &str, site_predicate: &str, before: &NaiveDateTime) -> String {
    format!(
        r#"DELETE FROM "{}" WHERE {} AND "mtime" < '{}'"#,
        table,
        site_predicate,
        before.format(DATETIME_FORMAT)
    )
}
