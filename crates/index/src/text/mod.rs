//! Text index sub-manager.
//!
//! The standard source declares every text attribute in portable SQL. A
//! dialect source is folded on top of it and replaces the attributes it
//! redeclares; everything else is inherited unchanged.
//!
//! | Code | Standard | MySQL | PostgreSQL |
//! |------|----------|-------|------------|
//! | `index.text.id` | join | join with index hint | inherited |
//! | `index.text.name()` | `LIKE` | `MATCH ... AGAINST` | `@@ to_tsquery` |
//! | `index.text.relevance()` | `LIKE` | `MATCH ... AGAINST` | `ts_rank` |
//! | `sort:index.text.relevance()` | `LIKE` | `MATCH ... AGAINST` | `ts_rank` |
//! | `sort:index.text.name()` | sub-select | inherited | inherited |

pub mod mysql;
pub mod postgres;
pub mod standard;

use mshop_criteria::AttributeSource;

use crate::config::Dialect;

/// Index table.
pub const TABLE: &str = "mshop_index_text";

/// Descriptor sources for a dialect, lowest priority first.
pub fn sources(dialect: Dialect) -> Vec<AttributeSource> {
    let mut sources = vec![standard::source()];

    match dialect {
        Dialect::Standard => {}
        Dialect::Mysql => sources.push(mysql::source()),
        Dialect::Postgresql => sources.push(postgres::source()),
    }

    sources
}

#[cfg(test)]
mod tests {
    use super::*;
    use mshop_criteria::{RegistryBuilder, SiteScope, Value};

    fn build(dialect: Dialect) -> mshop_criteria::AttributeRegistry {
        sources(dialect)
            .into_iter()
            .fold(RegistryBuilder::new("index/text"), RegistryBuilder::source)
            .build(&SiteScope::path("1."))
            .unwrap()
    }

    fn relevance_args(term: &str) -> Vec<Value> {
        vec![Value::from("default"), Value::from("de"), Value::from(term)]
    }

    #[test]
    fn test_all_dialects_expose_same_codes() {
        let codes = |d| build(d).describe_all(false).into_keys().collect::<Vec<_>>();
        assert_eq!(codes(Dialect::Standard), codes(Dialect::Mysql));
        assert_eq!(codes(Dialect::Standard), codes(Dialect::Postgresql));
    }

    #[test]
    fn test_mysql_relevance() {
        let registry = build(Dialect::Mysql);
        let sql = registry
            .resolve("index.text.relevance()")
            .unwrap()
            .render(&relevance_args("red shoes"))
            .unwrap();
        assert_eq!(
            sql,
            r#"mindte."siteid" LIKE '1.%' AND mindte."listtype" IN ('default') AND ( mindte."langid" = 'de' OR mindte."langid" IS NULL ) AND MATCH( mindte."value" ) AGAINST( ' +red* +shoes*' IN BOOLEAN MODE )"#
        );
    }

    #[test]
    fn test_mysql_overrides_join() {
        let registry = build(Dialect::Mysql);
        let id = registry.resolve("index.text.id").unwrap();
        assert!(id.joins[0].contains("USE INDEX"));
        // inherited from the standard source
        assert!(registry.contains("sort:index.text.name()"));
        assert_eq!(registry.list(false).len(), 4);
    }

    #[test]
    fn test_standard_relevance_uses_like() {
        let registry = build(Dialect::Standard);
        let sql = registry
            .resolve("sort:index.text.relevance()")
            .unwrap()
            .render(&relevance_args("red shoes"))
            .unwrap();
        assert_eq!(
            sql,
            r#"CASE WHEN mindte."value" LIKE '%red shoes%' THEN 1 ELSE 0 END"#
        );
    }

    #[test]
    fn test_postgres_name_uses_tsquery() {
        let registry = build(Dialect::Postgresql);
        let sql = registry
            .resolve("index.text.name()")
            .unwrap()
            .render(&[Value::from("de"), Value::from("red shoes")])
            .unwrap();
        assert!(sql.contains(r#"mindte_name."siteid" LIKE '1.%'"#));
        assert!(sql.ends_with("to_tsquery('simple', 'red:* & shoes:*') )"));
    }
}
