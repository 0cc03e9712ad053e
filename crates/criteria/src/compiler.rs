//! Compiles criteria expressions into SQL fragments.
//!
//! Every field reference is resolved through an [`AttributeRegistry`], its
//! arguments are escaped (and rewritten where the descriptor carries a
//! rewriter) and substituted into the descriptor template. The compiled
//! fragment then becomes the left-hand side of the comparison.
//!
//! ```
//! use mshop_criteria::{
//!     AttributeDescriptor, AttributeSource, CompareOp, CriteriaCompiler, Expr, FieldRef,
//!     RegistryBuilder, Search, SiteScope, ValueType,
//! };
//!
//! let registry = RegistryBuilder::new("product")
//!     .source(AttributeSource::new("base").with(AttributeDescriptor::new(
//!         "product.code",
//!         r#"mpro."code""#,
//!         ValueType::String,
//!     )))
//!     .build(&SiteScope::default())
//!     .unwrap();
//!
//! let search = Search::new().with_conditions(Expr::compare(
//!     CompareOp::Eq,
//!     FieldRef::plain("product.code"),
//!     "it's",
//! ));
//! let compiled = CriteriaCompiler::new(&registry).compile(&search).unwrap();
//! assert_eq!(compiled.conditions, r#"mpro."code" = 'it''s'"#);
//! ```

use serde::{Deserialize, Serialize};

use crate::attribute::AttributeDescriptor;
use crate::error::{CriteriaError, CriteriaResult};
use crate::expr::{CombineOp, CompareOp, Expr, FieldRef};
use crate::literal::{SqlLiteral, StringSyntax, escape_like};
use crate::registry::AttributeRegistry;
use crate::search::{Search, SortDirective};
use crate::value::Value;

/// Always-true condition.
pub const MATCH_ALL: &str = "1 = 1";

/// Always-false condition.
pub const MATCH_NONE: &str = "1 = 0";

/// What a full-text comparison compiles to when the search term has no
/// tokens left after sanitizing (e.g. `"*** :: ()"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmptyFullTextPolicy {
    /// Replace the comparison with `1 = 0`.
    #[default]
    MatchNone,
    /// Replace the comparison with `1 = 1`.
    MatchAll,
    /// Render the empty `''` term and let the database decide.
    Passthrough,
}

/// Compiler settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompilerOptions {
    /// Handling of empty full-text terms in conditions.
    pub empty_fulltext: EmptyFullTextPolicy,
    /// Form of string literals in the compiled SQL.
    pub string_syntax: StringSyntax,
}

/// Result of compiling a [`Search`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CompiledCriteria {
    /// Boolean SQL expression for the `WHERE` clause.
    pub conditions: String,
    /// `ORDER BY` terms, e.g. `mpro."code" ASC`.
    pub order_by: Vec<String>,
    /// Join clauses of all referenced fields, deduplicated in first-seen order.
    pub joins: Vec<String>,
}

impl CompiledCriteria {
    /// Returns the `ORDER BY ...` clause, or an empty string.
    pub fn order_clause(&self) -> String {
        if self.order_by.is_empty() {
            String::new()
        } else {
            format!("ORDER BY {}", self.order_by.join(", "))
        }
    }
}

/// A field reference compiled on its own.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CompiledField {
    /// SQL expression of the field.
    pub sql: String,
    /// Join clauses the field needs.
    pub joins: Vec<String>,
}

/// Criteria compiler bound to one registry.
#[derive(Debug, Clone, Copy)]
pub struct CriteriaCompiler<'a> {
    registry: &'a AttributeRegistry,
    options: CompilerOptions,
}

impl<'a> CriteriaCompiler<'a> {
    /// Creates a compiler with default options.
    pub fn new(registry: &'a AttributeRegistry) -> Self {
        Self {
            registry,
            options: CompilerOptions::default(),
        }
    }

    /// Replaces the options.
    pub fn with_options(mut self, options: CompilerOptions) -> Self {
        self.options = options;
        self
    }

    /// Compiles conditions and sort order of a search.
    ///
    /// # Errors
    ///
    /// Fails with [`CriteriaError::UnknownField`] for codes the registry does
    /// not know, [`CriteriaError::MissingParameter`] when a function is called
    /// with too few arguments and [`CriteriaError::InvalidOperator`] for
    /// operator/value combinations that have no SQL form.
    pub fn compile(&self, search: &Search) -> CriteriaResult<CompiledCriteria> {
        let mut joins = Vec::new();

        let syntax = self.options.string_syntax;

        let conditions = match &search.conditions {
            Some(expr) => syntax.apply(self.compile_expr(expr, &mut joins)?),
            None => MATCH_ALL.to_string(),
        };

        let order_by = search
            .sort
            .iter()
            .map(|directive| Ok(syntax.apply(self.compile_sort(directive, &mut joins)?)))
            .collect::<CriteriaResult<Vec<_>>>()?;

        tracing::debug!(
            registry = %self.registry.name(),
            conditions = %conditions,
            joins = joins.len(),
            "Compiled search criteria"
        );

        Ok(CompiledCriteria {
            conditions,
            order_by,
            joins,
        })
    }

    /// Compiles a single field reference, e.g. a `GROUP BY` key.
    pub fn compile_field(&self, field: &FieldRef) -> CriteriaResult<CompiledField> {
        let descriptor = self.registry.resolve(&field.lookup_code())?;
        let prepared = descriptor.prepare(call_args(descriptor, field));
        let sql = self
            .options
            .string_syntax
            .apply(descriptor.render_literals(&prepared.literals)?);

        let mut joins = Vec::new();
        add_joins(descriptor, &mut joins);

        Ok(CompiledField { sql, joins })
    }

    fn compile_expr(&self, expr: &Expr, joins: &mut Vec<String>) -> CriteriaResult<String> {
        match expr {
            Expr::Compare { op, field, value } => self.compile_compare(*op, field, value, joins),
            Expr::Combine { op, exprs } => {
                if exprs.is_empty() {
                    return Ok(match op {
                        CombineOp::And => MATCH_ALL,
                        CombineOp::Or => MATCH_NONE,
                    }
                    .to_string());
                }

                let parts = exprs
                    .iter()
                    .map(|e| self.compile_expr(e, joins))
                    .collect::<CriteriaResult<Vec<_>>>()?;
                let glue = match op {
                    CombineOp::And => " AND ",
                    CombineOp::Or => " OR ",
                };

                Ok(format!("( {} )", parts.join(glue)))
            }
            Expr::Not { not } => Ok(format!("NOT ( {} )", self.compile_expr(not, joins)?)),
        }
    }

    fn compile_compare(
        &self,
        op: CompareOp,
        field: &FieldRef,
        value: &Value,
        joins: &mut Vec<String>,
    ) -> CriteriaResult<String> {
        let code = field.lookup_code();
        let descriptor = self.registry.resolve(&code)?;
        let prepared = descriptor.prepare(call_args(descriptor, field));

        if descriptor.rewriter.is_some() && prepared.empty_term {
            match self.options.empty_fulltext {
                EmptyFullTextPolicy::MatchNone => return Ok(MATCH_NONE.to_string()),
                EmptyFullTextPolicy::MatchAll => return Ok(MATCH_ALL.to_string()),
                EmptyFullTextPolicy::Passthrough => {}
            }
        }

        let lhs = descriptor.render_literals(&prepared.literals)?;
        add_joins(descriptor, joins);

        let invalid = || CriteriaError::InvalidOperator {
            operator: op.as_str().to_string(),
            field: field.to_string(),
        };
        let internal = descriptor.internal_type;

        let sql = match (op, value) {
            (CompareOp::Eq, Value::Null) => format!("{} IS NULL", lhs),
            (CompareOp::Ne, Value::Null) => format!("{} IS NOT NULL", lhs),
            (CompareOp::Eq, Value::List(items)) if items.is_empty() => MATCH_NONE.to_string(),
            (CompareOp::Ne, Value::List(items)) if items.is_empty() => MATCH_ALL.to_string(),
            (CompareOp::Eq, list @ Value::List(_)) => {
                format!("{} IN ({})", lhs, list.to_literal_as(internal))
            }
            (CompareOp::Ne, list @ Value::List(_)) => {
                format!("{} NOT IN ({})", lhs, list.to_literal_as(internal))
            }
            (CompareOp::Eq, v) => format!("{} = {}", lhs, v.to_literal_as(internal)),
            (CompareOp::Ne, v) => format!("{} <> {}", lhs, v.to_literal_as(internal)),
            (CompareOp::Lt | CompareOp::Le | CompareOp::Gt | CompareOp::Ge, Value::Null)
            | (CompareOp::Lt | CompareOp::Le | CompareOp::Gt | CompareOp::Ge, Value::List(_)) => {
                return Err(invalid());
            }
            (CompareOp::Lt, v) => format!("{} < {}", lhs, v.to_literal_as(internal)),
            (CompareOp::Le, v) => format!("{} <= {}", lhs, v.to_literal_as(internal)),
            (CompareOp::Gt, v) => format!("{} > {}", lhs, v.to_literal_as(internal)),
            (CompareOp::Ge, v) => format!("{} >= {}", lhs, v.to_literal_as(internal)),
            (CompareOp::StartsWith | CompareOp::Contains, Value::Null) => return Err(invalid()),
            (CompareOp::StartsWith | CompareOp::Contains, v) => like(&lhs, op, v),
        };

        Ok(sql)
    }

    fn compile_sort(
        &self,
        directive: &SortDirective,
        joins: &mut Vec<String>,
    ) -> CriteriaResult<String> {
        let code = directive.field.sort_code();
        let descriptor = self.registry.resolve(&code)?;
        let prepared = descriptor.prepare(call_args(descriptor, &directive.field));
        let term = descriptor.render_literals(&prepared.literals)?;
        add_joins(descriptor, joins);

        Ok(format!("{} {}", term, directive.direction.as_sql()))
    }
}

/// Returns the arguments the descriptor accepts, ignoring surplus ones.
fn call_args<'v>(descriptor: &AttributeDescriptor, field: &'v FieldRef) -> &'v [Value] {
    let args = field.args();
    if args.len() > descriptor.arity {
        tracing::warn!(
            field = %descriptor.code,
            expected = descriptor.arity,
            supplied = args.len(),
            "Ignoring surplus function arguments"
        );
        &args[..descriptor.arity]
    } else {
        args
    }
}

fn add_joins(descriptor: &AttributeDescriptor, joins: &mut Vec<String>) {
    for join in &descriptor.joins {
        if !joins.contains(join) {
            joins.push(join.clone());
        }
    }
}

fn like(lhs: &str, op: CompareOp, value: &Value) -> String {
    let pattern = |v: &Value| {
        let text = escape_like(&v.as_text());
        let literal = match op {
            CompareOp::StartsWith => format!("'{}%'", text),
            _ => format!("'%{}%'", text),
        };
        format!("{} LIKE {}", lhs, SqlLiteral::trusted(literal))
    };

    match value {
        Value::List(items) if items.is_empty() => MATCH_NONE.to_string(),
        Value::List(items) => format!(
            "( {} )",
            items.iter().map(pattern).collect::<Vec<_>>().join(" OR ")
        ),
        v => pattern(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::ValueType;
    use crate::registry::{AttributeSource, RegistryBuilder};
    use crate::rewrite::ParameterRewriter;
    use crate::search::Slice;
    use crate::site::SiteScope;

    const JOIN: &str = r#"LEFT JOIN "mshop_index_text" AS mindte ON mindte."prodid" = mpro."id""#;

    fn registry() -> AttributeRegistry {
        registry_for(&SiteScope::path("1."))
    }

    fn registry_for(scope: &SiteScope) -> AttributeRegistry {
        let source = AttributeSource::new("test")
            .with(AttributeDescriptor::new("product.id", r#"mpro."id""#, ValueType::Integer))
            .with(AttributeDescriptor::new("product.code", r#"mpro."code""#, ValueType::String))
            .with(
                AttributeDescriptor::new(
                    "index.text.relevance()",
                    r#":site AND mindte."langid" = $1 AND MATCH( mindte."value" ) AGAINST( $2 IN BOOLEAN MODE )"#,
                    ValueType::Float,
                )
                .with_site_column(r#"mindte."siteid""#)
                .with_join(JOIN)
                .with_rewriter(ParameterRewriter::BooleanPrefix { position: 1 }),
            )
            .with(
                AttributeDescriptor::new(
                    "sort:index.text.relevance()",
                    r#"MATCH( mindte."value" ) AGAINST( $2 IN BOOLEAN MODE )"#,
                    ValueType::Float,
                )
                .with_join(JOIN)
                .with_rewriter(ParameterRewriter::BooleanPrefix { position: 1 }),
            );

        RegistryBuilder::new("test").source(source).build(scope).unwrap()
    }

    fn relevance(term: &str) -> FieldRef {
        FieldRef::function("index.text:relevance", vec![Value::from("de"), Value::from(term)])
    }

    fn compile(expr: Expr) -> CriteriaResult<CompiledCriteria> {
        let registry = registry();
        CriteriaCompiler::new(&registry).compile(&Search::new().with_conditions(expr))
    }

    #[test]
    fn test_no_conditions_matches_all() {
        let registry = registry();
        let compiled = CriteriaCompiler::new(&registry).compile(&Search::new()).unwrap();
        assert_eq!(compiled.conditions, MATCH_ALL);
        assert!(compiled.joins.is_empty());
        assert_eq!(compiled.order_clause(), "");
    }

    #[test]
    fn test_casts_to_internal_type() {
        let compiled =
            compile(Expr::compare(CompareOp::Eq, FieldRef::plain("product.id"), "12")).unwrap();
        assert_eq!(compiled.conditions, r#"mpro."id" = 12"#);
    }

    #[test]
    fn test_null_and_list_values() {
        let sql = |op, value: Value| {
            compile(Expr::compare(op, FieldRef::plain("product.code"), value))
                .unwrap()
                .conditions
        };
        assert_eq!(sql(CompareOp::Eq, Value::Null), r#"mpro."code" IS NULL"#);
        assert_eq!(sql(CompareOp::Ne, Value::Null), r#"mpro."code" IS NOT NULL"#);
        assert_eq!(
            sql(CompareOp::Eq, Value::from(vec!["a", "b"])),
            r#"mpro."code" IN ('a','b')"#
        );
        assert_eq!(
            sql(CompareOp::Ne, Value::from(vec!["a"])),
            r#"mpro."code" NOT IN ('a')"#
        );
        assert_eq!(sql(CompareOp::Eq, Value::List(vec![])), MATCH_NONE);
        assert_eq!(sql(CompareOp::Ne, Value::List(vec![])), MATCH_ALL);
        assert_eq!(sql(CompareOp::Ne, Value::from("a")), r#"mpro."code" <> 'a'"#);
    }

    #[test]
    fn test_like_operators() {
        let sql = |op, value: Value| {
            compile(Expr::compare(op, FieldRef::plain("product.code"), value))
                .unwrap()
                .conditions
        };
        assert_eq!(sql(CompareOp::StartsWith, Value::from("ab")), r#"mpro."code" LIKE 'ab%'"#);
        assert_eq!(sql(CompareOp::Contains, Value::from("ab")), r#"mpro."code" LIKE '%ab%'"#);
        assert_eq!(
            sql(CompareOp::StartsWith, Value::from(vec!["a", "b"])),
            r#"( mpro."code" LIKE 'a%' OR mpro."code" LIKE 'b%' )"#
        );
    }

    #[test]
    fn test_invalid_operator() {
        let err = compile(Expr::compare(CompareOp::Gt, FieldRef::plain("product.id"), Value::Null))
            .unwrap_err();
        assert!(matches!(err, CriteriaError::InvalidOperator { .. }));
    }

    #[test]
    fn test_fulltext_condition_and_joins() {
        let compiled = compile(Expr::and(vec![
            Expr::compare(CompareOp::Gt, relevance("red shoes"), 0),
            Expr::compare(CompareOp::Gt, relevance("blue"), 0),
        ]))
        .unwrap();

        assert_eq!(
            compiled.conditions,
            r#"( mindte."siteid" LIKE '1.%' AND mindte."langid" = 'de' AND MATCH( mindte."value" ) AGAINST( ' +red* +shoes*' IN BOOLEAN MODE ) > 0 AND mindte."siteid" LIKE '1.%' AND mindte."langid" = 'de' AND MATCH( mindte."value" ) AGAINST( ' +blue*' IN BOOLEAN MODE ) > 0 )"#
        );
        assert_eq!(compiled.joins, vec![JOIN.to_string()]);
    }

    #[test]
    fn test_site_values_are_not_substituted() {
        let registry = registry_for(&SiteScope::ids(["$1", "$2"]));
        let compiled = CriteriaCompiler::new(&registry)
            .compile(&Search::new().with_conditions(Expr::compare(
                CompareOp::Gt,
                relevance("red"),
                0,
            )))
            .unwrap();

        assert_eq!(
            compiled.conditions,
            r#"mindte."siteid" IN ('$1','$2') AND mindte."langid" = 'de' AND MATCH( mindte."value" ) AGAINST( ' +red*' IN BOOLEAN MODE ) > 0"#
        );
    }

    #[test]
    fn test_backslash_values_per_string_syntax() {
        let registry = registry();
        let search = Search::new().with_conditions(Expr::compare(
            CompareOp::Eq,
            FieldRef::plain("product.code"),
            "a\\b",
        ));
        let with = |syntax| {
            CriteriaCompiler::new(&registry)
                .with_options(CompilerOptions {
                    string_syntax: syntax,
                    ..Default::default()
                })
                .compile(&search)
                .unwrap()
                .conditions
        };

        assert_eq!(with(StringSyntax::Backslash), r#"mpro."code" = 'a\\b'"#);
        assert_eq!(with(StringSyntax::EscapePrefix), r#"mpro."code" = E'a\\b'"#);
    }

    #[test]
    fn test_empty_fulltext_policies() {
        let registry = registry();
        let search =
            Search::new().with_conditions(Expr::compare(CompareOp::Gt, relevance("*** :: ()"), 0));

        let with = |policy| {
            CriteriaCompiler::new(&registry)
                .with_options(CompilerOptions {
                    empty_fulltext: policy,
                    ..Default::default()
                })
                .compile(&search)
                .unwrap()
        };

        assert_eq!(with(EmptyFullTextPolicy::MatchNone).conditions, MATCH_NONE);
        assert_eq!(with(EmptyFullTextPolicy::MatchAll).conditions, MATCH_ALL);

        let passthrough = with(EmptyFullTextPolicy::Passthrough);
        assert!(passthrough.conditions.contains("AGAINST( '' IN BOOLEAN MODE ) > 0"));
        assert_eq!(passthrough.joins.len(), 1);
    }

    #[test]
    fn test_combine_and_not() {
        assert_eq!(compile(Expr::and(vec![])).unwrap().conditions, MATCH_ALL);
        assert_eq!(compile(Expr::or(vec![])).unwrap().conditions, MATCH_NONE);

        let compiled = compile(Expr::negate(Expr::or(vec![
            Expr::compare(CompareOp::Eq, FieldRef::plain("product.id"), 1),
            Expr::compare(CompareOp::Eq, FieldRef::plain("product.id"), 2),
        ])))
        .unwrap();
        assert_eq!(
            compiled.conditions,
            r#"NOT ( ( mpro."id" = 1 OR mpro."id" = 2 ) )"#
        );
    }

    #[test]
    fn test_sort_resolves_sort_variant() {
        let registry = registry();
        let search = Search {
            conditions: None,
            sort: vec![
                SortDirective::desc(relevance("red")),
                SortDirective::asc(FieldRef::plain("product.code")),
            ],
            slice: Slice::default(),
        };
        let compiled = CriteriaCompiler::new(&registry).compile(&search).unwrap();

        assert_eq!(
            compiled.order_by,
            vec![
                r#"MATCH( mindte."value" ) AGAINST( ' +red*' IN BOOLEAN MODE ) DESC"#.to_string(),
                r#"mpro."code" ASC"#.to_string(),
            ]
        );
        assert_eq!(compiled.joins.len(), 1);
    }

    #[test]
    fn test_unknown_field_and_missing_argument() {
        let err = compile(Expr::compare(CompareOp::Eq, FieldRef::plain("product.nope"), 1))
            .unwrap_err();
        assert_eq!(
            err,
            CriteriaError::UnknownField {
                code: "product.nope".to_string()
            }
        );

        let short = FieldRef::function("index.text:relevance", vec![Value::from("de")]);
        let err = compile(Expr::compare(CompareOp::Gt, short, 0)).unwrap_err();
        assert!(matches!(err, CriteriaError::MissingParameter { position: 2, .. }));
    }

    #[test]
    fn test_compile_field() {
        let registry = registry();
        let field = CriteriaCompiler::new(&registry)
            .compile_field(&relevance("red"))
            .unwrap();
        assert!(field.sql.ends_with("AGAINST( ' +red*' IN BOOLEAN MODE )"));
        assert_eq!(field.joins, vec![JOIN.to_string()]);
    }

    #[test]
    fn test_surplus_arguments_are_ignored() {
        let field = FieldRef::function(
            "index.text:relevance",
            vec![Value::from("de"), Value::from("red"), Value::from("extra")],
        );
        let compiled = compile(Expr::compare(CompareOp::Gt, field, 0)).unwrap();
        assert!(compiled.conditions.contains("' +red*'"));
    }
}
