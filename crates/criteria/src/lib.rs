//! MShop criteria compilation
//!
//! This crate turns abstract, database-agnostic search expressions over named
//! virtual fields into dialect-specific SQL fragments. It is the core the
//! index managers build on.
//!
//! # Architecture
//!
//! - [`attribute`] - Descriptors of searchable fields (template, types, joins, rewriter)
//! - [`registry`] - Registries folded from prioritized descriptor sources, with sub-registries
//! - [`template`] - `$1..$n` placeholder substitution and `:site` binding
//! - [`site`] - Tenant predicates
//! - [`fulltext`] - Full-text search term sanitizing
//! - [`rewrite`] - Per-field parameter rewriters
//! - [`literal`] - Pre-escaped SQL literals
//! - [`expr`] / [`search`] - Criteria expression tree and search documents
//! - [`compiler`] - Compiles searches against a registry
//!
//! # Quick Start
//!
//! ```
//! use mshop_criteria::{
//!     AttributeDescriptor, AttributeSource, CompareOp, CriteriaCompiler, Expr, FieldRef,
//!     ParameterRewriter, RegistryBuilder, Search, SiteScope, Value, ValueType,
//! };
//!
//! let text = AttributeSource::new("mysql").with(
//!     AttributeDescriptor::new(
//!         "index.text.relevance()",
//!         r#":site AND mindte."langid" = $1 AND MATCH( mindte."value" ) AGAINST( $2 IN BOOLEAN MODE )"#,
//!         ValueType::Float,
//!     )
//!     .with_site_column(r#"mindte."siteid""#)
//!     .with_rewriter(ParameterRewriter::BooleanPrefix { position: 1 }),
//! );
//!
//! let registry = RegistryBuilder::new("index/text")
//!     .source(text)
//!     .build(&SiteScope::path("1.2."))
//!     .unwrap();
//!
//! let field = FieldRef::parse(r#"index.text:relevance("de", "red shoes")"#).unwrap();
//! let search = Search::new().with_conditions(Expr::compare(CompareOp::Gt, field, 0));
//! let compiled = CriteriaCompiler::new(&registry).compile(&search).unwrap();
//!
//! assert_eq!(
//!     compiled.conditions,
//!     r#"mindte."siteid" LIKE '1.2.%' AND mindte."langid" = 'de' AND MATCH( mindte."value" ) AGAINST( ' +red* +shoes*' IN BOOLEAN MODE ) > 0"#
//! );
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod attribute;
pub mod compiler;
pub mod error;
pub mod expr;
pub mod fulltext;
pub mod literal;
pub mod registry;
pub mod rewrite;
pub mod search;
pub mod site;
pub mod template;
pub mod value;

pub use attribute::{AttributeDescriptor, InternalType, ValueType};
pub use compiler::{
    CompiledCriteria, CompiledField, CompilerOptions, CriteriaCompiler, EmptyFullTextPolicy, MATCH_ALL,
    MATCH_NONE,
};
pub use error::{CriteriaError, CriteriaResult};
pub use expr::{CombineOp, CompareOp, Expr, FieldRef};
pub use literal::{SqlLiteral, StringSyntax};
pub use registry::{AttributeRegistry, AttributeSource, RegistryBuilder};
pub use rewrite::{ParameterRewriter, Rewritten};
pub use search::{Search, Slice, SortDirection, SortDirective};
pub use site::SiteScope;
pub use value::Value;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
