//! MShop product index managers
//!
//! The index is a set of denormalized tables (`mshop_index_text`,
//! `mshop_index_catalog`, ...) joined to the product table for fast
//! storefront searches. This crate declares the search attributes of every
//! index table, selects the text search dialect and assembles complete SQL
//! statements from criteria.
//!
//! # Architecture
//!
//! - [`manager`] - [`IndexManager`], its [`SubManager`]s and the [`SearchManager`] trait
//! - [`text`] - Text attributes with `Standard`, `MySQL` and `PostgreSQL` dialects
//! - [`catalog`], [`price`], [`attribute`], [`supplier`] - Other index tables
//! - [`product`] - Product base attributes
//! - [`statement`] - Statement assembly
//! - [`config`] / [`context`] - Configuration and request locale
//!
//! # Example
//!
//! ```
//! use mshop_criteria::{CompareOp, Expr, SortDirective};
//! use mshop_index::{Context, Dialect, IndexConfig, IndexManager, Locale};
//!
//! let locale = Locale::new("1.2.").with_language("de");
//! let manager = IndexManager::new(Context::new(locale, IndexConfig::for_dialect(Dialect::Mysql)))
//!     .unwrap();
//!
//! let relevance = manager.text_relevance(&["default"], "red shoes").unwrap();
//! let search = manager
//!     .create_search()
//!     .with_conditions(Expr::compare(CompareOp::Gt, relevance.clone(), 0))
//!     .with_sort(SortDirective::desc(relevance));
//!
//! let sql = manager.search_statement(&search).unwrap();
//! assert!(sql.contains("AGAINST( ' +red* +shoes*' IN BOOLEAN MODE ) > 0"));
//! assert!(sql.contains("ORDER BY MATCH"));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod attribute;
pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod manager;
pub mod price;
pub mod product;
pub mod statement;
pub mod supplier;
pub mod text;

pub use config::{Dialect, IndexConfig};
pub use context::{Context, Locale};
pub use error::{IndexError, IndexResult};
pub use manager::{IndexManager, SUB_MANAGERS, SearchManager, SubManager};
