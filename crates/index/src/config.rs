//! Index manager configuration.
//!
//! Configuration is read from a JSON document; every field is optional.
//!
//! ```json
//! {
//!     "dialect": "mysql",
//!     "empty_fulltext": "match_none",
//!     "default_slice_size": 100,
//!     "max_slice_size": 10000,
//!     "submanagers": ["attribute", "catalog", "price", "supplier", "text"]
//! }
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use mshop_criteria::{CompilerOptions, EmptyFullTextPolicy, StringSyntax};
use serde::{Deserialize, Serialize};

use crate::error::{IndexError, IndexResult};
use crate::manager::SUB_MANAGERS;

/// SQL dialect of the text sub-manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Portable `LIKE` based text search.
    #[default]
    Standard,
    /// MySQL/MariaDB `MATCH ... AGAINST` boolean mode.
    Mysql,
    /// PostgreSQL `tsvector`/`tsquery`.
    Postgresql,
}

impl Dialect {
    /// Lower-case name as used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Standard => "standard",
            Dialect::Mysql => "mysql",
            Dialect::Postgresql => "postgresql",
        }
    }

    /// How string literals are written for this dialect.
    pub fn string_syntax(&self) -> StringSyntax {
        match self {
            Dialect::Postgresql => StringSyntax::EscapePrefix,
            Dialect::Standard | Dialect::Mysql => StringSyntax::Backslash,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(Dialect::Standard),
            "mysql" | "mariadb" => Ok(Dialect::Mysql),
            "postgresql" | "postgres" | "pgsql" => Ok(Dialect::Postgresql),
            other => Err(IndexError::InvalidConfig {
                message: format!("unknown dialect '{}'", other),
            }),
        }
    }
}

/// Configuration of an [`IndexManager`](crate::IndexManager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Dialect of the text sub-manager.
    #[serde(default)]
    pub dialect: Dialect,

    /// Handling of search terms without tokens.
    #[serde(default)]
    pub empty_fulltext: EmptyFullTextPolicy,

    /// Page size of newly created searches.
    #[serde(default = "default_slice_size")]
    pub default_slice_size: usize,

    /// Upper bound for the page size of a statement.
    #[serde(default = "default_max_slice_size")]
    pub max_slice_size: usize,

    /// Enabled sub-managers.
    #[serde(default = "default_submanagers")]
    pub submanagers: Vec<String>,
}

fn default_slice_size() -> usize {
    100
}

fn default_max_slice_size() -> usize {
    10000
}

fn default_submanagers() -> Vec<String> {
    SUB_MANAGERS.iter().map(|s| s.to_string()).collect()
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            empty_fulltext: EmptyFullTextPolicy::default(),
            default_slice_size: default_slice_size(),
            max_slice_size: default_max_slice_size(),
            submanagers: default_submanagers(),
        }
    }
}

impl IndexConfig {
    /// Reads a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> IndexResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| IndexError::InvalidConfig {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;

        serde_json::from_str(&content).map_err(|e| IndexError::InvalidConfig {
            message: format!("cannot parse {}: {}", path.display(), e),
        })
    }

    /// Creates a configuration for the given dialect.
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Default::default()
        }
    }

    /// Compiler options derived from this configuration.
    pub fn compiler_options(&self) -> CompilerOptions {
        CompilerOptions {
            empty_fulltext: self.empty_fulltext,
            string_syntax: self.dialect.string_syntax(),
        }
    }

    /// Validates the configuration and returns all problems found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.default_slice_size == 0 {
            errors.push("Default slice size cannot be 0".to_string());
        }

        if self.max_slice_size == 0 {
            errors.push("Max slice size cannot be 0".to_string());
        }

        if self.default_slice_size > self.max_slice_size {
            errors.push("Default slice size cannot exceed max slice size".to_string());
        }

        for name in &self.submanagers {
            if !SUB_MANAGERS.contains(&name.as_str()) {
                errors.push(format!("Unknown sub-manager '{}'", name));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IndexConfig::default();
        assert_eq!(config.dialect, Dialect::Standard);
        assert_eq!(config.empty_fulltext, EmptyFullTextPolicy::MatchNone);
        assert_eq!(config.default_slice_size, 100);
        assert_eq!(config.submanagers.len(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: IndexConfig =
            serde_json::from_str(r#"{"dialect": "mysql", "empty_fulltext": "match_all"}"#)
                .unwrap();
        assert_eq!(config.dialect, Dialect::Mysql);
        assert_eq!(config.empty_fulltext, EmptyFullTextPolicy::MatchAll);
        assert_eq!(config.max_slice_size, 10000);
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let config = IndexConfig {
            default_slice_size: 200,
            max_slice_size: 100,
            submanagers: vec!["text".to_string(), "stock".to_string()],
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.contains("stock")));
    }

    #[test]
    fn test_dialect_from_str() {
        assert_eq!("MySQL".parse::<Dialect>().unwrap(), Dialect::Mysql);
        assert_eq!("pgsql".parse::<Dialect>().unwrap(), Dialect::Postgresql);
        assert!("oracle".parse::<Dialect>().is_err());
        assert_eq!(Dialect::Postgresql.to_string(), "postgresql");
    }

    #[test]
    fn test_load_missing_file() {
        let err = IndexConfig::load("/nonexistent/index.json").unwrap_err();
        assert!(matches!(err, IndexError::InvalidConfig { .. }));
    }
}
