//! Site (tenant) scoping.
//!
//! A site scope is resolved once from the caller's locale and turned into a
//! SQL predicate per tenant column. The predicate is burned into templates at
//! registry construction; it never changes for the lifetime of a registry.

use serde::{Deserialize, Serialize};

use crate::literal::{SqlLiteral, escape_like};

/// The set of sites a registry may see.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SiteScope {
    /// Hierarchical site path, e.g. `1.2.`; matches the path and all sub-sites.
    Path(String),
    /// Explicit list of site ids.
    Ids(Vec<String>),
}

impl SiteScope {
    /// Creates a path scope.
    pub fn path(path: impl Into<String>) -> Self {
        SiteScope::Path(path.into())
    }

    /// Creates an id-list scope.
    pub fn ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SiteScope::Ids(ids.into_iter().map(Into::into).collect())
    }

    /// Builds the tenant predicate for a column.
    ///
    /// ```
    /// use mshop_criteria::SiteScope;
    ///
    /// let scope = SiteScope::path("1.2.");
    /// assert_eq!(scope.predicate("t.siteid"), "t.siteid LIKE '1.2.%'");
    ///
    /// let scope = SiteScope::ids(["1", "2"]);
    /// assert_eq!(scope.predicate("t.siteid"), "t.siteid IN ('1','2')");
    /// ```
    pub fn predicate(&self, column: &str) -> String {
        match self {
            SiteScope::Path(path) => format!("{} LIKE '{}%'", column, escape_like(path)),
            SiteScope::Ids(ids) if ids.is_empty() => "1 = 0".to_string(),
            SiteScope::Ids(ids) => format!(
                "{} IN ({})",
                column,
                SqlLiteral::list(ids.iter().map(|id| SqlLiteral::quoted(id)))
            ),
        }
    }
}

impl Default for SiteScope {
    fn default() -> Self {
        SiteScope::Path(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_predicate() {
        assert_eq!(
            SiteScope::path("1.2.").predicate(r#"mindte."siteid""#),
            r#"mindte."siteid" LIKE '1.2.%'"#
        );
    }

    #[test]
    fn test_path_is_escaped() {
        assert_eq!(
            SiteScope::path("a'b_").predicate("c"),
            "c LIKE 'a''b\\\\_%'"
        );
    }

    #[test]
    fn test_empty_id_list_sees_nothing() {
        assert_eq!(SiteScope::Ids(vec![]).predicate("c"), "1 = 0");
    }

    #[test]
    fn test_serde() {
        let scope: SiteScope =
            serde_json::from_str(r#"{"kind": "path", "value": "1.2."}"#).unwrap();
        assert_eq!(scope, SiteScope::path("1.2."));
    }
}
