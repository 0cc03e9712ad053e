//! Pre-escaped SQL literals.
//!
//! Templates are filled by textual substitution, not by bind parameters. The
//! [`SqlLiteral`] type marks text that has already been quoted and escaped so
//! it can be spliced into a template verbatim. Nothing downstream escapes a
//! `SqlLiteral` again, and nothing upstream may build one from raw user input
//! without going through one of the escaping constructors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// SQL text that is safe to interpolate into a template as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SqlLiteral(String);

impl SqlLiteral {
    /// Wraps SQL text the caller has already escaped.
    ///
    /// Only use this for text produced by this crate or for constant SQL.
    pub fn trusted(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }

    /// Quotes a string as a single-quoted SQL literal.
    ///
    /// ```
    /// use mshop_criteria::SqlLiteral;
    ///
    /// assert_eq!(SqlLiteral::quoted("O'Brien").as_str(), "'O''Brien'");
    /// ```
    pub fn quoted(value: &str) -> Self {
        Self(format!("'{}'", escape_str(value)))
    }

    /// An integer literal.
    pub fn integer(value: i64) -> Self {
        Self(value.to_string())
    }

    /// A float literal. Non-finite values collapse to `0`.
    pub fn float(value: f64) -> Self {
        if value.is_finite() {
            Self(value.to_string())
        } else {
            Self("0".to_string())
        }
    }

    /// A boolean as `1`/`0`.
    pub fn boolean(value: bool) -> Self {
        Self(if value { "1" } else { "0" }.to_string())
    }

    /// The `NULL` keyword.
    pub fn null() -> Self {
        Self("NULL".to_string())
    }

    /// Joins literals with commas, for use inside `IN ( ... )`.
    ///
    /// An empty list yields `NULL`, so `IN (NULL)` stays valid and matches nothing.
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator<Item = SqlLiteral>,
    {
        let joined = items
            .into_iter()
            .map(|l| l.0)
            .collect::<Vec<_>>()
            .join(",");

        if joined.is_empty() {
            Self::null()
        } else {
            Self(joined)
        }
    }

    /// Returns the literal text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the empty quoted string `''`.
    pub fn is_empty_string(&self) -> bool {
        self.0 == "''"
    }

    /// Consumes the literal and returns its text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SqlLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How the target database reads backslashes inside string literals.
///
/// [`escape_str`] always doubles backslashes. Databases that keep backslashes
/// literal in `'...'` need those literals in a form that unescapes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StringSyntax {
    /// Backslash is an escape character in `'...'` (MySQL).
    #[default]
    Backslash,
    /// Literals containing a backslash are written as `E'...'` (PostgreSQL).
    EscapePrefix,
}

impl StringSyntax {
    /// Rewrites the string literals of a SQL fragment for this syntax.
    ///
    /// Double-quoted identifiers are skipped and literals that already carry
    /// an `E` prefix are left alone.
    ///
    /// ```
    /// use mshop_criteria::StringSyntax;
    ///
    /// let sql = r#"t."code" = 'a\\b' AND t."lang" = 'de'"#.to_string();
    /// assert_eq!(
    ///     StringSyntax::EscapePrefix.apply(sql),
    ///     r#"t."code" = E'a\\b' AND t."lang" = 'de'"#
    /// );
    /// ```
    pub fn apply(self, sql: String) -> String {
        if self == StringSyntax::Backslash || !sql.contains('\\') {
            return sql;
        }

        let mut out = String::with_capacity(sql.len() + 4);
        let mut prev = None;
        let mut chars = sql.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '"' => {
                    out.push(c);
                    for inner in chars.by_ref() {
                        out.push(inner);
                        if inner == '"' {
                            break;
                        }
                    }
                }
                '\'' => {
                    let mut body = String::from("'");
                    while let Some(inner) = chars.next() {
                        body.push(inner);
                        if inner == '\'' {
                            if chars.peek() == Some(&'\'') {
                                chars.next();
                                body.push('\'');
                            } else {
                                break;
                            }
                        }
                    }
                    if body.contains('\\') && !matches!(prev, Some('E' | 'e')) {
                        out.push('E');
                    }
                    out.push_str(&body);
                }
                _ => out.push(c),
            }
            prev = Some(c);
        }

        out
    }
}

/// Escapes the body of a single-quoted string literal.
///
/// Doubles quotes and backslashes. Databases with standard-conforming strings
/// read the result correctly once [`StringSyntax::EscapePrefix`] is applied.
pub fn escape_str(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            '\0' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Escapes the body of a `LIKE` pattern, keeping `%` and `_` literal.
pub fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        match c {
            '%' => out.push_str("\\%"),
            '_' => out.push_str("\\_"),
            _ => out.push(c),
        }
    }
    escape_str(&out)
}
