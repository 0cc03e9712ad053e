//! Per-field parameter rewriting.
//!
//! A descriptor may carry one [`ParameterRewriter`]. Before substitution the
//! rewriter replaces the literal at the single position it owns with a value
//! derived from the caller's raw argument. All other positions are left as
//! the default escaping produced them.

use serde::{Deserialize, Serialize};

use crate::fulltext;
use crate::literal::SqlLiteral;
use crate::value::Value;

/// Rewriting rule attached to a search attribute.
///
/// `position` is the zero-based argument index, so a rewriter with
/// `position: 2` owns the `$3` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParameterRewriter {
    /// Boolean-mode full-text query: `' +red* +shoes*'`.
    BooleanPrefix { position: usize },
    /// PostgreSQL `tsquery`: `'red:* & shoes:*'`.
    TsQueryPrefix { position: usize },
    /// Substring `LIKE` pattern: `'%red shoes%'`.
    LikeContains { position: usize },
}

/// Parameters after rewriting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    /// Literals ready for substitution, in argument order.
    pub literals: Vec<SqlLiteral>,
    /// `true` when the owned argument was present but produced no search tokens.
    pub empty_term: bool,
}

impl ParameterRewriter {
    /// Returns the zero-based argument index this rewriter owns.
    pub fn position(&self) -> usize {
        match self {
            ParameterRewriter::BooleanPrefix { position }
            | ParameterRewriter::TsQueryPrefix { position }
            | ParameterRewriter::LikeContains { position } => *position,
        }
    }

    /// Short name used in attribute listings.
    pub fn name(&self) -> &'static str {
        match self {
            ParameterRewriter::BooleanPrefix { .. } => "boolean_prefix",
            ParameterRewriter::TsQueryPrefix { .. } => "tsquery_prefix",
            ParameterRewriter::LikeContains { .. } => "like_contains",
        }
    }

    /// Rewrites the literal at the owned position.
    ///
    /// `raw` are the caller's arguments, `literals` their default escaping.
    /// A missing owned argument leaves everything untouched; substitution
    /// reports it later if the template references it.
    pub fn rewrite(&self, raw: &[Value], mut literals: Vec<SqlLiteral>) -> Rewritten {
        let pos = self.position();

        let Some(arg) = raw.get(pos) else {
            return Rewritten {
                literals,
                empty_term: false,
            };
        };

        let text = arg.as_text();
        let rewritten = match self {
            ParameterRewriter::BooleanPrefix { .. } => fulltext::sanitize(&text),
            ParameterRewriter::TsQueryPrefix { .. } => fulltext::tsquery_prefix(&text),
            ParameterRewriter::LikeContains { .. } => fulltext::like_contains(&text),
        };

        if let Some(slot) = literals.get_mut(pos) {
            *slot = rewritten;
        }

        Rewritten {
            literals,
            empty_term: fulltext::is_blank(&text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults(raw: &[Value]) -> Vec<SqlLiteral> {
        raw.iter().map(Value::to_literal).collect()
    }

    #[test]
    fn test_rewrites_only_owned_position() {
        let raw = vec![
            Value::from("default"),
            Value::from("de"),
            Value::from("red shoes"),
        ];
        let rewriter = ParameterRewriter::BooleanPrefix { position: 2 };
        let out = rewriter.rewrite(&raw, defaults(&raw));

        assert_eq!(out.literals[0].as_str(), "'default'");
        assert_eq!(out.literals[1].as_str(), "'de'");
        assert_eq!(out.literals[2].as_str(), "' +red* +shoes*'");
        assert!(!out.empty_term);
    }

    #[test]
    fn test_position_one() {
        let raw = vec![Value::from("de"), Value::from("it's")];
        let rewriter = ParameterRewriter::BooleanPrefix { position: 1 };
        let out = rewriter.rewrite(&raw, defaults(&raw));
        assert_eq!(out.literals[0].as_str(), "'de'");
        assert_eq!(out.literals[1].as_str(), "' +it* +s*'");
    }

    #[test]
    fn test_missing_owned_argument_is_untouched() {
        let raw = vec![Value::from("de")];
        let rewriter = ParameterRewriter::BooleanPrefix { position: 1 };
        let out = rewriter.rewrite(&raw, defaults(&raw));
        assert_eq!(out.literals, vec![SqlLiteral::quoted("de")]);
        assert!(!out.empty_term);
    }

    #[test]
    fn test_empty_term_is_flagged() {
        let raw = vec![Value::from("()")];
        let out = ParameterRewriter::TsQueryPrefix { position: 0 }.rewrite(&raw, defaults(&raw));
        assert_eq!(out.literals[0].as_str(), "''");
        assert!(out.empty_term);
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(ParameterRewriter::LikeContains { position: 1 }).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "like_contains", "position": 1}));
    }
}
