//! Full-text query sanitizing.
//!
//! User search text is untrusted. Before it reaches a full-text predicate it
//! is stripped of every character the boolean-mode grammars (and SQL string
//! literals) treat specially, split into tokens and rebuilt in a fixed shape.
//! Sanitizing never fails: input with no usable tokens yields the empty
//! literal `''`.

use crate::literal::{SqlLiteral, escape_like};

/// Characters that are replaced by a space before tokenizing.
pub const RESERVED_CHARS: [char; 30] = [
    '-', '+', '>', '<', '(', ')', '~', '*', ':', '"', '&', '|', '!', '/', '§', '$', '%', '{', '}',
    '[', ']', '=', '?', '\\', '\'', '#', ';', '.', ',', '@',
];

/// Replaces every reserved character with a single space.
pub fn neutralize(raw: &str) -> String {
    raw.chars()
        .map(|c| if RESERVED_CHARS.contains(&c) { ' ' } else { c })
        .collect()
}

/// Splits neutralized text on single spaces and drops empty tokens.
///
/// Only the space character separates tokens; other whitespace stays part of
/// the token it appears in.
pub fn tokens(raw: &str) -> Vec<String> {
    neutralize(raw)
        .split(' ')
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Builds the unquoted boolean-mode body: one ` +token*` per token.
///
/// ```
/// use mshop_criteria::fulltext::boolean_prefix_query;
///
/// assert_eq!(boolean_prefix_query("red shoes"), " +red* +shoes*");
/// ```
pub fn boolean_prefix_query(raw: &str) -> String {
    tokens(raw)
        .iter()
        .map(|token| format!(" +{}*", token))
        .collect()
}

/// Sanitizes a raw search term into a quoted boolean-mode query literal.
///
/// Every token becomes mandatory (`+`) and prefix-matched (`*`).
///
/// ```
/// use mshop_criteria::fulltext::sanitize;
///
/// assert_eq!(
///     sanitize("red shoes, size: 42!").as_str(),
///     "' +red* +shoes* +size* +42*'"
/// );
/// assert_eq!(sanitize("*** :: ()").as_str(), "''");
/// ```
pub fn sanitize(raw: &str) -> SqlLiteral {
    SqlLiteral::trusted(format!("'{}'", boolean_prefix_query(raw)))
}

/// Sanitizes a raw search term into a quoted `tsquery` literal.
///
/// Tokens are prefix-matched (`:*`) and combined with `&`.
pub fn tsquery_prefix(raw: &str) -> SqlLiteral {
    let body = tokens(raw)
        .iter()
        .map(|token| format!("{}:*", token))
        .collect::<Vec<_>>()
        .join(" & ");
    SqlLiteral::trusted(format!("'{}'", body))
}

/// Builds a quoted `LIKE` pattern matching the neutralized term anywhere.
///
/// Yields `''` when no tokens survive.
pub fn like_contains(raw: &str) -> SqlLiteral {
    let joined = tokens(raw).join(" ");
    if joined.is_empty() {
        return SqlLiteral::trusted("''");
    }
    SqlLiteral::trusted(format!("'%{}%'", escape_like(&joined)))
}

/// Returns `true` when the raw term yields no tokens.
pub fn is_blank(raw: &str) -> bool {
    tokens(raw).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_only_input_yields_empty_literal() {
        for raw in ["*** :: ()", "", "   ", "'\"\\", "-+><()~*:\"&|!/§$%{}[]=?\\'#;.,@"] {
            assert_eq!(sanitize(raw).as_str(), "''", "input: {raw:?}");
        }
    }

    #[test]
    fn test_tokens_keep_order() {
        assert_eq!(
            sanitize("alpha beta gamma").as_str(),
            "' +alpha* +beta* +gamma*'"
        );
    }

    #[test]
    fn test_sanitize_mixed_punctuation() {
        assert_eq!(
            sanitize("red shoes, size: 42!").as_str(),
            "' +red* +shoes* +size* +42*'"
        );
    }

    #[test]
    fn test_unicode_passes_through() {
        assert_eq!(sanitize("Größe café").as_str(), "' +Größe* +café*'");
        assert_eq!(sanitize("日本語").as_str(), "' +日本語*'");
    }

    #[test]
    fn test_injection_attempt_is_neutralized() {
        let literal = sanitize("x') OR 1=1; DROP TABLE mshop_product; --");
        assert_eq!(
            literal.as_str(),
            "' +x* +OR* +1* +1* +DROP* +TABLE* +mshop_product*'"
        );
        // only the enclosing quotes remain
        assert_eq!(literal.as_str().matches('\'').count(), 2);
    }

    #[test]
    fn test_only_space_splits() {
        // tabs are not separators
        assert_eq!(tokens("a\tb c"), vec!["a\tb".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_sanitized_output_quotes_are_stripped_on_reuse() {
        // feeding a sanitized literal back in strips its operators again
        let once = sanitize("red shoes");
        assert_eq!(sanitize(once.as_str()), once);
    }

    #[test]
    fn test_tsquery_prefix() {
        assert_eq!(tsquery_prefix("red shoes").as_str(), "'red:* & shoes:*'");
        assert_eq!(tsquery_prefix("!!").as_str(), "''");
    }

    #[test]
    fn test_like_contains() {
        assert_eq!(like_contains("red  shoes").as_str(), "'%red shoes%'");
        assert_eq!(like_contains("100%").as_str(), "'%100%'");
        assert_eq!(like_contains("under_score").as_str(), "'%under\\\\_score%'");
        assert_eq!(like_contains("()").as_str(), "''");
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(":: --"));
        assert!(!is_blank("a"));
    }
}
