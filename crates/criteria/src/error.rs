//! Error types for registry construction and criteria compilation.
//!
//! Every error here is a static mismatch between a caller, a template and a
//! registry. None of them are transient, so none of them are retryable.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// Errors raised by the attribute registry, the substitution engine and the
/// criteria compiler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CriteriaError {
    /// The field code is not present in the registry.
    #[error("unknown search field: {code}")]
    UnknownField { code: String },

    /// A template references a position that has no supplied value.
    #[error("template references ${position} but only {supplied} parameter(s) were supplied: {template}")]
    MissingParameter {
        template: String,
        position: usize,
        supplied: usize,
    },

    /// A template still contains the site marker after registry construction.
    #[error("site marker in search field '{code}' was never bound to a site column")]
    SiteScopeUnbound { code: String },

    /// A parameter rewriter owns a position outside the declared arity.
    #[error(
        "rewriter of search field '{code}' owns position {position} but the field takes {arity} parameter(s)"
    )]
    RewriterOutOfRange {
        code: String,
        position: usize,
        arity: usize,
    },

    /// The same code was declared twice within one descriptor source.
    #[error("search field '{code}' declared twice in source '{source_name}'")]
    DuplicateCode { code: String, source_name: String },

    /// A function reference could not be parsed.
    #[error("invalid function reference '{input}': {message}")]
    InvalidFunction { input: String, message: String },

    /// The comparison operator cannot be applied to the given value.
    #[error("operator '{operator}' cannot be applied to {field} with this value")]
    InvalidOperator { operator: String, field: String },
}

/// Result alias for criteria operations.
pub type CriteriaResult<T> = Result<T, CriteriaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CriteriaError::UnknownField {
            code: "index.text.foo".to_string(),
        };
        assert_eq!(err.to_string(), "unknown search field: index.text.foo");

        let err = CriteriaError::MissingParameter {
            template: "a = $2".to_string(),
            position: 2,
            supplied: 1,
        };
        assert!(err.to_string().contains("$2"));
        assert!(err.to_string().contains("only 1 parameter"));
    }
}
