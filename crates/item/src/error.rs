//! Error types for item value objects.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// Errors raised by item setters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemError {
    /// A code is longer than the column allows.
    #[error("code '{code}' must not be longer than {max} characters")]
    InvalidCode { code: String, max: usize },

    /// A date is not in `YYYY-MM-DD HH:MM:SS` format.
    #[error("invalid characters in date '{value}', ISO format \"YYYY-MM-DD hh:mm:ss\" expected")]
    InvalidDate { value: String },

    /// A currency id is not three upper-case letters.
    #[error("invalid characters in ISO currency code '{value}'")]
    InvalidCurrencyId { value: String },

    /// A status code is outside the known range.
    #[error("invalid {kind} status {value}")]
    InvalidStatus { kind: String, value: i64 },

    /// The property does not exist on the item.
    #[error("property name '{name}' not within allowed range")]
    UnknownProperty { name: String },
}

/// Result alias for item operations.
pub type ItemResult<T> = Result<T, ItemError>;
