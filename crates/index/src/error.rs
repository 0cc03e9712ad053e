//! Error types for the index managers.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use mshop_criteria::CriteriaError;
use thiserror::Error;

/// Errors raised while constructing index managers or assembling statements.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// Registry construction or criteria compilation failed.
    #[error(transparent)]
    Criteria(#[from] CriteriaError),

    /// The requested sub-manager is not configured.
    #[error("unknown index sub-manager: {name}")]
    UnknownSubManager { name: String },

    /// The configuration is unusable.
    #[error("invalid index configuration: {message}")]
    InvalidConfig { message: String },

    /// A locale value needed to build a function reference is missing.
    #[error("locale has no {field} set")]
    MissingLocale { field: String },
}

/// Result alias for index operations.
pub type IndexResult<T> = Result<T, IndexError>;
