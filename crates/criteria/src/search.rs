//! Search documents: conditions, sort order and result slice.

use serde::{Deserialize, Serialize};

use crate::expr::{Expr, FieldRef};

/// Default number of rows per page.
pub const DEFAULT_SLICE_SIZE: usize = 100;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortDirection {
    /// Ascending.
    #[default]
    #[serde(rename = "+")]
    Asc,
    /// Descending.
    #[serde(rename = "-")]
    Desc,
}

impl SortDirection {
    /// SQL keyword.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// One `ORDER BY` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortDirective {
    /// Direction, `+` or `-`.
    #[serde(default)]
    pub direction: SortDirection,
    /// Sorted field.
    pub field: FieldRef,
}

impl SortDirective {
    /// Ascending sort.
    pub fn asc(field: FieldRef) -> Self {
        Self {
            direction: SortDirection::Asc,
            field,
        }
    }

    /// Descending sort.
    pub fn desc(field: FieldRef) -> Self {
        Self {
            direction: SortDirection::Desc,
            field,
        }
    }
}

/// Result window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slice {
    /// Zero-based offset.
    #[serde(default)]
    pub start: usize,
    /// Maximum number of rows.
    #[serde(default = "default_size")]
    pub size: usize,
}

fn default_size() -> usize {
    DEFAULT_SLICE_SIZE
}

impl Default for Slice {
    fn default() -> Self {
        Self {
            start: 0,
            size: DEFAULT_SLICE_SIZE,
        }
    }
}

/// A complete search request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Search {
    /// Filter; `None` matches everything.
    #[serde(default)]
    pub conditions: Option<Expr>,
    /// Sort order.
    #[serde(default)]
    pub sort: Vec<SortDirective>,
    /// Result window.
    #[serde(default)]
    pub slice: Slice,
}

impl Search {
    /// Creates an empty search.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the filter.
    pub fn with_conditions(mut self, conditions: Expr) -> Self {
        self.conditions = Some(conditions);
        self
    }

    /// Appends a sort directive.
    pub fn with_sort(mut self, directive: SortDirective) -> Self {
        self.sort.push(directive);
        self
    }

    /// Sets the result window.
    pub fn with_slice(mut self, start: usize, size: usize) -> Self {
        self.slice = Slice { start, size };
        self
    }
}
