//! Search attribute descriptors.
//!
//! A descriptor maps one abstract field code (e.g. `index.text.relevance()`)
//! to the SQL template that implements it, together with its declared types,
//! visibility, required joins and an optional parameter rewriter.

use serde::{Deserialize, Serialize};

use crate::error::CriteriaResult;
use crate::literal::SqlLiteral;
use crate::rewrite::{ParameterRewriter, Rewritten};
use crate::template;
use crate::value::Value;

/// Declared scalar type of a search attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Text.
    #[default]
    String,
    /// Whole number.
    Integer,
    /// Floating point number.
    Float,
    /// Boolean flag.
    Boolean,
    /// Date (`YYYY-MM-DD`).
    Date,
    /// Date and time (`YYYY-MM-DD HH:MM:SS`).
    Datetime,
}

impl ValueType {
    /// The bind type the statement layer uses for this value type.
    pub fn internal(&self) -> InternalType {
        match self {
            ValueType::Integer => InternalType::Int,
            ValueType::Float => InternalType::Float,
            ValueType::Boolean => InternalType::Bool,
            ValueType::String | ValueType::Date | ValueType::Datetime => InternalType::Str,
        }
    }
}

/// Underlying bind-parameter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum InternalType {
    /// String parameter.
    #[default]
    Str,
    /// Integer parameter.
    Int,
    /// Float parameter.
    Float,
    /// Boolean parameter.
    Bool,
}

/// Description of one searchable (virtual) column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeDescriptor {
    /// Public field code; function fields end with `()`, sort variants start with `sort:`.
    pub code: String,

    /// SQL template with `:site` and `$1..$n` markers.
    pub template: String,

    /// Human-readable label.
    pub label: String,

    /// Declared value type.
    pub value_type: ValueType,

    /// Bind type for literal values compared against this field.
    pub internal_type: InternalType,

    /// Whether the field may be used by untrusted query builders.
    pub public: bool,

    /// Join clauses needed whenever the field is referenced.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub joins: Vec<String>,

    /// Number of positional parameters the field expects.
    pub arity: usize,

    /// Tenant column the `:site` marker binds to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_column: Option<String>,

    /// Rewriter applied to the raw arguments before substitution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewriter: Option<ParameterRewriter>,

    /// Site predicate bound into the template; never scanned for `$k` markers.
    #[serde(skip)]
    pub site_predicate: Option<String>,
}

impl AttributeDescriptor {
    /// Creates a public descriptor.
    ///
    /// The arity defaults to the highest `$k` marker in the template and the
    /// internal type follows the value type.
    pub fn new(code: impl Into<String>, template: impl Into<String>, value_type: ValueType) -> Self {
        let template = template.into();
        Self {
            code: code.into(),
            arity: template::max_position(&template),
            template,
            label: String::new(),
            value_type,
            internal_type: value_type.internal(),
            public: true,
            joins: Vec::new(),
            site_column: None,
            rewriter: None,
            site_predicate: None,
        }
    }

    /// Sets the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the bind type.
    pub fn with_internal_type(mut self, internal_type: InternalType) -> Self {
        self.internal_type = internal_type;
        self
    }

    /// Hides the field from untrusted query builders.
    pub fn private(mut self) -> Self {
        self.public = false;
        self
    }

    /// Adds a join clause.
    pub fn with_join(mut self, join: impl Into<String>) -> Self {
        self.joins.push(join.into());
        self
    }

    /// Declares the number of positional parameters.
    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }

    /// Declares the tenant column `:site` binds to.
    pub fn with_site_column(mut self, column: impl Into<String>) -> Self {
        self.site_column = Some(column.into());
        self
    }

    /// Attaches a parameter rewriter.
    pub fn with_rewriter(mut self, rewriter: ParameterRewriter) -> Self {
        self.rewriter = Some(rewriter);
        self
    }

    /// Returns `true` if the field takes arguments (`code()` form).
    pub fn is_function(&self) -> bool {
        self.code.ends_with("()")
    }

    /// Returns `true` for `sort:` variants.
    pub fn is_sort(&self) -> bool {
        self.code.starts_with("sort:")
    }

    /// Escapes the arguments and applies the rewriter, if any.
    pub fn prepare(&self, args: &[Value]) -> Rewritten {
        let literals: Vec<SqlLiteral> = args.iter().map(Value::to_literal).collect();

        match &self.rewriter {
            Some(rewriter) => rewriter.rewrite(args, literals),
            None => Rewritten {
                literals,
                empty_term: false,
            },
        }
    }

    /// Renders the template for the given raw arguments.
    pub fn render(&self, args: &[Value]) -> CriteriaResult<String> {
        self.render_literals(&self.prepare(args).literals)
    }

    /// Renders the template for already prepared literals.
    pub fn render_literals(&self, literals: &[SqlLiteral]) -> CriteriaResult<String> {
        template::render_bound(&self.template, self.site_predicate.as_deref(), literals)
    }
}
