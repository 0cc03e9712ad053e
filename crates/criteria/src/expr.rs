//! Criteria expression tree.
//!
//! Expressions reference fields either by plain code (`product.code`) or as
//! function calls with JSON arguments
//! (`index.text:relevance("default","de","red shoes")`). The JSON form of an
//! expression is what the `mshop compile` command reads:
//!
//! ```json
//! {"op": "&&", "exprs": [
//!     {"op": "==", "field": "product.status", "value": 1},
//!     {"op": ">", "field": "index.text:relevance(\"default\",\"de\",\"red\")", "value": 0}
//! ]}
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CriteriaError, CriteriaResult};
use crate::value::Value;

/// Prefix of codes usable in an `ORDER BY` position.
pub const SORT_PREFIX: &str = "sort:";

/// Reference to a search field, optionally called with arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldRef {
    name: String,
    args: Option<Vec<Value>>,
}

impl FieldRef {
    /// A plain field, looked up verbatim.
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: None,
        }
    }

    /// A function field called with the given arguments.
    pub fn function(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            args: Some(args),
        }
    }

    /// Parses `code` or `name(arg, ...)` where the arguments are JSON values.
    ///
    /// ```
    /// use mshop_criteria::{FieldRef, Value};
    ///
    /// let field = FieldRef::parse(r#"index.text:relevance("default","de","red")"#).unwrap();
    /// assert_eq!(field.lookup_code(), "index.text.relevance()");
    /// assert_eq!(field.args()[2], Value::from("red"));
    /// ```
    pub fn parse(input: &str) -> CriteriaResult<Self> {
        let input = input.trim();
        let invalid = |message: &str| CriteriaError::InvalidFunction {
            input: input.to_string(),
            message: message.to_string(),
        };

        let Some(open) = input.find('(') else {
            if input.is_empty() {
                return Err(invalid("empty field name"));
            }
            if input.contains(')') {
                return Err(invalid("unbalanced parenthesis"));
            }
            return Ok(Self::plain(input));
        };

        let name = input[..open].trim();
        if name.is_empty() {
            return Err(invalid("empty function name"));
        }

        let inner = input[open + 1..]
            .strip_suffix(')')
            .ok_or_else(|| invalid("missing closing parenthesis"))?;

        let json: Vec<serde_json::Value> = serde_json::from_str(&format!("[{}]", inner))
            .map_err(|e| invalid(&format!("arguments are not valid JSON: {}", e)))?;

        let args = json
            .into_iter()
            .map(Value::try_from)
            .collect::<CriteriaResult<Vec<_>>>()?;

        Ok(Self::function(name, args))
    }

    /// The name as written, without arguments.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The call arguments; empty for plain fields.
    pub fn args(&self) -> &[Value] {
        self.args.as_deref().unwrap_or(&[])
    }

    /// Returns `true` if the field was written as a call.
    pub fn is_function(&self) -> bool {
        self.args.is_some()
    }

    /// Registry code used for conditions.
    ///
    /// Function names have `:` normalized to `.` and `()` appended; the
    /// `sort:` prefix is kept as is.
    pub fn lookup_code(&self) -> String {
        if !self.is_function() {
            return self.name.clone();
        }

        let (prefix, rest) = match self.name.strip_prefix(SORT_PREFIX) {
            Some(rest) => (SORT_PREFIX, rest),
            None => ("", self.name.as_str()),
        };
        let rest = rest.strip_suffix("()").unwrap_or(rest);

        format!("{}{}()", prefix, rest.replace(':', "."))
    }

    /// Registry code used in an `ORDER BY` position.
    ///
    /// Function fields resolve their `sort:` variant, plain fields themselves.
    pub fn sort_code(&self) -> String {
        let code = self.lookup_code();
        if self.is_function() && !code.starts_with(SORT_PREFIX) {
            format!("{}{}", SORT_PREFIX, code)
        } else {
            code
        }
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;

        if let Some(args) = &self.args {
            let encoded = args
                .iter()
                .map(serde_json::to_string)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| fmt::Error)?;
            write!(f, "({})", encoded.join(","))?;
        }

        Ok(())
    }
}

impl FromStr for FieldRef {
    type Err = CriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FieldRef {
    type Error = CriteriaError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<FieldRef> for String {
    fn from(field: FieldRef) -> Self {
        field.to_string()
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    /// Equal, or `IS NULL` / `IN (...)` for null and list values.
    #[serde(rename = "==")]
    Eq,
    /// Not equal, or `IS NOT NULL` / `NOT IN (...)`.
    #[serde(rename = "!=")]
    Ne,
    /// Less than.
    #[serde(rename = "<")]
    Lt,
    /// Less than or equal.
    #[serde(rename = "<=")]
    Le,
    /// Greater than.
    #[serde(rename = ">")]
    Gt,
    /// Greater than or equal.
    #[serde(rename = ">=")]
    Ge,
    /// Starts with.
    #[serde(rename = "=~")]
    StartsWith,
    /// Contains.
    #[serde(rename = "~=")]
    Contains,
}

impl CompareOp {
    /// Operator as written in criteria documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::StartsWith => "=~",
            CompareOp::Contains => "~=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean combinators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombineOp {
    /// All sub-expressions must hold.
    #[serde(rename = "&&")]
    And,
    /// At least one sub-expression must hold.
    #[serde(rename = "||")]
    Or,
}

/// A criteria expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expr {
    /// `field op value`.
    Compare {
        /// Operator.
        op: CompareOp,
        /// Compared field.
        field: FieldRef,
        /// Raw value; `null` when omitted.
        #[serde(default)]
        value: Value,
    },
    /// Conjunction or disjunction of sub-expressions.
    Combine {
        /// Combinator.
        op: CombineOp,
        /// Sub-expressions.
        exprs: Vec<Expr>,
    },
    /// Negation.
    Not {
        /// Negated expression.
        not: Box<Expr>,
    },
}

impl Expr {
    /// Creates a comparison.
    pub fn compare(op: CompareOp, field: FieldRef, value: impl Into<Value>) -> Self {
        Expr::Compare {
            op,
            field,
            value: value.into(),
        }
    }

    /// Creates a conjunction.
    pub fn and(exprs: Vec<Expr>) -> Self {
        Expr::Combine {
            op: CombineOp::And,
            exprs,
        }
    }

    /// Creates a disjunction.
    pub fn or(exprs: Vec<Expr>) -> Self {
        Expr::Combine {
            op: CombineOp::Or,
            exprs,
        }
    }

    /// Negates an expression.
    pub fn negate(expr: Expr) -> Self {
        Expr::Not {
            not: Box::new(expr),
        }
    }
}
