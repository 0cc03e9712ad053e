//! Caller-supplied values for comparisons and function arguments.

use serde::{Deserialize, Serialize};

use crate::attribute::InternalType;
use crate::error::{CriteriaError, CriteriaResult};
use crate::literal::SqlLiteral;

/// A raw, unescaped value supplied by the caller.
///
/// Values are escaped only when they are turned into a [`SqlLiteral`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// SQL `NULL`.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Text.
    Text(String),
    /// List of values, rendered comma separated.
    List(Vec<Value>),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the value as plain text, the form parameter rewriters work on.
    ///
    /// Lists are joined with single spaces, `NULL` becomes the empty string.
    pub fn as_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Text(s) => s.clone(),
            Value::List(items) => items
                .iter()
                .map(Value::as_text)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Escapes the value using its own type.
    pub fn to_literal(&self) -> SqlLiteral {
        match self {
            Value::Null => SqlLiteral::null(),
            Value::Bool(b) => SqlLiteral::boolean(*b),
            Value::Int(i) => SqlLiteral::integer(*i),
            Value::Float(f) => SqlLiteral::float(*f),
            Value::Text(s) => SqlLiteral::quoted(s),
            Value::List(items) => SqlLiteral::list(items.iter().map(Value::to_literal)),
        }
    }

    /// Escapes the value after casting it to the given bind type.
    ///
    /// Text that does not parse as a number casts to zero, the same way a
    /// loosely typed statement layer would coerce it.
    pub fn to_literal_as(&self, internal: InternalType) -> SqlLiteral {
        match (internal, self) {
            (_, Value::Null) => SqlLiteral::null(),
            (_, Value::List(items)) => {
                SqlLiteral::list(items.iter().map(|v| v.to_literal_as(internal)))
            }
            (InternalType::Int, Value::Int(i)) => SqlLiteral::integer(*i),
            (InternalType::Int, Value::Float(f)) => SqlLiteral::integer(f.trunc() as i64),
            (InternalType::Int, Value::Bool(b)) => SqlLiteral::integer(i64::from(*b)),
            (InternalType::Int, Value::Text(s)) => SqlLiteral::integer(parse_leading_int(s)),
            (InternalType::Float, Value::Int(i)) => SqlLiteral::float(*i as f64),
            (InternalType::Float, Value::Float(f)) => SqlLiteral::float(*f),
            (InternalType::Float, Value::Bool(b)) => SqlLiteral::float(f64::from(u8::from(*b))),
            (InternalType::Float, Value::Text(s)) => {
                SqlLiteral::float(s.trim().parse::<f64>().unwrap_or(0.0))
            }
            (InternalType::Bool, v) => SqlLiteral::boolean(truthy(v)),
            (InternalType::Str, Value::Text(s)) => SqlLiteral::quoted(s),
            (InternalType::Str, v) => SqlLiteral::quoted(&v.as_text()),
        }
    }
}

fn parse_leading_int(s: &str) -> i64 {
    let trimmed = s.trim();
    let end = trimmed
        .char_indices()
        .take_while(|(i, c)| c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+')))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);
    trimmed[..end].parse::<i64>().unwrap_or(0)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Int(i) => *i != 0,
        Value::Float(f) => *f != 0.0,
        Value::Text(s) => !(s.is_empty() || s == "0"),
        Value::List(items) => !items.is_empty(),
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = CriteriaError;

    fn try_from(json: serde_json::Value) -> CriteriaResult<Self> {
        match json {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
            serde_json::Value::Number(n) => Ok(n
                .as_i64()
                .map(Value::Int)
                .unwrap_or_else(|| Value::Float(n.as_f64().unwrap_or(0.0)))),
            serde_json::Value::String(s) => Ok(Value::Text(s)),
            serde_json::Value::Array(items) => Ok(Value::List(
                items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<CriteriaResult<Vec<_>>>()?,
            )),
            serde_json::Value::Object(_) => Err(CriteriaError::InvalidFunction {
                input: json.to_string(),
                message: "objects are not valid arguments".to_string(),
            }),
        }
    }
}
