use std::{borrow::Cow, fmt};

use crate::element::Record;

/// An intermediate or final result of evaluating a predicate.
///
/// Values borrow from the element under test and from the predicate itself, so
/// reading a string field or a string literal never copies it.
///
/// # Numeric Promotion
///
/// `Integer` and `Float` mix freely in arithmetic and comparisons: when either
/// operand is a float the integer side is converted with [`Value::as_float`].
/// Bitwise operators and `%` accept integers only.
///
/// # Examples
///
/// ```
/// use lambda_filter::Value;
///
/// let age = Value::Integer(24);
/// assert_eq!(age.as_float(), Some(24.0));
/// assert_eq!(age.type_name(), "integer");
///
/// let name = Value::from("tom");
/// assert_eq!(name.as_str(), Some("tom"));
/// ```
#[derive(Clone)]
pub enum Value<'a> {
    /// 64-bit signed integer
    Integer(i64),

    /// 64-bit IEEE-754 float
    Float(f64),

    /// UTF-8 string, borrowed when possible
    String(Cow<'a, str>),

    Boolean(bool),

    /// Handle to a record: the bound element itself or a nested record field.
    ///
    /// Only useful as the base of a further field lookup.
    Record(&'a dyn Record),
}

impl<'a> Value<'a> {
    /// Human-readable kind used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Boolean(_) => "boolean",
            Value::Record(_) => "record",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }

    /// Numeric value promoted to a float; `None` for non-numeric kinds.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(&**s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&'a dyn Record> {
        match self {
            Value::Record(r) => Some(*r),
            _ => None,
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => f.debug_tuple("Integer").field(n).finish(),
            Value::Float(n) => f.debug_tuple("Float").field(n).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Value::Record(_) => f.write_str("Record(..)"),
        }
    }
}

/// Scalars compare by value; records compare by address.
impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => std::ptr::addr_eq(*a, *b),
            _ => false,
        }
    }
}

impl From<i64> for Value<'_> {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value<'_> {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::String(Cow::Borrowed(s))
    }
}

impl From<String> for Value<'_> {
    fn from(s: String) -> Self {
        Value::String(Cow::Owned(s))
    }
}
