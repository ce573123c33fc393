//! JSON documents as filter elements.
//!
//! JSON objects are records: `v.user.name` walks nested objects. Values
//! without a counterpart in [`Value`] (`null` and arrays) are not elements,
//! and as object members they read as absent fields.

use std::borrow::Cow;

use serde_json::{Map, Number};
use thiserror::Error;

use crate::{
    element::{Element, Record},
    value::Value,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported JSON element: {kind} values cannot be filtered")]
pub struct UnsupportedJson {
    pub kind: &'static str,
}

/// A JSON value that can be bound to a predicate parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonElement {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Object(Map<String, serde_json::Value>),
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Integers that fit in i64 stay integers; everything else becomes a float.
fn number_value(n: &Number) -> Option<Value<'static>> {
    match n.as_i64() {
        Some(i) => Some(Value::Integer(i)),
        None => n.as_f64().map(Value::Float),
    }
}

fn member_value(value: &serde_json::Value) -> Option<Value<'_>> {
    match value {
        serde_json::Value::Bool(b) => Some(Value::Boolean(*b)),
        serde_json::Value::Number(n) => number_value(n),
        serde_json::Value::String(s) => Some(Value::String(Cow::Borrowed(s.as_str()))),
        serde_json::Value::Object(map) => Some(Value::Record(map)),
        serde_json::Value::Null | serde_json::Value::Array(_) => None,
    }
}

impl Record for Map<String, serde_json::Value> {
    fn field(&self, name: &str) -> Option<Value<'_>> {
        self.get(name).and_then(member_value)
    }
}

impl Element for JsonElement {
    fn bind(&self) -> Value<'_> {
        match self {
            JsonElement::Integer(n) => Value::Integer(*n),
            JsonElement::Float(n) => Value::Float(*n),
            JsonElement::String(s) => Value::String(Cow::Borrowed(s.as_str())),
            JsonElement::Boolean(b) => Value::Boolean(*b),
            JsonElement::Object(map) => Value::Record(map),
        }
    }
}

impl TryFrom<serde_json::Value> for JsonElement {
    type Error = UnsupportedJson;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Bool(b) => Ok(JsonElement::Boolean(b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(JsonElement::Integer(i)),
                None => n.as_f64().map(JsonElement::Float).ok_or(UnsupportedJson {
                    kind: "number",
                }),
            },
            serde_json::Value::String(s) => Ok(JsonElement::String(s)),
            serde_json::Value::Object(map) => Ok(JsonElement::Object(map)),
            other => Err(UnsupportedJson {
                kind: json_kind(&other),
            }),
        }
    }
}

impl From<JsonElement> for serde_json::Value {
    fn from(element: JsonElement) -> Self {
        match element {
            JsonElement::Integer(n) => serde_json::Value::Number(n.into()),
            JsonElement::Float(n) => Number::from_f64(n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            JsonElement::String(s) => serde_json::Value::String(s),
            JsonElement::Boolean(b) => serde_json::Value::Bool(b),
            JsonElement::Object(map) => serde_json::Value::Object(map),
        }
    }
}
