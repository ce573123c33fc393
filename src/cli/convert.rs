//! JSON <-> element conversion for the command line

use super::CliError;
use crate::JsonElement;

/// Splits a JSON array into filterable elements.
pub fn elements_from_json(input: serde_json::Value) -> Result<Vec<JsonElement>, CliError> {
    let items = match input {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Null => return Err(CliError::NotAnArray("null")),
        serde_json::Value::Bool(_) => return Err(CliError::NotAnArray("boolean")),
        serde_json::Value::Number(_) => return Err(CliError::NotAnArray("number")),
        serde_json::Value::String(_) => return Err(CliError::NotAnArray("string")),
        serde_json::Value::Object(_) => return Err(CliError::NotAnArray("object")),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            JsonElement::try_from(item).map_err(|source| CliError::UnsupportedElement { index, source })
        })
        .collect()
}

pub fn elements_to_json(elements: Vec<JsonElement>) -> serde_json::Value {
    serde_json::Value::Array(elements.into_iter().map(serde_json::Value::from).collect())
}
