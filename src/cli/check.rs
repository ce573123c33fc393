//! Compile a predicate and filter a JSON array with it

use super::{CliError, elements_from_json, elements_to_json};
use crate::{CompileOptions, DEFAULT_MAX_DEPTH, compile_with};

/// Options for the check command
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// The predicate source, e.g. `(v) => v.age > 30`
    pub predicate: String,
    /// JSON array input
    pub input: Option<String>,
    /// Pretty-print the output
    pub pretty: bool,
    /// Only validate syntax, don't filter
    pub syntax_only: bool,
    /// Nesting limit for parsing and evaluation
    pub max_depth: usize,
}

impl Default for CheckOptions {
    fn default() -> Self {
        CheckOptions {
            predicate: String::new(),
            input: None,
            pretty: false,
            syntax_only: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Filtering succeeded; holds the surviving elements as a JSON array
    Success(serde_json::Value),
}

/// Execute a check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let compile_options = CompileOptions {
        max_depth: options.max_depth,
    };
    let predicate = compile_with(&options.predicate, &compile_options)?;

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid);
    }

    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let json_value: serde_json::Value = serde_json::from_str(json_str)?;
    let elements = elements_from_json(json_value)?;

    log::info!("filtering {} elements with {}", elements.len(), predicate);

    let kept = predicate
        .call(&elements)
        .into_vec()
        .map_err(CliError::Filter)?;

    Ok(CheckResult::Success(elements_to_json(kept)))
}
