//! CLI support for lambda-filter
//!
//! Provides programmatic access to the `lambda-filter` command so it can be
//! embedded in other tools.

mod check;
mod convert;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use convert::{elements_from_json, elements_to_json};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Filter(#[from] crate::FilterError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe a JSON array to stdin.")]
    NoInput,

    #[error("Input must be a JSON array, got {0}")]
    NotAnArray(&'static str),

    #[error("Element {index}: {source}")]
    UnsupportedElement {
        index: usize,
        source: crate::UnsupportedJson,
    },
}

impl From<crate::ParseError> for CliError {
    fn from(e: crate::ParseError) -> Self {
        CliError::Filter(e.into())
    }
}
