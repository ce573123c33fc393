use std::fmt;

use crate::{
    ast::Expr,
    element::Element,
    evaluator::{EvalContext, EvalError, Evaluator},
    lexer::Lexer,
    parser::{ParseError, Parser},
};

/// Default bound on expression nesting, shared by the parser and the evaluator.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Compilation failures. Lexing problems surface as [`ParseError::Lex`].
pub type CompileError = ParseError;

/// Settings for [`compile_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Maximum expression tree depth and parenthesis nesting accepted by the
    /// parser, and maximum tree depth walked by the evaluator.
    pub max_depth: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// A compiled single-parameter lambda predicate.
///
/// Immutable once built: one predicate can be applied to any number of
/// collections, from any number of threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    parameter: String,
    body: Expr,
    max_depth: usize,
}

impl Predicate {
    /// Builds a predicate from an already constructed tree.
    pub fn new(parameter: impl Into<String>, body: Expr) -> Self {
        Predicate {
            parameter: parameter.into(),
            body,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    pub fn body(&self) -> &Expr {
        &self.body
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub(crate) fn evaluator(&self) -> Evaluator {
        Evaluator::new(self.max_depth)
    }

    /// Evaluates the predicate against a single element.
    ///
    /// ```
    /// let odd = lambda_filter::compile("(p) => p % 2 == 1").unwrap();
    /// assert_eq!(odd.test(&7), Ok(true));
    /// assert_eq!(odd.test(&8), Ok(false));
    /// ```
    pub fn test<T: Element + ?Sized>(&self, item: &T) -> Result<bool, EvalError> {
        let context = EvalContext::bind(&self.parameter, item);
        self.evaluator().test(&self.body, &context)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}) => {}",
            self.parameter,
            self.body.display_with(&self.parameter)
        )
    }
}

/// Compiles predicate source text such as `(v) => v.Age >= 23`.
///
/// Fails before any data is involved: the result does not depend on the type
/// of collection the predicate is later applied to.
///
/// ```
/// use lambda_filter::{compile, ParseError};
///
/// let predicate = compile("(v) => v > 5+1").unwrap();
/// assert_eq!(predicate.parameter(), "v");
/// assert_eq!(predicate.to_string(), "(v) => (v > (5 + 1))");
///
/// assert!(matches!(
///     compile("(v) => w > 1"),
///     Err(ParseError::UnknownIdentifier { .. })
/// ));
/// ```
pub fn compile(source: &str) -> Result<Predicate, CompileError> {
    compile_with(source, &CompileOptions::default())
}

pub fn compile_with(source: &str, options: &CompileOptions) -> Result<Predicate, CompileError> {
    let lexer = Lexer::new(source);
    let mut parser = Parser::new(lexer)?.with_max_depth(options.max_depth);
    let predicate = parser.parse_predicate()?;

    log::debug!("compiled predicate {}", predicate);
    Ok(predicate)
}
