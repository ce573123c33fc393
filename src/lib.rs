//! # lambda-filter
//!
//! Compile a single-parameter lambda predicate such as `(v) => v.Age >= 23`
//! once, then filter any number of homogeneous collections with it.
//!
//! ```
//! use lambda_filter::compile;
//!
//! let predicate = compile("(v) => (v<<2)>>1 == 8").unwrap();
//! assert_eq!(predicate.apply(&[1, 2, 3, 4, 5, 6, 7]), Ok(vec![4]));
//! ```
//!
//! Elements implement [`Element`]; records additionally implement [`Record`]
//! so their fields can be read by name. See the [`element`] module.

pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod element;
pub mod evaluator;
pub mod filter;
pub mod json;
pub mod lexer;
pub mod parser;
pub mod predicate;
pub mod value;

pub use ast::{BinOp, Expr, Literal, LogicalOp, Token, TokenKind, UnaryOp};
pub use element::{Element, Record};
pub use evaluator::{EvalContext, EvalError, Evaluator};
pub use filter::{FilterError, FilterResult, filter};
pub use json::{JsonElement, UnsupportedJson};
pub use lexer::{LexError, Lexer, Position};
pub use parser::{ParseError, Parser};
pub use predicate::{CompileError, CompileOptions, DEFAULT_MAX_DEPTH, Predicate, compile, compile_with};
pub use value::Value;
