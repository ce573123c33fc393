//! # Lambda Predicate Language - Abstract Syntax Tree
//!
//! This module defines the tokens and the Abstract Syntax Tree for single-parameter
//! lambda predicates such as `(v) => v.Age >= 23`.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (literals, parameter, field access, operations)
//! - **[operators]** - Unary, binary and logical operators
//!
//! ## Quick Start
//!
//! ```text
//! (v) => v.Age < 23 || v.Name == "tom"
//! ```
//!
//! This predicate keeps records younger than 23, and any record named `tom`.
//!
//! ## Core Concepts
//!
//! ### Parameter
//!
//! Every predicate declares exactly one parameter between parentheses. Inside the
//! body it refers to the element currently being tested:
//!
//! ```text
//! (p) => p % 2 == 1
//! ```
//!
//! ### Precedence
//!
//! From loosest to tightest:
//!
//! | Level          | Operators               |
//! |----------------|-------------------------|
//! | logical or     | `\|\|`                  |
//! | logical and    | `&&`                    |
//! | equality       | `==` `!=`               |
//! | relational     | `<` `<=` `>` `>=`       |
//! | bitwise or     | `\|`                    |
//! | bitwise xor    | `^`                     |
//! | bitwise and    | `&`                     |
//! | shift          | `<<` `>>`               |
//! | additive       | `+` `-`                 |
//! | multiplicative | `*` `/` `%`             |
//! | unary          | `-` `!`                 |
//!
//! All binary operators are left-associative, so `v&1 == 0` reads as `(v & 1) == 0`.
//!
//! ### Numeric Promotion
//!
//! Integer and float operands may be mixed freely in arithmetic and comparisons;
//! the integer side is promoted to a float. Bitwise operators and `%` accept
//! integers only.
//!
//! ## Examples
//!
//! ```text
//! (v) => (v<<2)>>1 == 8
//! (v) => v*2 >= 5+1+1
//! (s) => s.Address.City == "Lyon" && !s.Retired
//! ```
pub mod expressions;
pub mod operators;
pub mod tokens;

pub use expressions::{Expr, Literal};
pub use operators::{BinOp, LogicalOp, UnaryOp};
pub use tokens::{Token, TokenKind};
