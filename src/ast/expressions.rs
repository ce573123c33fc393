use std::fmt;

use crate::ast::{BinOp, LogicalOp, UnaryOp};

/// Literal constant in a predicate body.
///
/// Integer literals carry no fixed numeric type until they meet an operand:
/// combined with a float they are promoted, otherwise they stay integers.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// # Example
    /// ```text
    /// 42
    /// ```
    Integer(i64),

    /// # Example
    /// ```text
    /// 2.5
    /// ```
    Float(f64),

    /// # Example
    /// ```text
    /// "tom"
    /// ```
    String(String),

    /// `true` or `false`
    Boolean(bool),
}

/// Abstract Syntax Tree node of a predicate body.
///
/// The variant set is closed; the evaluator matches it exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),

    /// The declared lambda parameter
    ///
    /// # Example
    /// ```text
    /// (v) => v > 5
    ///        ^
    /// ```
    Param,

    /// Named field lookup on a record
    ///
    /// # Examples
    /// ```text
    /// v.Age
    /// v.Address.City
    /// ```
    FieldAccess { base: Box<Expr>, field: String },

    /// Prefix operation (`-x`, `!x`)
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// Arithmetic, bitwise or comparison operation
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// `&&` / `||`, right side evaluated only when needed
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn integer(n: i64) -> Self {
        Expr::Literal(Literal::Integer(n))
    }

    pub fn float(n: f64) -> Self {
        Expr::Literal(Literal::Float(n))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Expr::Literal(Literal::String(s.into()))
    }

    pub fn boolean(b: bool) -> Self {
        Expr::Literal(Literal::Boolean(b))
    }

    pub fn field(base: Expr, field: impl Into<String>) -> Self {
        Expr::FieldAccess {
            base: Box::new(base),
            field: field.into(),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn logical(op: LogicalOp, left: Expr, right: Expr) -> Self {
        Expr::Logical {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Height of the tree; a lone literal has depth 1.
    ///
    /// Walks with an explicit stack so arbitrarily deep trees are measured safely.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1usize)];

        while let Some((expr, level)) = stack.pop() {
            max = max.max(level);
            match expr {
                Expr::Literal(_) | Expr::Param => {}
                Expr::FieldAccess { base, .. } => stack.push((base, level + 1)),
                Expr::Unary { operand, .. } => stack.push((operand, level + 1)),
                Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                    stack.push((left, level + 1));
                    stack.push((right, level + 1));
                }
            }
        }
        max
    }

    /// Renders the expression fully parenthesized, spelling the parameter as `param`.
    pub fn display_with<'a>(&'a self, param: &'a str) -> impl fmt::Display + 'a {
        ExprDisplay { expr: self, param }
    }
}

/// Plain decimal notation with a fractional part, as the lexer reads it back.
fn write_float(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    let text = n.to_string();
    if n.is_finite() && !text.contains('.') {
        write!(f, "{}.0", text)
    } else {
        f.write_str(&text)
    }
}

struct ExprDisplay<'a> {
    expr: &'a Expr,
    param: &'a str,
}

impl fmt::Display for ExprDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let param = self.param;
        match self.expr {
            Expr::Literal(Literal::Integer(n)) => write!(f, "{}", n),
            Expr::Literal(Literal::Float(n)) => write_float(f, *n),
            Expr::Literal(Literal::String(s)) => write!(f, "{:?}", s),
            Expr::Literal(Literal::Boolean(b)) => write!(f, "{}", b),
            Expr::Param => f.write_str(param),
            Expr::FieldAccess { base, field } => {
                write!(f, "{}.{}", base.display_with(param), field)
            }
            Expr::Unary { op, operand } => write!(f, "{}{}", op, operand.display_with(param)),
            Expr::Binary { op, left, right } => write!(
                f,
                "({} {} {})",
                left.display_with(param),
                op,
                right.display_with(param)
            ),
            Expr::Logical { op, left, right } => write!(
                f,
                "({} {} {})",
                left.display_with(param),
                op,
                right.display_with(param)
            ),
        }
    }
}
