use std::{borrow::Cow, cmp::Ordering};

use thiserror::Error;

use crate::{
    ast::{BinOp, Expr, Literal, LogicalOp, UnaryOp},
    element::Element,
    predicate::DEFAULT_MAX_DEPTH,
    value::Value,
};

/// Binding of the lambda parameter to one element for one evaluation.
#[derive(Debug, Clone)]
pub struct EvalContext<'a> {
    /// Declared parameter name
    pub parameter: &'a str,
    /// What the parameter refers to
    pub bound: Value<'a>,
}

impl<'a> EvalContext<'a> {
    pub fn new(parameter: &'a str, bound: Value<'a>) -> Self {
        EvalContext { parameter, bound }
    }

    /// Binds `element` to `parameter`
    pub fn bind<T: Element + ?Sized>(parameter: &'a str, element: &'a T) -> Self {
        EvalContext::new(parameter, element.bind())
    }
}

/// The tree-walking predicate evaluator.
///
/// Holds no per-element state, so one evaluator serves any number of elements.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator {
    max_depth: usize,
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new(DEFAULT_MAX_DEPTH)
    }
}

/// Errors that can occur while evaluating a predicate against an element.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Operand kinds invalid for the operator
    #[error("Type error: {0}")]
    TypeMismatch(String),

    /// The record has no field of this name
    #[error("Access error: field `{field}` not found")]
    FieldNotFound { field: String },

    /// Field access on a value that has no fields
    #[error("Access error: cannot read field `{field}` of {found}, the value is not a record")]
    NotAStruct { field: String, found: &'static str },

    /// Integer division or modulo by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// The predicate body did not produce a boolean
    #[error("Predicate must evaluate to a boolean, got {found}")]
    PredicateNotBoolean { found: &'static str },

    /// The expression tree is nested deeper than the configured limit
    #[error("Recursion limit exceeded: expression nesting is deeper than {limit}")]
    RecursionLimitExceeded { limit: usize },

    /// Negative shift count
    #[error("Invalid shift count {count}")]
    InvalidShift { count: i64 },
}

fn type_mismatch(op: &str, left: &Value<'_>, right: &Value<'_>) -> EvalError {
    EvalError::TypeMismatch(format!(
        "Cannot apply `{}` to {} and {}",
        op,
        left.type_name(),
        right.type_name()
    ))
}

impl Evaluator {
    pub fn new(max_depth: usize) -> Self {
        Evaluator { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Evaluates a predicate body and requires a boolean verdict.
    ///
    /// # Examples
    ///
    /// ```
    /// use lambda_filter::{compile, EvalContext, Evaluator};
    ///
    /// let predicate = compile("(v) => v % 2 == 1").unwrap();
    /// let evaluator = Evaluator::default();
    ///
    /// let ctx = EvalContext::bind(predicate.parameter(), &3i64);
    /// assert!(evaluator.test(predicate.body(), &ctx).unwrap());
    /// ```
    pub fn test<'a>(&self, expr: &'a Expr, context: &EvalContext<'a>) -> Result<bool, EvalError> {
        match self.eval_expr(expr, context)? {
            Value::Boolean(b) => Ok(b),
            other => Err(EvalError::PredicateNotBoolean {
                found: other.type_name(),
            }),
        }
    }

    /// Evaluates any expression to a value.
    pub fn eval_expr<'a>(
        &self,
        expr: &'a Expr,
        context: &EvalContext<'a>,
    ) -> Result<Value<'a>, EvalError> {
        self.eval_at(expr, context, 1)
    }

    fn eval_at<'a>(
        &self,
        expr: &'a Expr,
        context: &EvalContext<'a>,
        depth: usize,
    ) -> Result<Value<'a>, EvalError> {
        if depth > self.max_depth {
            return Err(EvalError::RecursionLimitExceeded {
                limit: self.max_depth,
            });
        }

        match expr {
            Expr::Literal(Literal::Integer(n)) => Ok(Value::Integer(*n)),
            Expr::Literal(Literal::Float(n)) => Ok(Value::Float(*n)),
            Expr::Literal(Literal::String(s)) => Ok(Value::String(Cow::Borrowed(s.as_str()))),
            Expr::Literal(Literal::Boolean(b)) => Ok(Value::Boolean(*b)),
            Expr::Param => Ok(context.bound.clone()),
            Expr::FieldAccess { base, field } => {
                let base_value = self.eval_at(base, context, depth + 1)?;
                self.apply_access(base_value, field)
            }
            Expr::Unary { op, operand } => {
                let value = self.eval_at(operand, context, depth + 1)?;
                self.apply_unary(*op, value)
            }
            Expr::Binary { op, left, right } => {
                let left_val = self.eval_at(left, context, depth + 1)?;
                let right_val = self.eval_at(right, context, depth + 1)?;
                self.apply_binop(*op, left_val, right_val)
            }
            Expr::Logical { op, left, right } => {
                let left_val = self.eval_bool(*op, left, context, depth + 1)?;
                match (op, left_val) {
                    // Right side is never touched once the outcome is fixed.
                    (LogicalOp::And, false) => Ok(Value::Boolean(false)),
                    (LogicalOp::Or, true) => Ok(Value::Boolean(true)),
                    _ => {
                        let right_val = self.eval_bool(*op, right, context, depth + 1)?;
                        Ok(Value::Boolean(right_val))
                    }
                }
            }
        }
    }

    fn eval_bool<'a>(
        &self,
        op: LogicalOp,
        expr: &'a Expr,
        context: &EvalContext<'a>,
        depth: usize,
    ) -> Result<bool, EvalError> {
        match self.eval_at(expr, context, depth)? {
            Value::Boolean(b) => Ok(b),
            other => Err(EvalError::TypeMismatch(format!(
                "Operator `{}` requires boolean operands, got {}",
                op,
                other.type_name()
            ))),
        }
    }

    fn apply_access<'a>(&self, object: Value<'a>, field: &str) -> Result<Value<'a>, EvalError> {
        match object {
            Value::Record(record) => {
                record
                    .field(field)
                    .ok_or_else(|| EvalError::FieldNotFound {
                        field: field.to_string(),
                    })
            }
            other => Err(EvalError::NotAStruct {
                field: field.to_string(),
                found: other.type_name(),
            }),
        }
    }

    fn apply_unary<'a>(&self, op: UnaryOp, value: Value<'a>) -> Result<Value<'a>, EvalError> {
        match (op, value) {
            (UnaryOp::Negate, Value::Integer(n)) => Ok(Value::Integer(n.wrapping_neg())),
            (UnaryOp::Negate, Value::Float(n)) => Ok(Value::Float(-n)),
            (UnaryOp::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
            (UnaryOp::Negate, other) => Err(EvalError::TypeMismatch(format!(
                "Cannot negate {}",
                other.type_name()
            ))),
            (UnaryOp::Not, other) => Err(EvalError::TypeMismatch(format!(
                "Operator `!` requires a boolean operand, got {}",
                other.type_name()
            ))),
        }
    }

    fn apply_binop<'a>(
        &self,
        op: BinOp,
        left: Value<'a>,
        right: Value<'a>,
    ) -> Result<Value<'a>, EvalError> {
        match op {
            BinOp::Add | BinOp::Subtract | BinOp::Multiply | BinOp::Divide => {
                self.apply_arithmetic(op, left, right)
            }
            BinOp::Modulo => {
                let (a, b) = integer_operands(op, &left, &right)?;
                if b == 0 {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(Value::Integer(a.wrapping_rem(b)))
            }
            BinOp::BitAnd => integer_operands(op, &left, &right).map(|(a, b)| Value::Integer(a & b)),
            BinOp::BitOr => integer_operands(op, &left, &right).map(|(a, b)| Value::Integer(a | b)),
            BinOp::BitXor => integer_operands(op, &left, &right).map(|(a, b)| Value::Integer(a ^ b)),
            BinOp::ShiftLeft => {
                let (a, b) = integer_operands(op, &left, &right)?;
                // Everything shifted out
                Ok(Value::Integer(a.checked_shl(shift_count(b)?).unwrap_or(0)))
            }
            BinOp::ShiftRight => {
                let (a, b) = integer_operands(op, &left, &right)?;
                let fill = if a < 0 { -1 } else { 0 };
                Ok(Value::Integer(a.checked_shr(shift_count(b)?).unwrap_or(fill)))
            }
            BinOp::Equal
            | BinOp::NotEqual
            | BinOp::LessThan
            | BinOp::GreaterThan
            | BinOp::LessEqual
            | BinOp::GreaterEqual => self.apply_comparison(op, &left, &right).map(Value::Boolean),
        }
    }

    fn apply_arithmetic<'a>(
        &self,
        op: BinOp,
        left: Value<'a>,
        right: Value<'a>,
    ) -> Result<Value<'a>, EvalError> {
        match (&left, &right) {
            (Value::Integer(a), Value::Integer(b)) => {
                let (a, b) = (*a, *b);
                let result = match op {
                    BinOp::Add => a.wrapping_add(b),
                    BinOp::Subtract => a.wrapping_sub(b),
                    BinOp::Multiply => a.wrapping_mul(b),
                    _ => {
                        if b == 0 {
                            return Err(EvalError::DivisionByZero);
                        }
                        a.wrapping_div(b)
                    }
                };
                Ok(Value::Integer(result))
            }
            (Value::String(a), Value::String(b)) if op == BinOp::Add => {
                Ok(Value::String(Cow::Owned(format!("{}{}", a, b))))
            }
            _ => match (left.as_float(), right.as_float()) {
                (Some(a), Some(b)) => {
                    let result = match op {
                        BinOp::Add => a + b,
                        BinOp::Subtract => a - b,
                        BinOp::Multiply => a * b,
                        // IEEE-754: x/0.0 is ±inf or NaN
                        _ => a / b,
                    };
                    Ok(Value::Float(result))
                }
                _ => Err(type_mismatch(op.symbol(), &left, &right)),
            },
        }
    }

    fn apply_comparison(
        &self,
        op: BinOp,
        left: &Value<'_>,
        right: &Value<'_>,
    ) -> Result<bool, EvalError> {
        match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => Ok(ordering_satisfies(op, a.cmp(b))),
            (Value::String(a), Value::String(b)) => Ok(ordering_satisfies(op, a.cmp(b))),
            (Value::Boolean(a), Value::Boolean(b)) => match op {
                BinOp::Equal => Ok(a == b),
                BinOp::NotEqual => Ok(a != b),
                _ => Err(EvalError::TypeMismatch(format!(
                    "Operator `{}` cannot order booleans",
                    op
                ))),
            },
            _ => match (left.as_float(), right.as_float()) {
                (Some(a), Some(b)) => Ok(match a.partial_cmp(&b) {
                    Some(ordering) => ordering_satisfies(op, ordering),
                    // NaN is unordered: only `!=` holds
                    None => op == BinOp::NotEqual,
                }),
                _ => Err(type_mismatch(op.symbol(), left, right)),
            },
        }
    }
}

fn ordering_satisfies(op: BinOp, ordering: Ordering) -> bool {
    match op {
        BinOp::Equal => ordering == Ordering::Equal,
        BinOp::NotEqual => ordering != Ordering::Equal,
        BinOp::LessThan => ordering == Ordering::Less,
        BinOp::GreaterThan => ordering == Ordering::Greater,
        BinOp::LessEqual => ordering != Ordering::Greater,
        BinOp::GreaterEqual => ordering != Ordering::Less,
        _ => false,
    }
}

fn integer_operands(op: BinOp, left: &Value<'_>, right: &Value<'_>) -> Result<(i64, i64), EvalError> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Ok((*a, *b)),
        _ => Err(EvalError::TypeMismatch(format!(
            "Operator `{}` requires integer operands, got {} and {}",
            op,
            left.type_name(),
            right.type_name()
        ))),
    }
}

/// Counts of 64 and above saturate so `checked_shl`/`checked_shr` report them.
fn shift_count(count: i64) -> Result<u32, EvalError> {
    if count < 0 {
        return Err(EvalError::InvalidShift { count });
    }
    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}
