use std::fmt;

use crate::lexer::Position;

/// A lexical token together with the text it was read from and where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token, exactly as written
    pub lexeme: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, position: Position) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            position,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    /// Integer literal
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 0
    /// ```
    Integer(i64),

    /// Floating-point literal. A decimal point followed by a digit is required.
    ///
    /// # Examples
    /// ```text
    /// 3.14
    /// 1.0
    /// ```
    Float(f64),

    /// String literal enclosed in double quotes
    ///
    /// # Examples
    /// ```text
    /// "tom"
    /// "line\n"
    /// ```
    String(String),

    /// `true` or `false`
    Boolean(bool),

    /// Parameter or field name
    ///
    /// Must start with a letter or underscore, followed by letters, digits, or underscores.
    ///
    /// # Examples
    /// ```text
    /// v
    /// Age
    /// _internal
    /// ```
    Identifier(String),

    // Lambda syntax
    /// Lambda arrow separating the parameter list from the body (`=>`)
    Arrow,

    // Comparison
    /// Equality operator
    EqEq,

    /// Inequality operator
    NotEq,

    /// Less than
    Lt,

    /// Greater than
    Gt,

    /// Less than or equal
    LtEq,

    /// Greater than or equal
    GtEq,

    // Arithmetic
    /// Addition or string concatenation
    Plus,

    /// Subtraction or negation
    Minus,

    /// Multiplication
    Star,

    /// Division
    Slash,

    /// Modulo
    Percent,

    // Bitwise
    /// Bitwise AND (`&`)
    Ampersand,

    /// Bitwise OR (`|`)
    Pipe,

    /// Bitwise XOR (`^`)
    Caret,

    /// Left shift (`<<`)
    ShiftLeft,

    /// Arithmetic right shift (`>>`)
    ShiftRight,

    // Logical
    /// Logical AND (`&&`)
    AndAnd,

    /// Logical OR (`||`)
    OrOr,

    /// Logical NOT (`!`)
    Bang,

    // Delimiters
    /// Left parenthesis for grouping or the parameter list
    LParen,

    /// Right parenthesis
    RParen,

    /// Dot for field access
    Dot,

    /// End of input
    Eof,
}

impl TokenKind {
    /// Short description used in parse error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Integer(n) => format!("integer `{}`", n),
            TokenKind::Float(n) => format!("float `{}`", n),
            TokenKind::String(s) => format!("string {:?}", s),
            TokenKind::Boolean(b) => format!("`{}`", b),
            TokenKind::Identifier(name) => format!("identifier `{}`", name),
            TokenKind::Eof => "end of input".to_string(),
            other => format!("`{}`", other),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            TokenKind::Integer(n) => return write!(f, "{}", n),
            TokenKind::Float(n) => return write!(f, "{:?}", n),
            TokenKind::String(s) => return write!(f, "{:?}", s),
            TokenKind::Boolean(b) => return write!(f, "{}", b),
            TokenKind::Identifier(name) => return write!(f, "{}", name),
            TokenKind::Arrow => "=>",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::LtEq => "<=",
            TokenKind::GtEq => ">=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Ampersand => "&",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::ShiftLeft => "<<",
            TokenKind::ShiftRight => ">>",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            TokenKind::Bang => "!",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Dot => ".",
            TokenKind::Eof => "<eof>",
        };
        f.write_str(symbol)
    }
}
