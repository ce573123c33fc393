use std::mem;

use thiserror::Error;

use crate::{
    ast::{BinOp, Expr, Literal, LogicalOp, Token, TokenKind, UnaryOp},
    lexer::{LexError, Lexer, Position},
    predicate::{DEFAULT_MAX_DEPTH, Predicate},
};

/// Errors raised while compiling predicate source text.
///
/// These never depend on the collection a predicate is later applied to.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("Expected {expected} at {position}, got {found}")]
    UnexpectedToken {
        position: Position,
        expected: &'static str,
        found: String,
    },

    #[error("Unbalanced parenthesis at {position}")]
    UnbalancedParenthesis { position: Position },

    #[error("Missing parameter declaration at {position}: predicates start with `(name) =>`")]
    MissingParameter { position: Position },

    #[error("Missing `=>` at {position}, got {found}")]
    MissingArrow { position: Position, found: String },

    #[error("Empty predicate body at {position}")]
    EmptyBody { position: Position },

    #[error("Unknown identifier `{name}` at {position}: the only name in scope is `{parameter}`")]
    UnknownIdentifier {
        position: Position,
        name: String,
        parameter: String,
    },

    #[error("Expression nesting at {position} exceeds the limit of {limit}")]
    NestingTooDeep { position: Position, limit: usize },

    #[error("Unexpected {found} at {position} after the end of the predicate")]
    TrailingInput { position: Position, found: String },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::Lex(e) => e.position(),
            ParseError::UnexpectedToken { position, .. }
            | ParseError::UnbalancedParenthesis { position }
            | ParseError::MissingParameter { position }
            | ParseError::MissingArrow { position, .. }
            | ParseError::EmptyBody { position }
            | ParseError::UnknownIdentifier { position, .. }
            | ParseError::NestingTooDeep { position, .. }
            | ParseError::TrailingInput { position, .. } => *position,
        }
    }
}

/// Infix operators as they appear between two operands.
#[derive(Debug, Clone, Copy)]
enum Infix {
    Binary(BinOp),
    Logical(LogicalOp),
}

impl Infix {
    fn from_token(kind: &TokenKind) -> Option<Self> {
        let op = match kind {
            TokenKind::OrOr => Infix::Logical(LogicalOp::Or),
            TokenKind::AndAnd => Infix::Logical(LogicalOp::And),
            TokenKind::EqEq => Infix::Binary(BinOp::Equal),
            TokenKind::NotEq => Infix::Binary(BinOp::NotEqual),
            TokenKind::Lt => Infix::Binary(BinOp::LessThan),
            TokenKind::LtEq => Infix::Binary(BinOp::LessEqual),
            TokenKind::Gt => Infix::Binary(BinOp::GreaterThan),
            TokenKind::GtEq => Infix::Binary(BinOp::GreaterEqual),
            TokenKind::Pipe => Infix::Binary(BinOp::BitOr),
            TokenKind::Caret => Infix::Binary(BinOp::BitXor),
            TokenKind::Ampersand => Infix::Binary(BinOp::BitAnd),
            TokenKind::ShiftLeft => Infix::Binary(BinOp::ShiftLeft),
            TokenKind::ShiftRight => Infix::Binary(BinOp::ShiftRight),
            TokenKind::Plus => Infix::Binary(BinOp::Add),
            TokenKind::Minus => Infix::Binary(BinOp::Subtract),
            TokenKind::Star => Infix::Binary(BinOp::Multiply),
            TokenKind::Slash => Infix::Binary(BinOp::Divide),
            TokenKind::Percent => Infix::Binary(BinOp::Modulo),
            _ => return None,
        };
        Some(op)
    }

    fn precedence(self) -> u8 {
        match self {
            Infix::Binary(op) => op.precedence(),
            Infix::Logical(op) => op.precedence(),
        }
    }

    fn build(self, left: Expr, right: Expr) -> Expr {
        match self {
            Infix::Binary(op) => Expr::binary(op, left, right),
            Infix::Logical(op) => Expr::logical(op, left, right),
        }
    }
}

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    /// Declared parameter name, known once the header is parsed
    parameter: String,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current_token,
            parameter: String::new(),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        })
    }

    /// Limits the depth of the built tree and the nesting of parentheses.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current_token = self.lexer.next_token()?;
        Ok(())
    }

    fn check(&self, kind: &TokenKind) -> bool {
        mem::discriminant(&self.current_token.kind) == mem::discriminant(kind)
    }

    fn position(&self) -> Position {
        self.current_token.position
    }

    fn found(&self) -> String {
        self.current_token.kind.describe()
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        ParseError::UnexpectedToken {
            position: self.position(),
            expected,
            found: self.found(),
        }
    }

    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= self.max_depth {
            return Err(ParseError::NestingTooDeep {
                position: self.position(),
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Parse a complete predicate: `(name) => body`
    pub fn parse_predicate(&mut self) -> Result<Predicate, ParseError> {
        let parameter = self.parse_header()?;
        self.parameter = parameter.clone();

        if self.check(&TokenKind::Eof) {
            return Err(ParseError::EmptyBody {
                position: self.position(),
            });
        }

        let body = self.parse_expression()?;

        match self.current_token.kind {
            TokenKind::Eof => {}
            TokenKind::RParen => {
                return Err(ParseError::UnbalancedParenthesis {
                    position: self.position(),
                });
            }
            _ => {
                return Err(ParseError::TrailingInput {
                    position: self.position(),
                    found: self.found(),
                });
            }
        }

        Ok(Predicate::new(parameter, body).with_max_depth(self.max_depth))
    }

    fn parse_header(&mut self) -> Result<String, ParseError> {
        if !self.check(&TokenKind::LParen) {
            return Err(ParseError::MissingParameter {
                position: self.position(),
            });
        }
        let open = self.position();
        self.advance()?;

        let parameter = match mem::replace(&mut self.current_token.kind, TokenKind::Eof) {
            TokenKind::Identifier(name) => name,
            _ => {
                return Err(ParseError::MissingParameter {
                    position: self.position(),
                });
            }
        };
        self.advance()?;

        if !self.check(&TokenKind::RParen) {
            return Err(match self.current_token.kind {
                TokenKind::Eof | TokenKind::Arrow => ParseError::UnbalancedParenthesis { position: open },
                _ => self.unexpected("`)` closing the parameter list"),
            });
        }
        self.advance()?;

        if !self.check(&TokenKind::Arrow) {
            return Err(ParseError::MissingArrow {
                position: self.position(),
                found: self.found(),
            });
        }
        self.advance()?;

        Ok(parameter)
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary(1).map(|(expr, _)| expr)
    }

    /// Rejects a node whose subtree would be deeper than the limit.
    fn check_depth(&self, depth: usize, position: Position) -> Result<usize, ParseError> {
        if depth > self.max_depth {
            return Err(ParseError::NestingTooDeep {
                position,
                limit: self.max_depth,
            });
        }
        Ok(depth)
    }

    /// Precedence climbing over all infix operators, left-associative.
    ///
    /// Returns the expression with the depth of its tree.
    fn parse_binary(&mut self, min_precedence: u8) -> Result<(Expr, usize), ParseError> {
        let (mut left, mut depth) = self.parse_unary()?;

        while let Some(op) = Infix::from_token(&self.current_token.kind) {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            let position = self.position();
            self.advance()?;
            let (right, right_depth) = self.parse_binary(precedence + 1)?;
            depth = self.check_depth(depth.max(right_depth) + 1, position)?;
            left = op.build(left, right);
        }
        Ok((left, depth))
    }

    fn parse_unary(&mut self) -> Result<(Expr, usize), ParseError> {
        let op = match self.current_token.kind {
            TokenKind::Minus => UnaryOp::Negate,
            TokenKind::Bang => UnaryOp::Not,
            _ => return self.parse_primary(),
        };
        let position = self.position();
        self.advance()?;
        let (operand, depth) = self.nested(|p| p.parse_unary())?;
        let depth = self.check_depth(depth + 1, position)?;
        Ok((Expr::unary(op, operand), depth))
    }

    /// Parse primary expressions: literals, the parameter and its field chain, `( expr )`
    fn parse_primary(&mut self) -> Result<(Expr, usize), ParseError> {
        let position = self.position();

        let literal = match mem::replace(&mut self.current_token.kind, TokenKind::Eof) {
            TokenKind::Integer(n) => Literal::Integer(n),
            TokenKind::Float(n) => Literal::Float(n),
            TokenKind::String(s) => Literal::String(s),
            TokenKind::Boolean(b) => Literal::Boolean(b),
            TokenKind::Identifier(name) => {
                if name != self.parameter {
                    return Err(ParseError::UnknownIdentifier {
                        position,
                        name,
                        parameter: self.parameter.clone(),
                    });
                }
                self.advance()?;
                return self.parse_field_chain(Expr::Param);
            }
            TokenKind::LParen => {
                self.advance()?;
                if self.check(&TokenKind::RParen) {
                    return Err(self.unexpected("expression inside parentheses"));
                }
                // Grouping adds no node, so the inner depth carries through
                let inner = self.nested(|p| p.parse_binary(1))?;
                if !self.check(&TokenKind::RParen) {
                    return Err(match self.current_token.kind {
                        TokenKind::Eof => ParseError::UnbalancedParenthesis { position },
                        _ => self.unexpected("`)`"),
                    });
                }
                self.advance()?;
                return Ok(inner);
            }
            TokenKind::RParen => return Err(ParseError::UnbalancedParenthesis { position }),
            kind => {
                self.current_token.kind = kind;
                return Err(self.unexpected("expression"));
            }
        };
        self.advance()?;
        Ok((Expr::Literal(literal), 1))
    }

    fn parse_field_chain(&mut self, mut expr: Expr) -> Result<(Expr, usize), ParseError> {
        let mut depth = 1;
        while self.check(&TokenKind::Dot) {
            let position = self.position();
            self.advance()?; // consume '.'

            let field = match mem::replace(&mut self.current_token.kind, TokenKind::Eof) {
                TokenKind::Identifier(name) => name,
                kind => {
                    self.current_token.kind = kind;
                    return Err(self.unexpected("field name after `.`"));
                }
            };
            self.advance()?;

            depth = self.check_depth(depth + 1, position)?;
            expr = Expr::field(expr, field);
        }
        Ok((expr, depth))
    }
}
