use std::fmt;

use thiserror::Error;

use crate::ast::{Token, TokenKind};

/// Location of a character in the source text.
///
/// `offset` counts characters from the start of the input; `line` and `column`
/// are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn start() -> Self {
        Position {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Errors raised while turning source text into tokens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("Unexpected character '{character}' at {position}")]
    UnexpectedCharacter { character: char, position: Position },

    #[error("Unexpected '=' at {position} (did you mean '==' or '=>'?)")]
    LoneEquals { position: Position },

    #[error("Unterminated string starting at {position}: missing closing quote")]
    UnterminatedString { position: Position },

    #[error("Invalid escape sequence '\\{character}' at {position}")]
    InvalidEscape { character: char, position: Position },

    #[error("Invalid number literal '{literal}' at {position}")]
    InvalidNumber { literal: String, position: Position },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::UnexpectedCharacter { position, .. }
            | LexError::LoneEquals { position }
            | LexError::UnterminatedString { position }
            | LexError::InvalidEscape { position, .. }
            | LexError::InvalidNumber { position, .. } => *position,
        }
    }
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        if self.current_char() == Some('\n') {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.position += 1;
    }

    fn location(&self) -> Position {
        Position {
            offset: self.position,
            line: self.line,
            column: self.column,
        }
    }

    fn lexeme_from(&self, start: Position) -> String {
        self.input[start.offset..self.position].iter().collect()
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self) -> Result<String, LexError> {
        let start = self.location();
        let mut result = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                '"' => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    let escape_at = self.location();
                    self.advance(); // Consume backslash
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some('"') => result.push('"'),
                        Some('\\') => result.push('\\'),
                        Some(character) => {
                            return Err(LexError::InvalidEscape {
                                character,
                                position: escape_at,
                            });
                        }
                        None => return Err(LexError::UnterminatedString { position: start }),
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::UnterminatedString { position: start })
    }

    fn read_number(&mut self) -> Result<TokenKind, LexError> {
        let start = self.location();
        let mut number = String::new();
        let mut is_float = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_float
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let invalid = |literal: String| LexError::InvalidNumber {
            literal,
            position: start,
        };

        if is_float {
            number
                .parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|_| invalid(number.clone()))
        } else {
            number
                .parse::<i64>()
                .map(TokenKind::Integer)
                .map_err(|_| invalid(number.clone()))
        }
    }

    /// Consumes one character and yields `single`, or two characters and yields the
    /// matching entry of `pairs` when the following character selects one.
    fn one_or_two(&mut self, single: TokenKind, pairs: &[(char, TokenKind)]) -> TokenKind {
        if let Some(next) = self.peek_char(1)
            && let Some((_, kind)) = pairs.iter().find(|(c, _)| *c == next)
        {
            self.advance();
            self.advance();
            return kind.clone();
        }
        self.advance();
        single
    }

    fn next_kind(&mut self) -> Result<TokenKind, LexError> {
        let kind = match self.current_char() {
            None => TokenKind::Eof,
            Some('.') => {
                self.advance();
                TokenKind::Dot
            }
            Some('+') => {
                self.advance();
                TokenKind::Plus
            }
            Some('-') => {
                self.advance();
                TokenKind::Minus
            }
            Some('*') => {
                self.advance();
                TokenKind::Star
            }
            Some('/') => {
                self.advance();
                TokenKind::Slash
            }
            Some('%') => {
                self.advance();
                TokenKind::Percent
            }
            Some('^') => {
                self.advance();
                TokenKind::Caret
            }
            Some('(') => {
                self.advance();
                TokenKind::LParen
            }
            Some(')') => {
                self.advance();
                TokenKind::RParen
            }
            Some('&') => self.one_or_two(TokenKind::Ampersand, &[('&', TokenKind::AndAnd)]),
            Some('|') => self.one_or_two(TokenKind::Pipe, &[('|', TokenKind::OrOr)]),
            Some('!') => self.one_or_two(TokenKind::Bang, &[('=', TokenKind::NotEq)]),
            Some('<') => self.one_or_two(
                TokenKind::Lt,
                &[('=', TokenKind::LtEq), ('<', TokenKind::ShiftLeft)],
            ),
            Some('>') => self.one_or_two(
                TokenKind::Gt,
                &[('=', TokenKind::GtEq), ('>', TokenKind::ShiftRight)],
            ),
            Some('=') => match self.peek_char(1) {
                Some('=') => {
                    self.advance();
                    self.advance();
                    TokenKind::EqEq
                }
                Some('>') => {
                    self.advance();
                    self.advance();
                    TokenKind::Arrow
                }
                _ => {
                    return Err(LexError::LoneEquals {
                        position: self.location(),
                    });
                }
            },
            Some('"') => TokenKind::String(self.read_string()?),
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();

                match ident.as_str() {
                    "true" => TokenKind::Boolean(true),
                    "false" => TokenKind::Boolean(false),
                    _ => TokenKind::Identifier(ident),
                }
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number()?,
            Some(character) => {
                return Err(LexError::UnexpectedCharacter {
                    character,
                    position: self.location(),
                });
            }
        };
        Ok(kind)
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        let start = self.location();
        let kind = self.next_kind()?;
        Ok(Token::new(kind, self.lexeme_from(start), start))
    }

    /// Reads the whole input. The returned stream always ends with `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }
}

#[cfg(test)]
fn kinds(input: &str) -> Vec<TokenKind> {
    Lexer::new(input)
        .tokenize()
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn test_keywords() {
    assert_eq!(
        kinds("true false truth"),
        vec![
            TokenKind::Boolean(true),
            TokenKind::Boolean(false),
            TokenKind::Identifier("truth".to_string()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_lambda_header() {
    assert_eq!(
        kinds("(v) => v.Age"),
        vec![
            TokenKind::LParen,
            TokenKind::Identifier("v".to_string()),
            TokenKind::RParen,
            TokenKind::Arrow,
            TokenKind::Identifier("v".to_string()),
            TokenKind::Dot,
            TokenKind::Identifier("Age".to_string()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_lexeme_and_position() {
    let tokens = Lexer::new("(v) =>\n  v >= 10").tokenize().unwrap();
    let ge = &tokens[5];
    assert_eq!(ge.kind, TokenKind::GtEq);
    assert_eq!(ge.lexeme, ">=");
    assert_eq!(
        ge.position,
        Position {
            offset: 11,
            line: 2,
            column: 5
        }
    );
}
