use crate::error::{Expected, LexError, ParseError};
use crate::token::{Span, Token, TokenKind};

/// Splits a source string into tokens, ending with a single [`TokenKind::End`].
///
/// The lexer stops for good after the end token or after the first error.
pub struct Lexer<'source> {
    source: &'source str,
    rest: &'source str,
    position: usize,
    peeked: Option<Token<'source>>,
    finished: bool,
}

/// Tokenizes the whole input eagerly.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, LexError> {
    Lexer::new(source).collect()
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Self {
        Self {
            source,
            rest: source,
            position: 0,
            peeked: None,
            finished: false,
        }
    }

    pub fn end_token(&self) -> Token<'source> {
        let end = self.source.len();
        Token {
            kind: TokenKind::End,
            lexeme: &self.source[end..],
            span: Span { start: end, end },
        }
    }
}

enum State {
    Ident,
    Number,
}

macro_rules! token {
    ($kind:ident, $start:ident, $self:ident) => {
        return Some(Ok(Token {
            kind: TokenKind::$kind,
            lexeme: &$self.source[$start..$self.position],
            span: Span {
                start: $start,
                end: $self.position,
            },
        }))
    };
}

impl<'source> Iterator for Lexer<'source> {
    type Item = Result<Token<'source>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(peeked) = self.peeked.take() {
            return Some(Ok(peeked));
        }

        if self.finished {
            return None;
        }

        loop {
            let mut chars = self.rest.chars();
            let Some(c) = chars.next() else {
                self.finished = true;
                return Some(Ok(self.end_token()));
            };
            let c_start = self.position;

            self.rest = chars.as_str();
            self.position += c.len_utf8();

            let state = match c {
                '+' => token!(Plus, c_start, self),
                '-' => token!(Minus, c_start, self),
                '*' => token!(Star, c_start, self),
                '/' => token!(Slash, c_start, self),
                '^' => token!(Caret, c_start, self),
                ',' => token!(Comma, c_start, self),
                '(' => token!(OpenParen, c_start, self),
                ')' => token!(CloseParen, c_start, self),

                'a'..='z' | 'A'..='Z' | '_' => State::Ident,
                '0'..='9' => State::Number,

                // Only horizontal whitespace separates tokens
                ' ' | '\t' => continue,

                _ => {
                    self.finished = true;
                    return Some(Err(LexError::new(self.source, c, c_start)));
                }
            };

            break Some(Ok(match state {
                State::Ident => self.parse_ident(c_start),
                State::Number => self.parse_number(c_start),
            }));
        }
    }
}

impl<'source> Lexer<'source> {
    pub fn peek(&mut self) -> Result<Option<&Token<'source>>, LexError> {
        if self.peeked.is_none() {
            self.peeked = self.next().transpose()?;
        }

        Ok(self.peeked.as_ref())
    }

    pub fn expect(&mut self, expected: TokenKind) -> crate::Result<Token<'source>> {
        let token = self.next().transpose()?.unwrap_or_else(|| self.end_token());
        if token.kind == expected {
            return Ok(token);
        }

        Err(ParseError::new(
            self.source,
            Expected::Token(expected),
            token.kind,
            token.span,
        )
        .into())
    }

    fn eat_while(&mut self, matcher: impl Fn(char) -> bool) {
        let end = self.rest.find(|c: char| !matcher(c)).unwrap_or(self.rest.len());
        self.position += end;
        self.rest = &self.rest[end..];
    }

    fn parse_ident(&mut self, start: usize) -> Token<'source> {
        self.eat_while(|c| c.is_ascii_alphanumeric() || c == '_');

        Token {
            kind: TokenKind::Identifier,
            lexeme: &self.source[start..self.position],
            span: Span {
                start,
                end: self.position,
            },
        }
    }

    fn parse_number(&mut self, start: usize) -> Token<'source> {
        self.eat_while(|c| c.is_ascii_digit());

        // The fraction only counts when a digit follows the dot
        let mut fraction = self.rest.chars();
        if fraction.next() == Some('.') && fraction.next().is_some_and(|c| c.is_ascii_digit()) {
            self.position += 1;
            self.rest = &self.rest[1..];
            self.eat_while(|c| c.is_ascii_digit());
        }

        Token {
            kind: TokenKind::Number,
            lexeme: &self.source[start..self.position],
            span: Span {
                start,
                end: self.position,
            },
        }
    }
}
