use std::fmt;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::token::{Span, TokenKind};

/// Everything that can go wrong while turning source text into an [`crate::Expr`].
#[derive(Debug, Diagnostic, Error)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Depth(#[from] DepthError),
}

#[derive(Debug, Diagnostic, Error)]
#[error("unexpected character '{character}' at position {position}")]
#[diagnostic(
    code = "unexpected_character",
    help("expressions are made of numbers, identifiers, `+ - * / ^`, `,` and parentheses")
)]
pub struct LexError {
    pub character: char,
    pub position: usize,

    #[source_code]
    source_code: String,

    #[label("this character")]
    bad_bit: SourceSpan,
}

impl LexError {
    pub(crate) fn new(source: &str, character: char, position: usize) -> Self {
        Self {
            character,
            position,
            source_code: source.to_string(),
            bad_bit: (position..position + character.len_utf8()).into(),
        }
    }
}

/// The construct the parser was looking for when it gave up.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Expected {
    Token(TokenKind),
    /// A number, identifier, call, group or prefix operator.
    Primary,
    CommaOrCloseParen,
    EndOfInput,
    /// A literal small enough to be represented as a finite `f64`.
    FiniteNumber,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "{kind}"),
            Expected::Primary => write!(f, "an expression"),
            Expected::CommaOrCloseParen => write!(f, "',' or ')'"),
            Expected::EndOfInput => write!(f, "end of input"),
            Expected::FiniteNumber => write!(f, "a finite number"),
        }
    }
}

#[derive(Debug, Diagnostic, Error)]
#[error("expected {expected}, found {found}")]
#[diagnostic(code = "unexpected_token")]
pub struct ParseError {
    pub expected: Expected,
    pub found: TokenKind,
    pub span: Span,

    #[source_code]
    source_code: String,

    #[label("here")]
    bad_bit: SourceSpan,
}

impl ParseError {
    pub(crate) fn new(source: &str, expected: Expected, found: TokenKind, span: Span) -> Self {
        Self {
            expected,
            found,
            span,
            source_code: source.to_string(),
            bad_bit: span.into(),
        }
    }
}

#[derive(Debug, Diagnostic, Error)]
#[error("expression nests deeper than the limit of {limit}")]
#[diagnostic(
    code = "nesting_too_deep",
    help("split the expression up, or raise `Config::max_depth`")
)]
pub struct DepthError {
    pub limit: usize,

    #[source_code]
    source_code: String,

    #[label("limit exceeded here")]
    bad_bit: SourceSpan,
}

impl DepthError {
    pub(crate) fn new(source: &str, limit: usize, span: Span) -> Self {
        Self {
            limit,
            source_code: source.to_string(),
            bad_bit: span.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Diagnostic, Error)]
pub enum EvalError {
    #[error("undefined variable `{0}`")]
    #[diagnostic(code = "undefined_variable")]
    UndefinedVariable(String),

    #[error("undefined function `{0}`")]
    #[diagnostic(code = "undefined_function")]
    UndefinedFunction(String),

    #[error("`{name}` takes {expected} argument(s), got {actual}")]
    #[diagnostic(code = "arity_mismatch")]
    ArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
}
