use crate::{
    ast::{BinaryOperator, UnaryOperator},
    token::TokenKind,
};

impl BinaryOperator {
    pub(crate) fn from(op: TokenKind) -> Self {
        match op {
            TokenKind::Plus => Self::Add,
            TokenKind::Minus => Self::Sub,
            TokenKind::Star => Self::Mul,
            TokenKind::Slash => Self::Div,
            TokenKind::Caret => Self::Pow,

            _ => unreachable!("not a binary operator: {op:?}"),
        }
    }
}

impl UnaryOperator {
    pub(crate) fn from(op: TokenKind) -> Self {
        match op {
            TokenKind::Plus => Self::Plus,
            TokenKind::Minus => Self::Neg,

            _ => unreachable!("not a unary operator: {op:?}"),
        }
    }
}

impl TokenKind {
    // For easier matching
    pub(crate) fn is_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Plus | TokenKind::Minus | TokenKind::Star | TokenKind::Slash | TokenKind::Caret
        )
    }
}
