//! Infix rendering of a syntax tree.
//!
//! The output reproduces explicit parentheses and nothing else, which is
//! enough to parse back into an equivalent tree.

use std::fmt;
use std::io;

use crate::ast::{self, Expression};

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::BinaryOp(ast::BinaryOp { op, lhs, rhs }) => {
                write!(f, "{lhs}{}{rhs}", op.symbol())
            }
            Expression::UnaryOp(ast::UnaryOp { op, operand }) => {
                write!(f, "{}{operand}", op.symbol())
            }
            Expression::Group(inner) => write!(f, "({inner})"),
            Expression::Call { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Expression::Variable(name) => write!(f, "{name}"),
            Expression::Number(value) => write!(f, "{value}"),
        }
    }
}

/// Writes `root` straight to `out`, piece by piece.
pub fn emit(out: &mut impl io::Write, root: &Expression, newline: bool) -> io::Result<()> {
    emit_expression(out, root)?;
    if newline {
        writeln!(out)?;
    }
    out.flush()
}

fn emit_expression(out: &mut impl io::Write, expression: &Expression) -> io::Result<()> {
    match expression {
        Expression::BinaryOp(ast::BinaryOp { op, lhs, rhs }) => {
            emit_expression(out, lhs)?;
            write!(out, "{}", op.symbol())?;
            emit_expression(out, rhs)
        }
        Expression::UnaryOp(ast::UnaryOp { op, operand }) => {
            write!(out, "{}", op.symbol())?;
            emit_expression(out, operand)
        }
        Expression::Group(inner) => {
            write!(out, "(")?;
            emit_expression(out, inner)?;
            write!(out, ")")
        }
        Expression::Call { name, args } => {
            write!(out, "{name}(")?;
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    write!(out, ", ")?;
                }
                emit_expression(out, arg)?;
            }
            write!(out, ")")
        }
        Expression::Variable(name) => write!(out, "{name}"),
        Expression::Number(value) => write!(out, "{value}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn canonical_form() {
        for (input, expected) in [
            ("x + 2 * f(x,y)", "x+2*f(x, y)"),
            ("( 1 + 2 ) * 3", "(1+2)*3"),
            ("-2 ^ 2", "-2^2"),
            ("2^-2", "2^-2"),
            ("1 - -x", "1--x"),
            ("g()", "g()"),
            ("1.50", "1.5"),
            ("007", "7"),
            ("10.0", "10"),
        ] {
            assert_eq!(parse(input).unwrap().to_string(), expected, "when rendering '{input}'");
        }
    }

    #[test]
    fn emit_matches_display() {
        for input in ["x+2 * f(x, y)", "-(a^b)/c", "h(1, (2), -3)"] {
            let root = parse(input).unwrap();

            let mut out = Vec::new();
            emit(&mut out, &root, false).unwrap();
            assert_eq!(String::from_utf8(out).unwrap(), root.to_string());

            let mut out = Vec::new();
            emit(&mut out, &root, true).unwrap();
            assert_eq!(String::from_utf8(out).unwrap(), format!("{root}\n"));
        }
    }
}
