use log::debug;

use crate::ast::{self, BinaryOperator, UnaryOperator};
use crate::config::Config;
use crate::error::{DepthError, Expected, ParseError};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

/// A parsed subtree and its height.
type Subtree = (ast::Expression, usize);

pub struct Parser<'source> {
    source: &'source str,
    lexer: Lexer<'source>,
    max_depth: usize,
    depth: usize,
}

/// Parses `source` with the default [`Config`].
pub fn parse(source: &str) -> crate::Result<ast::Expression> {
    Parser::new(source).parse()
}

impl<'source> Parser<'source> {
    pub fn new(source: &'source str) -> Self {
        Self::with_config(source, &Config::default())
    }

    pub fn with_config(source: &'source str, config: &Config) -> Self {
        Self {
            source,
            lexer: Lexer::new(source),
            max_depth: config.max_depth,
            depth: 0,
        }
    }

    pub fn parse(&mut self) -> crate::Result<ast::Expression> {
        let (expression, height) = self.expect_expression()?;

        // Ensure we've consumed all tokens
        let token = self.peek()?;
        if token.kind != TokenKind::End {
            return Err(self.unexpected(token, Expected::EndOfInput));
        }

        debug!("parsed `{}` into a tree of height {height}", self.source);
        Ok(expression)
    }

    fn peek(&mut self) -> crate::Result<Token<'source>> {
        let token = self.lexer.peek()?.copied();
        Ok(token.unwrap_or_else(|| self.lexer.end_token()))
    }

    /// Consumes the token returned by the last [`Parser::peek`].
    fn advance(&mut self) {
        self.lexer.next();
    }

    fn unexpected(&self, token: Token<'_>, expected: Expected) -> crate::Error {
        ParseError::new(self.source, expected, token.kind, token.span).into()
    }

    fn too_deep(&self, token: Token<'_>) -> crate::Error {
        debug!(
            "`{}` nests deeper than {} levels at byte {}",
            self.source, self.max_depth, token.span.start
        );
        DepthError::new(self.source, self.max_depth, token.span).into()
    }

    fn check_height(&self, height: usize, token: Token<'_>) -> crate::Result<()> {
        // The frames above this one each contribute one ancestor node
        if self.depth.saturating_sub(1) + height > self.max_depth {
            return Err(self.too_deep(token));
        }

        Ok(())
    }

    fn expect_expression(&mut self) -> crate::Result<Subtree> {
        self.expect_expression_within(0)
    }

    fn expect_expression_within(&mut self, min_bp: u8) -> crate::Result<Subtree> {
        if self.depth >= self.max_depth {
            let token = self.peek()?;
            return Err(self.too_deep(token));
        }

        self.depth += 1;
        let result = self.parse_expression_within(min_bp);
        self.depth -= 1;

        result
    }

    fn parse_expression_within(&mut self, min_bp: u8) -> crate::Result<Subtree> {
        let token = self.peek()?;
        let (mut lhs, mut height) = match token.kind {
            TokenKind::Number => {
                self.advance();
                let value: f64 = token
                    .lexeme
                    .parse()
                    .map_err(|_| self.unexpected(token, Expected::Primary))?;
                // Overflowing literals would render as `inf`, which reads back as a name
                if !value.is_finite() {
                    return Err(self.unexpected(token, Expected::FiniteNumber));
                }
                (ast::Expression::Number(value), 1)
            }
            TokenKind::Identifier => {
                self.advance();
                self.parse_identifier(token)?
            }
            TokenKind::OpenParen => {
                self.advance();
                let (inner, height) = self.expect_expression()?;
                self.lexer.expect(TokenKind::CloseParen)?;
                (ast::Expression::Group(Box::new(inner)), height + 1)
            }
            TokenKind::Plus | TokenKind::Minus => {
                self.advance();
                let ((), r_bp) = prefix_binding_power(token.kind);
                let (operand, height) = self.expect_expression_within(r_bp)?;
                let unary = ast::Expression::UnaryOp(ast::UnaryOp {
                    op: UnaryOperator::from(token.kind),
                    operand: Box::new(operand),
                });
                (unary, height + 1)
            }

            _ => return Err(self.unexpected(token, Expected::Primary)),
        };
        self.check_height(height, token)?;

        loop {
            let op = self.peek()?;
            if !op.kind.is_operator() {
                break;
            }

            let Some((l_bp, r_bp)) = infix_binding_power(op.kind) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }

            self.advance();
            let (rhs, rhs_height) = self.expect_expression_within(r_bp)?;

            height = 1 + height.max(rhs_height);
            lhs = ast::Expression::BinaryOp(ast::BinaryOp {
                op: BinaryOperator::from(op.kind),
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            });
            self.check_height(height, op)?;
        }

        Ok((lhs, height))
    }

    /// A bare name is a variable; a name directly followed by `(` is a call.
    fn parse_identifier(&mut self, name: Token<'source>) -> crate::Result<Subtree> {
        if self.peek()?.kind != TokenKind::OpenParen {
            return Ok((ast::Expression::Variable(name.lexeme.to_string()), 1));
        }

        self.advance();
        let (args, height) = self.parse_args()?;

        Ok((
            ast::Expression::Call {
                name: name.lexeme.to_string(),
                args,
            },
            height + 1,
        ))
    }

    fn parse_args(&mut self) -> crate::Result<(Vec<ast::Expression>, usize)> {
        let mut args = Vec::new();
        let mut height = 0;

        if self.peek()?.kind == TokenKind::CloseParen {
            self.advance();
            return Ok((args, height));
        }

        loop {
            let (arg, arg_height) = self.expect_expression()?;
            height = height.max(arg_height);
            args.push(arg);

            let token = self.peek()?;
            match token.kind {
                TokenKind::Comma => self.advance(),
                TokenKind::CloseParen => {
                    self.advance();
                    break;
                }
                _ => return Err(self.unexpected(token, Expected::CommaOrCloseParen)),
            }
        }

        Ok((args, height))
    }
}

// Loosest to tightest: `+ -`, `* /`, prefix `+ -`, `^`
fn prefix_binding_power(kind: TokenKind) -> ((), u8) {
    match kind {
        TokenKind::Plus | TokenKind::Minus => ((), 5),
        _ => unreachable!("prefix_binding_power with {kind:?}"),
    }
}

fn infix_binding_power(kind: TokenKind) -> Option<(u8, u8)> {
    Some(match kind {
        TokenKind::Plus | TokenKind::Minus => (1, 2),
        TokenKind::Star | TokenKind::Slash => (3, 4),
        TokenKind::Caret => (7, 6), // Right associative

        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expression;
    use crate::Error;

    fn num(value: f64) -> Expression {
        Expression::Number(value)
    }

    fn var(name: &str) -> Expression {
        Expression::Variable(name.to_string())
    }

    fn bin(op: BinaryOperator, lhs: Expression, rhs: Expression) -> Expression {
        Expression::BinaryOp(ast::BinaryOp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    fn neg(operand: Expression) -> Expression {
        Expression::UnaryOp(ast::UnaryOp {
            op: UnaryOperator::Neg,
            operand: Box::new(operand),
        })
    }

    fn group(inner: Expression) -> Expression {
        Expression::Group(Box::new(inner))
    }

    fn call(name: &str, args: Vec<Expression>) -> Expression {
        Expression::Call {
            name: name.to_string(),
            args,
        }
    }

    fn parse_error(input: &str) -> ParseError {
        match parse(input) {
            Err(Error::Parse(e)) => e,
            other => panic!("expected a parse error for '{input}', got {other:?}"),
        }
    }

    #[test]
    fn precedence() {
        use BinaryOperator::*;

        assert_eq!(
            parse("1+2*3").unwrap(),
            bin(Add, num(1.0), bin(Mul, num(2.0), num(3.0)))
        );
        assert_eq!(
            parse("(1+2)*3").unwrap(),
            bin(Mul, group(bin(Add, num(1.0), num(2.0))), num(3.0))
        );
        assert_eq!(
            parse("1-2-3").unwrap(),
            bin(Sub, bin(Sub, num(1.0), num(2.0)), num(3.0))
        );
        assert_eq!(
            parse("8/4*2").unwrap(),
            bin(Mul, bin(Div, num(8.0), num(4.0)), num(2.0))
        );
    }

    #[test]
    fn power_is_right_associative() {
        use BinaryOperator::Pow;

        assert_eq!(
            parse("2^3^2").unwrap(),
            bin(Pow, num(2.0), bin(Pow, num(3.0), num(2.0)))
        );
    }

    #[test]
    fn prefix_operators() {
        use BinaryOperator::*;

        assert_eq!(
            parse("-2^2").unwrap(),
            neg(bin(Pow, num(2.0), num(2.0)))
        );
        assert_eq!(parse("2^-2").unwrap(), bin(Pow, num(2.0), neg(num(2.0))));
        assert_eq!(parse("-2*3").unwrap(), bin(Mul, neg(num(2.0)), num(3.0)));
        assert_eq!(parse("1--x").unwrap(), bin(Sub, num(1.0), neg(var("x"))));
        assert_eq!(
            parse("+-1").unwrap(),
            Expression::UnaryOp(ast::UnaryOp {
                op: UnaryOperator::Plus,
                operand: Box::new(neg(num(1.0))),
            })
        );
    }

    #[test]
    fn identifiers() {
        assert_eq!(parse("x").unwrap(), var("x"));
        assert_eq!(parse("f()").unwrap(), call("f", vec![]));
        assert_eq!(parse("f ( x )").unwrap(), call("f", vec![var("x")]));
        assert_eq!(
            parse("max(1, g(y), 2+3)").unwrap(),
            call(
                "max",
                vec![
                    num(1.0),
                    call("g", vec![var("y")]),
                    bin(BinaryOperator::Add, num(2.0), num(3.0)),
                ]
            )
        );
    }

    #[test]
    fn unterminated_group() {
        let error = parse_error("(1+2");
        assert_eq!(error.expected, Expected::Token(TokenKind::CloseParen));
        assert_eq!(error.found, TokenKind::End);
    }

    #[test]
    fn missing_operand() {
        let error = parse_error("1+");
        assert_eq!(error.expected, Expected::Primary);
        assert_eq!(error.found, TokenKind::End);

        let error = parse_error("*2");
        assert_eq!(error.expected, Expected::Primary);
        assert_eq!(error.found, TokenKind::Star);
        assert_eq!(error.span.start, 0);

        assert_eq!(parse_error("").found, TokenKind::End);
        assert_eq!(parse_error("()").found, TokenKind::CloseParen);
    }

    #[test]
    fn argument_lists() {
        let error = parse_error("f(1,)");
        assert_eq!(error.expected, Expected::Primary);
        assert_eq!(error.found, TokenKind::CloseParen);

        let error = parse_error("f(,1)");
        assert_eq!(error.expected, Expected::Primary);
        assert_eq!(error.found, TokenKind::Comma);

        let error = parse_error("f(1 2)");
        assert_eq!(error.expected, Expected::CommaOrCloseParen);
        assert_eq!(error.found, TokenKind::Number);

        let error = parse_error("f(1");
        assert_eq!(error.expected, Expected::CommaOrCloseParen);
        assert_eq!(error.found, TokenKind::End);
    }

    #[test]
    fn trailing_tokens() {
        let error = parse_error("1 2");
        assert_eq!(error.expected, Expected::EndOfInput);
        assert_eq!(error.found, TokenKind::Number);
        assert_eq!(error.span.start, 2);

        assert_eq!(parse_error("(1))").found, TokenKind::CloseParen);
        assert_eq!(parse_error("x y").found, TokenKind::Identifier);
    }

    #[test]
    fn overflowing_literal() {
        let input = format!("2*1{}", "0".repeat(400));
        let error = parse_error(&input);
        assert_eq!(error.expected, Expected::FiniteNumber);
        assert_eq!(error.found, TokenKind::Number);
        assert_eq!(error.span.start, 2);
        assert_eq!(error.span.end, input.len());

        assert_eq!(parse(&format!("1{}", "0".repeat(300))).unwrap(), num(1e300));
    }

    #[test]
    fn lex_errors_surface() {
        match parse("1 + @") {
            Err(Error::Lex(e)) => {
                assert_eq!(e.character, '@');
                assert_eq!(e.position, 4);
            }
            other => panic!("expected a lex error, got {other:?}"),
        }
    }

    #[test]
    fn depth_limit() {
        let config = Config::default().with_max_depth(3);

        assert!(Parser::with_config("((1))", &config).parse().is_ok());
        assert!(Parser::with_config("1+2+3", &config).parse().is_ok());
        assert!(Parser::with_config("--x", &config).parse().is_ok());

        for input in ["(((1)))", "1+2+3+4", "---x", "f(g(h(1)))", "2^2^2^2"] {
            match Parser::with_config(input, &config).parse() {
                Err(Error::Depth(e)) => assert_eq!(e.limit, 3, "when parsing '{input}'"),
                other => panic!("expected a depth error for '{input}', got {other:?}"),
            }
        }
    }

    #[test]
    fn deep_input_does_not_overflow() {
        let input = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
        assert!(matches!(parse(&input), Err(Error::Depth(_))));

        let input = format!("1{}", "+1".repeat(100_000));
        assert!(matches!(parse(&input), Err(Error::Depth(_))));
    }
}
