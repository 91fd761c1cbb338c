use std::{fmt, io, str::FromStr};

use crate::{
    ast,
    config::Config,
    error::EvalError,
    eval::{self, Functions, Variables},
    parser::Parser,
    render,
};

/// An expression parsed once and evaluated any number of times.
///
/// ```
/// use expr_interpreter::{Expr, Functions, Variables};
///
/// let expr = Expr::new("x + 2 * f(x, y)").unwrap();
///
/// let variables = Variables::from([("x".to_string(), 3.0), ("y".to_string(), 4.0)]);
/// let mut functions = Functions::new();
/// functions.insert("f".to_string(), Box::new(|args: &[f64]| args[0] + args[1]));
///
/// assert_eq!(expr.eval(&variables, &functions), Ok(17.0));
/// assert_eq!(expr.to_string(), "x+2*f(x, y)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    source: String,
    root: ast::Expression,
}

impl Expr {
    pub fn new(source: &str) -> crate::Result<Self> {
        Self::with_config(source, &Config::default())
    }

    pub fn with_config(source: &str, config: &Config) -> crate::Result<Self> {
        let root = Parser::with_config(source, config).parse()?;

        Ok(Self {
            source: source.to_string(),
            root,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &ast::Expression {
        &self.root
    }

    pub fn eval(&self, variables: &Variables, functions: &Functions) -> Result<f64, EvalError> {
        eval::evaluate(&self.root, variables, functions)
    }

    /// Prints the canonical form to stdout, followed by a newline.
    pub fn print(&self) -> io::Result<()> {
        render::emit(&mut io::stdout().lock(), &self.root, true)
    }

    pub fn write_to(&self, out: &mut impl io::Write) -> io::Result<()> {
        render::emit(out, &self.root, false)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root, f)
    }
}

impl FromStr for Expr {
    type Err = crate::Error;

    fn from_str(source: &str) -> crate::Result<Self> {
        Self::new(source)
    }
}
