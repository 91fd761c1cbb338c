pub mod ast;
pub mod builtins;
pub mod config;
pub mod error;
pub mod eval;
mod expr;
mod helpers;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod token;

pub use config::Config;
pub use error::{DepthError, Error, EvalError, Expected, LexError, ParseError};
pub use eval::{Function, Functions, Variables};
pub use expr::Expr;

pub type Result<T, E = Error> = std::result::Result<T, E>;
