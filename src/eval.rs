use std::collections::HashMap;

use log::trace;

use crate::ast::{self, BinaryOperator, Expression, UnaryOperator};
use crate::builtins;
use crate::error::EvalError;

/// A caller-supplied function. It receives the evaluated arguments in order.
pub type Function = dyn Fn(&[f64]) -> f64 + Send + Sync;

pub type Variables = HashMap<String, f64>;
pub type Functions = HashMap<String, Box<Function>>;

/// Walks `root` and computes its value.
///
/// Names resolve against the built-in constants and functions first, and
/// only then against `variables` and `functions`. Arguments and operands are
/// evaluated left to right.
pub fn evaluate(
    root: &Expression,
    variables: &Variables,
    functions: &Functions,
) -> Result<f64, EvalError> {
    Evaluator {
        variables,
        functions,
    }
    .eval_expression(root)
}

struct Evaluator<'env> {
    variables: &'env Variables,
    functions: &'env Functions,
}

impl Evaluator<'_> {
    fn eval_expression(&self, expression: &Expression) -> Result<f64, EvalError> {
        Ok(match expression {
            Expression::BinaryOp(ast::BinaryOp { op, lhs, rhs }) => {
                let lhs = self.eval_expression(lhs)?;
                let rhs = self.eval_expression(rhs)?;
                match op {
                    BinaryOperator::Add => lhs + rhs,
                    BinaryOperator::Sub => lhs - rhs,
                    BinaryOperator::Mul => lhs * rhs,
                    BinaryOperator::Div => lhs / rhs,
                    BinaryOperator::Pow => lhs.powf(rhs),
                }
            }
            Expression::UnaryOp(ast::UnaryOp { op, operand }) => {
                let operand = self.eval_expression(operand)?;
                match op {
                    UnaryOperator::Plus => operand,
                    UnaryOperator::Neg => -operand,
                }
            }
            Expression::Group(inner) => self.eval_expression(inner)?,
            Expression::Call { name, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.eval_expression(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                self.call(name, &args)?
            }
            Expression::Variable(name) => self.lookup(name)?,
            Expression::Number(value) => *value,
        })
    }

    fn lookup(&self, name: &str) -> Result<f64, EvalError> {
        if let Some(value) = builtins::lookup_constant(name) {
            return Ok(value);
        }

        match self.variables.get(name) {
            Some(value) => {
                trace!("variable `{name}` = {value}");
                Ok(*value)
            }
            None => Err(EvalError::UndefinedVariable(name.to_string())),
        }
    }

    fn call(&self, name: &str, args: &[f64]) -> Result<f64, EvalError> {
        if let Some(builtin) = builtins::lookup_function(name) {
            if args.len() != builtin.arity {
                return Err(EvalError::ArityMismatch {
                    name: name.to_string(),
                    expected: builtin.arity,
                    actual: args.len(),
                });
            }

            return Ok(builtin.call(args));
        }

        match self.functions.get(name) {
            Some(function) => {
                trace!("calling `{name}` with {args:?}");
                Ok(function(args))
            }
            None => Err(EvalError::UndefinedFunction(name.to_string())),
        }
    }
}
