use std::f64::consts;

/// A function every expression can call, whatever the caller supplies.
#[derive(Debug, Copy, Clone)]
pub struct Builtin {
    pub name: &'static str,
    pub arity: usize,
    function: fn(&[f64]) -> f64,
}

impl Builtin {
    /// Applies the function. The caller has already checked the arity.
    pub(crate) fn call(&self, args: &[f64]) -> f64 {
        (self.function)(args)
    }
}

pub const CONSTANTS: &[(&str, f64)] = &[("pi", consts::PI), ("e", consts::E)];

macro_rules! unary {
    ($name:literal, $method:ident) => {
        Builtin {
            name: $name,
            arity: 1,
            function: |args: &[f64]| args[0].$method(),
        }
    };
}

pub const FUNCTIONS: &[Builtin] = &[
    unary!("sin", sin),
    unary!("cos", cos),
    unary!("tan", tan),
    unary!("asin", asin),
    unary!("acos", acos),
    unary!("atan", atan),
    unary!("log", ln),
    unary!("sqrt", sqrt),
    unary!("exp", exp),
    unary!("abs", abs),
    unary!("ceil", ceil),
    unary!("floor", floor),
    unary!("round", round),
    Builtin {
        name: "sgn",
        arity: 1,
        function: sgn,
    },
    Builtin {
        name: "pow",
        arity: 2,
        function: |args: &[f64]| args[0].powf(args[1]),
    },
];

pub fn lookup_constant(name: &str) -> Option<f64> {
    CONSTANTS
        .iter()
        .find(|(constant, _)| *constant == name)
        .map(|(_, value)| *value)
}

pub fn lookup_function(name: &str) -> Option<&'static Builtin> {
    FUNCTIONS.iter().find(|builtin| builtin.name == name)
}

// Unlike `f64::signum`, zero (and NaN) maps to zero.
fn sgn(args: &[f64]) -> f64 {
    let value = args[0];
    if value < 0.0 {
        -1.0
    } else if value > 0.0 {
        1.0
    } else {
        0.0
    }
}
