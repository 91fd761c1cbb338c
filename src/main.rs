use clap::Parser;
use expr_interpreter::{
    config::DEFAULT_MAX_DEPTH, lexer, parser, token::TokenKind, Config, Expr, Functions,
    Variables,
};
use miette::LabeledSpan;

const DEMO_EXPRESSION: &str = "x+2 * f(x, y)";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Input {
    /// The expression to evaluate. Runs `x+2 * f(x, y)` with x=3, y=4 and f=sum when omitted.
    expression: Option<String>,

    /// Bind a variable, written as `name=value`. May be repeated.
    #[clap(long = "var", value_parser = parse_binding)]
    vars: Vec<(String, f64)>,

    /// Maximum nesting depth of the expression.
    #[clap(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Debug the lexer, printing out each token. Does not parse or evaluate the expression.
    #[clap(long, default_value = "false")]
    debug_lexer: bool,

    /// Debug the parser, printing out the AST. Does not evaluate the expression.
    #[clap(long, default_value = "false")]
    debug_parser: bool,
}

fn parse_binding(binding: &str) -> Result<(String, f64), String> {
    let (name, value) = binding
        .split_once('=')
        .ok_or_else(|| format!("expected `name=value`, got `{binding}`"))?;
    let value = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid value for `{name}`: {e}"))?;

    Ok((name.trim().to_string(), value))
}

fn demo() -> (String, Variables, Functions) {
    let variables = Variables::from([("x".to_string(), 3.0), ("y".to_string(), 4.0)]);
    let mut functions = Functions::new();
    functions.insert(
        "f".to_string(),
        Box::new(|args: &[f64]| args.iter().sum::<f64>()),
    );

    (DEMO_EXPRESSION.to_string(), variables, functions)
}

fn main() {
    let Input {
        expression,
        vars,
        max_depth,
        debug_lexer,
        debug_parser,
    } = Input::parse();

    let (source, mut variables, functions) = match expression {
        Some(source) => (source, Variables::new(), Functions::new()),
        None => demo(),
    };
    variables.extend(vars);

    if debug_lexer {
        run_debug_lexer(&source);
        return;
    }

    let config = Config::default().with_max_depth(max_depth);

    if debug_parser {
        run_debug_parser(&source, &config);
        return;
    }

    let expr = match Expr::with_config(&source, &config) {
        Ok(expr) => expr,
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            std::process::exit(1);
        }
    };

    if let Err(e) = expr.print() {
        eprintln!("failed to write to stdout: {e}");
        std::process::exit(1);
    }

    match expr.eval(&variables, &functions) {
        Ok(value) => println!("{value}"),
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            std::process::exit(1);
        }
    }
}

fn run_debug_lexer(source: &str) {
    for token in lexer::Lexer::new(source) {
        match token {
            Ok(t) => {
                let kind = match t.kind {
                    TokenKind::Identifier | TokenKind::Number => {
                        format!("{:?}(\"{}\")", t.kind, t.lexeme)
                    }
                    _ => format!("{:?}", t.kind),
                };
                let diag = miette::miette!(
                    labels = vec![LabeledSpan::at(t.span.start..t.span.end, kind)],
                    severity = miette::Severity::Advice,
                    "found a token",
                )
                .with_source_code(source.to_string());
                eprintln!("{:?}", diag);
            }
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(e));
                std::process::exit(1);
            }
        }
    }
}

fn run_debug_parser(source: &str, config: &Config) {
    let ast = match parser::Parser::with_config(source, config).parse() {
        Ok(ast) => ast,
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            std::process::exit(1);
        }
    };

    dbg!(ast);
}
