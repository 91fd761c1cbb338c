// Every child node is owned by exactly one parent, so a whole tree is released
// together with its root and can be shared read-only between threads.

#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    BinaryOp(BinaryOp),
    UnaryOp(UnaryOp),
    /// Explicit parentheses. Evaluates to its contents, kept for rendering.
    Group(Box<Expression>),
    Call { name: String, args: Vec<Expression> },
    Variable(String),
    Number(f64),
}

#[derive(Debug, PartialEq, Clone)]
pub struct BinaryOp {
    pub op: BinaryOperator,
    pub lhs: Box<Expression>,
    pub rhs: Box<Expression>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct UnaryOp {
    pub op: UnaryOperator,
    pub operand: Box<Expression>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Neg,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Pow => "^",
        }
    }
}

impl UnaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Plus => "+",
            UnaryOperator::Neg => "-",
        }
    }
}
