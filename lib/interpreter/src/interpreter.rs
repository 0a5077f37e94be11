use std::io::Write;

use cursor::Line;
pub use diagnostics::{Diagnostic, Diagnostics};
use parser::{Ast, Expr, ExprId, Parser};
use scanner::{Scanner, Token, TokenType};

mod value;
pub use value::Value;

use TokenType::{
    Bang, BangEqual, Comma, EqualEqual, Greater, GreaterEqual, Less, LessEqual, Minus, Plus,
    Slash, Star,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeErrorType {
    #[error("Operands of '+' must be two numbers or two strings, got {0} and {1}.")]
    InvalidAddOperands(&'static str, &'static str),
    #[error("Operands of '{0}' must be numbers, got {1} and {2}.")]
    NonNumericOperands(String, &'static str, &'static str),
    #[error("Operand of unary '-' must be a number, got {0}.")]
    NonNumericNegation(&'static str),
    #[error("Operand of '!' must be a boolean, got {0}.")]
    NonBooleanNot(&'static str),
    #[error("Condition of '?:' must be a boolean, got {0}.")]
    NonBooleanCondition(&'static str),
    #[error("Unsupported operator '{0}'.")]
    UnsupportedOperator(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("[line {line}] Error: {error}")]
pub struct RuntimeError {
    pub error: RuntimeErrorType,
    pub line: Line,
}

impl RuntimeError {
    fn new(error: RuntimeErrorType, operator: &Token) -> Self {
        Self { error, line: operator.line() }
    }
}

impl From<RuntimeError> for Diagnostic {
    fn from(value: RuntimeError) -> Self {
        Diagnostic::new(value.line, value.error)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InterpretError {
    #[error("{0}")]
    CompileError(Diagnostics),
    #[error("{0}")]
    RuntimeError(Diagnostics),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Write the parsed tree before the value.
    pub print_ast: bool,
    /// Maximum number of tokens a single input may scan to.
    pub max_tokens: Option<usize>,
}

#[derive(Debug, Default)]
pub struct Interpreter {
    config: Config,
}

impl Interpreter {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Scans, parses and evaluates `source`, writing the result (and the tree, if configured) to
    /// `output`.
    ///
    /// Every run gets its own diagnostics, which are handed back inside the error.
    pub fn run_source(&self, source: &str, output: &mut impl Write) -> Result<Value, InterpretError> {
        let mut diagnostics = Diagnostics::new();

        let tokens = Scanner::new(source)
            .with_token_limit(self.config.max_tokens)
            .scan_tokens(&mut diagnostics);
        if diagnostics.had_error() {
            return Err(InterpretError::CompileError(diagnostics));
        }

        let Some(ast) = Parser::new(tokens).parse(&mut diagnostics) else {
            return Err(InterpretError::CompileError(diagnostics));
        };

        if self.config.print_ast {
            writeln!(output, "{}", ast)?;
        }

        match self.evaluate(&ast) {
            Ok(value) => {
                writeln!(output, "{}", value)?;
                Ok(value)
            }
            Err(e) => {
                diagnostics.report(e);
                Err(InterpretError::RuntimeError(diagnostics))
            }
        }
    }

    pub fn evaluate(&self, ast: &Ast) -> Result<Value, RuntimeError> {
        self.evaluate_expr(ast, ast.root())
    }

    fn evaluate_expr(&self, ast: &Ast, id: ExprId) -> Result<Value, RuntimeError> {
        let value: Result<Value, RuntimeError> = match ast.get(id) {
            Expr::Literal(literal) => Ok(literal.into()),

            Expr::Grouping(expression) => self.evaluate_expr(ast, *expression),

            Expr::Unary { operator, right } => {
                let right = self.evaluate_expr(ast, *right)?;
                unary(operator, right)
            }

            Expr::Binary { .. } => {
                let (leftmost, operations) = ast.binary_chain(id);
                let mut value = self.evaluate_expr(ast, leftmost)?;
                for (operator, right) in operations {
                    let right = self.evaluate_expr(ast, right)?;
                    value = binary(operator, value, right)?;
                }
                Ok(value)
            }

            // Only the selected branch is ever evaluated
            Expr::Ternary { condition, question, then_branch, else_branch } => {
                match self.evaluate_expr(ast, *condition)? {
                    Value::Bool(true) => self.evaluate_expr(ast, *then_branch),
                    Value::Bool(false) => self.evaluate_expr(ast, *else_branch),
                    v => Err(RuntimeError::new(
                        RuntimeErrorType::NonBooleanCondition(v.type_name()),
                        question,
                    )),
                }
            }
        };

        log::trace!("Evaluated {:?}: {:?}", id, value);
        value
    }
}

fn unary(operator: &Token, right: Value) -> Result<Value, RuntimeError> {
    match (operator.ty(), right) {
        (Minus, Value::Number(n)) => Ok((-n).into()),
        (Minus, v) => {
            Err(RuntimeError::new(RuntimeErrorType::NonNumericNegation(v.type_name()), operator))
        }
        (Bang, Value::Bool(b)) => Ok((!b).into()),
        (Bang, v) => Err(RuntimeError::new(RuntimeErrorType::NonBooleanNot(v.type_name()), operator)),
        _ => Err(RuntimeError::new(
            RuntimeErrorType::UnsupportedOperator(operator.lexeme().to_string()),
            operator,
        )),
    }
}

fn binary(operator: &Token, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match (operator.ty(), left, right) {
        (Comma, _, right) => Ok(right),

        (EqualEqual, l, r) => Ok(l.equals(&r).into()),
        (BangEqual, l, r) => Ok((!l.equals(&r)).into()),

        (Plus, Value::Number(l), Value::Number(r)) => Ok((l + r).into()),
        (Plus, Value::Str(l), Value::Str(r)) => Ok((l + &r).into()),
        (Plus, l, r) => Err(RuntimeError::new(
            RuntimeErrorType::InvalidAddOperands(l.type_name(), r.type_name()),
            operator,
        )),

        (Minus, Value::Number(l), Value::Number(r)) => Ok((l - r).into()),
        (Star, Value::Number(l), Value::Number(r)) => Ok((l * r).into()),
        (Slash, Value::Number(l), Value::Number(r)) => Ok((l / r).into()),

        (Greater, Value::Number(l), Value::Number(r)) => Ok((l > r).into()),
        (GreaterEqual, Value::Number(l), Value::Number(r)) => Ok((l >= r).into()),
        (Less, Value::Number(l), Value::Number(r)) => Ok((l < r).into()),
        (LessEqual, Value::Number(l), Value::Number(r)) => Ok((l <= r).into()),

        (Minus | Star | Slash | Greater | GreaterEqual | Less | LessEqual, l, r) => {
            Err(RuntimeError::new(
                RuntimeErrorType::NonNumericOperands(
                    operator.lexeme().to_string(),
                    l.type_name(),
                    r.type_name(),
                ),
                operator,
            ))
        }

        _ => Err(RuntimeError::new(
            RuntimeErrorType::UnsupportedOperator(operator.lexeme().to_string()),
            operator,
        )),
    }
}
