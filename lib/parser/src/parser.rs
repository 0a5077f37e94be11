mod expr;
mod printer;

use diagnostics::{Diagnostic, Diagnostics};
pub use expr::{Ast, Expr, ExprArena, ExprId, ExprVisitor, LiteralValue};
pub use printer::AstPrinter;
use scanner::{Token, TokenData, TokenType};

use TokenType::*;

#[derive(Debug, Clone, PartialEq)]
pub struct ParserError<'a> {
    pub error: ParserErrorType,
    pub token: Token<'a>,
}

impl<'a> ParserError<'a> {
    fn new(error: ParserErrorType, token: Token<'a>) -> Self {
        Self { error, token }
    }
}

impl<'a> From<ParserError<'a>> for Diagnostic {
    fn from(error: ParserError<'a>) -> Self {
        let at = match error.token.ty() {
            Eof => "end".to_string(),
            _ => format!("'{}'", error.token.lexeme()),
        };
        Diagnostic::new(error.token.line(), error.error).at(at)
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserErrorType {
    #[error("Expect ')' after expression.")]
    MissingRightParen,
    #[error("Expect ':' after then branch of conditional expression.")]
    MissingColon,
    #[error("Invalid unary plus.")]
    InvalidUnaryPlus,
    #[error("Expected literal.")]
    ExpectedLiteral,
    #[error("Missing left expression.")]
    MissingLeftExpression,
    #[error("Expect end of expression.")]
    ExpectedEnd,
    #[error("Expression nested too deeply (limit is {0}).")]
    TooDeeplyNested(usize),
}

pub type Result<'a, T> = std::result::Result<T, ParserError<'a>>;

/// How many groupings, unary operators and conditional else branches may enclose each other.
pub const MAX_NESTING: usize = 100;

/// Tokens that can only ever follow a left operand.
const BINARY_ONLY: &[TokenType] =
    &[Star, Slash, Comma, Less, LessEqual, Greater, GreaterEqual, EqualEqual, BangEqual];

#[derive(Debug)]
pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    current: usize,
    nesting: usize,
    arena: ExprArena<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token<'a>>) -> Self {
        assert!(
            tokens.last().map(Token::ty) == Some(Eof),
            "Token sequence must be terminated by Eof"
        );
        Self { tokens, current: 0, nesting: 0, arena: ExprArena::new() }
    }

    /// Parses the whole token sequence as a single expression.
    ///
    /// On a syntax error the error is reported to `diagnostics` and no tree is returned; nodes
    /// built so far have already been released by then.
    pub fn parse(mut self, diagnostics: &mut Diagnostics) -> Option<Ast<'a>> {
        let result = self.expression().and_then(|root| {
            self.consume_or_error(Eof, ParserErrorType::ExpectedEnd)?;
            Ok(root)
        });

        match result {
            Ok(root) => {
                let ast = self.arena.finish(root);
                log::debug!("Parsed {} node(s): {}", ast.len(), ast);
                Some(ast)
            }
            Err(e) => {
                log::trace!("Hit error: {:?}, syncing...", e);
                diagnostics.report(e);
                self.synchronize();
                None
            }
        }
    }

    fn expression(&mut self) -> Result<'a, ExprId> {
        if BINARY_ONLY.contains(&self.peek().ty()) {
            return Err(ParserError::new(ParserErrorType::MissingLeftExpression, self.advance()));
        }
        self.sequence()
    }

    fn sequence(&mut self) -> Result<'a, ExprId> {
        self.binary(&[Comma], Self::ternary)
    }

    fn ternary(&mut self) -> Result<'a, ExprId> {
        self.rule(|p| {
            let condition = p.equality()?;

            let Some(question) = p.match_any(&[Question]) else {
                return Ok(condition);
            };

            let then_branch = p.equality()?;
            p.consume_or_error(Colon, ParserErrorType::MissingColon)?;
            let else_branch = p.nested(Self::ternary)?;

            Ok(p.arena.alloc(Expr::Ternary { condition, question, then_branch, else_branch }))
        })
    }

    fn equality(&mut self) -> Result<'a, ExprId> {
        self.binary(&[BangEqual, EqualEqual], Self::comparison)
    }

    fn comparison(&mut self) -> Result<'a, ExprId> {
        self.binary(&[Greater, GreaterEqual, Less, LessEqual], Self::term)
    }

    fn term(&mut self) -> Result<'a, ExprId> {
        self.binary(&[Plus, Minus], Self::factor)
    }

    fn factor(&mut self) -> Result<'a, ExprId> {
        self.binary(&[Star, Slash], Self::unary)
    }

    fn unary(&mut self) -> Result<'a, ExprId> {
        self.rule(|p| {
            if let Some(operator) = p.match_any(&[Bang, Minus]) {
                let right = p.nested(Self::unary)?;
                return Ok(p.arena.alloc(Expr::Unary { operator, right }));
            }

            if let Some(plus) = p.match_any(&[Plus]) {
                return Err(ParserError::new(ParserErrorType::InvalidUnaryPlus, plus));
            }

            p.primary()
        })
    }

    fn primary(&mut self) -> Result<'a, ExprId> {
        self.rule(|p| {
            let token = p.peek().clone();
            let literal = match token.data {
                TokenData::False => LiteralValue::Boolean(false),
                TokenData::True => LiteralValue::Boolean(true),
                TokenData::Nil => LiteralValue::Nil,
                TokenData::Number(n) => LiteralValue::Number(n),
                TokenData::Str(s) => LiteralValue::Str(s),
                TokenData::LeftParen => {
                    p.advance();
                    let expression = p.nested(Self::expression)?;
                    p.consume_or_error(RightParen, ParserErrorType::MissingRightParen)?;
                    return Ok(p.arena.alloc(Expr::Grouping(expression)));
                }
                _ => return Err(ParserError::new(ParserErrorType::ExpectedLiteral, token)),
            };

            p.advance();
            Ok(p.arena.alloc(Expr::Literal(literal)))
        })
    }

    /// One left-associative level: `operand (operator operand)*`.
    fn binary(
        &mut self,
        operators: &[TokenType],
        operand: fn(&mut Self) -> Result<'a, ExprId>,
    ) -> Result<'a, ExprId> {
        self.rule(|p| {
            let mut expr = operand(p)?;

            while let Some(operator) = p.match_any(operators) {
                let right = operand(p)?;
                expr = p.arena.alloc(Expr::Binary { left: expr, operator, right });
            }

            Ok(expr)
        })
    }

    /// Runs one grammar rule, releasing every node it allocated if it fails.
    fn rule(
        &mut self,
        rule: impl FnOnce(&mut Self) -> Result<'a, ExprId>,
    ) -> Result<'a, ExprId> {
        let mark = self.arena.len();
        let result = rule(self);
        if result.is_err() {
            self.arena.rollback(mark);
        }
        result
    }

    /// Runs a rule that recurses into a nested sub-expression, failing once `MAX_NESTING` levels
    /// are open.
    fn nested(&mut self, rule: fn(&mut Self) -> Result<'a, ExprId>) -> Result<'a, ExprId> {
        if self.nesting >= MAX_NESTING {
            return Err(ParserError::new(
                ParserErrorType::TooDeeplyNested(MAX_NESTING),
                self.peek().clone(),
            ));
        }

        self.nesting += 1;
        let result = rule(self);
        self.nesting -= 1;
        result
    }

    /// Skips ahead to the next statement boundary.
    fn synchronize(&mut self) {
        loop {
            let token = self.advance();
            if matches!(token.ty(), Semicolon | Eof) {
                break;
            }

            if matches!(self.peek().ty(), Class | Fun | Var | For | If | While | Print | Return | Eof)
            {
                break;
            }
        }
        log::trace!("Synchronized at {:?}", self.peek().ty());
    }
}

// Helpers
impl<'a> Parser<'a> {
    fn peek(&self) -> &Token<'a> {
        &self.tokens[self.current]
    }

    /// Returns the current token and moves past it, except at `Eof`, which is never consumed.
    fn advance(&mut self) -> Token<'a> {
        let token = self.peek().clone();
        if token.ty() != Eof {
            self.current += 1;
        }
        token
    }

    fn match_any(&mut self, types: &[TokenType]) -> Option<Token<'a>> {
        types.contains(&self.peek().ty()).then(|| self.advance())
    }

    fn consume_or_error(&mut self, ty: TokenType, error: ParserErrorType) -> Result<'a, Token<'a>> {
        match self.match_any(&[ty]) {
            Some(token) => Ok(token),
            None => Err(ParserError::new(error, self.peek().clone())),
        }
    }
}
