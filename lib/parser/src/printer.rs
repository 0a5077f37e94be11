use itertools::Itertools;
use scanner::Token;

use crate::{Ast, ExprId, ExprVisitor, LiteralValue};

/// Renders a tree in prefix notation, e.g. `(* (- 123.000) (group 45.670))`.
#[derive(Debug, Default)]
pub struct AstPrinter;

impl AstPrinter {
    pub fn print(ast: &Ast) -> String {
        ast.accept(ast.root(), &mut AstPrinter)
    }

    fn parenthesize(&mut self, ast: &Ast, name: &str, exprs: &[ExprId]) -> String {
        format!("({} {})", name, exprs.iter().map(|expr| ast.accept(*expr, self)).join(" "))
    }
}

impl<'a> ExprVisitor<'a> for AstPrinter {
    type Output = String;

    fn visit_literal(&mut self, _: &Ast<'a>, value: &LiteralValue<'a>) -> String {
        match value {
            LiteralValue::Number(n) => format!("{:.3}", n),
            LiteralValue::Str(s) => s.to_string(),
            LiteralValue::Boolean(b) => b.to_string(),
            LiteralValue::Nil => "nil".to_string(),
        }
    }

    fn visit_grouping(&mut self, ast: &Ast<'a>, expression: ExprId) -> String {
        self.parenthesize(ast, "group", &[expression])
    }

    fn visit_unary(&mut self, ast: &Ast<'a>, operator: &Token<'a>, right: ExprId) -> String {
        self.parenthesize(ast, operator.lexeme(), &[right])
    }

    fn visit_binary(
        &mut self,
        ast: &Ast<'a>,
        left: ExprId,
        operator: &Token<'a>,
        right: ExprId,
    ) -> String {
        let (leftmost, mut operations) = ast.binary_chain(left);
        operations.push((operator, right));

        let mut out = String::new();
        for (operator, _) in operations.iter().rev() {
            out.push('(');
            out.push_str(operator.lexeme());
            out.push(' ');
        }
        out.push_str(&ast.accept(leftmost, self));
        for (_, right) in &operations {
            out.push(' ');
            out.push_str(&ast.accept(*right, self));
            out.push(')');
        }
        out
    }

    fn visit_ternary(
        &mut self,
        ast: &Ast<'a>,
        condition: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    ) -> String {
        self.parenthesize(ast, "?:", &[condition, then_branch, else_branch])
    }
}
