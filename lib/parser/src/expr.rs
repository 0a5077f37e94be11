use std::fmt::{self, Display, Formatter};

use scanner::Token;

use crate::AstPrinter;

/// Index of a node inside the arena of the tree it was allocated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExprId(usize);

#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'a> {
    Literal(LiteralValue<'a>),
    Grouping(ExprId),
    Unary { operator: Token<'a>, right: ExprId },
    Binary { left: ExprId, operator: Token<'a>, right: ExprId },
    Ternary { condition: ExprId, question: Token<'a>, then_branch: ExprId, else_branch: ExprId },
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue<'a> {
    Number(f64),
    Str(&'a str),
    Boolean(bool),
    Nil,
}

/// Node storage while a tree is being built.
///
/// Children are always allocated before their parent, so truncating the arena back to an earlier
/// length releases exactly the nodes allocated since then.
#[derive(Debug, Default)]
pub struct ExprArena<'a> {
    nodes: Vec<Expr<'a>>,
}

impl<'a> ExprArena<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, expr: Expr<'a>) -> ExprId {
        self.nodes.push(expr);
        ExprId(self.nodes.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn rollback(&mut self, len: usize) {
        log::trace!("Releasing {} node(s)", self.nodes.len().saturating_sub(len));
        self.nodes.truncate(len);
    }

    pub fn finish(self, root: ExprId) -> Ast<'a> {
        assert!(root.0 < self.nodes.len());
        Ast { nodes: self.nodes, root }
    }
}

/// A complete expression tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Ast<'a> {
    nodes: Vec<Expr<'a>>,
    root: ExprId,
}

impl<'a> Ast<'a> {
    pub fn root(&self) -> ExprId {
        self.root
    }

    pub fn get(&self, id: ExprId) -> &Expr<'a> {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Splits a chain of binary nodes into its leftmost operand and the `(operator, right)` pairs
    /// applied to it, innermost first. `1 - 2 - 3` yields `1` and `[(-, 2), (-, 3)]`.
    ///
    /// Left-associative chains are as deep as they are long, so passes walk them with this
    /// instead of recursing into every left operand.
    pub fn binary_chain(&self, id: ExprId) -> (ExprId, Vec<(&Token<'a>, ExprId)>) {
        let mut operations = Vec::new();
        let mut leftmost = id;
        while let Expr::Binary { left, operator, right } = self.get(leftmost) {
            operations.push((operator, *right));
            leftmost = *left;
        }
        operations.reverse();
        (leftmost, operations)
    }

    /// Hands the node `id` to the matching method of `visitor`.
    pub fn accept<V: ExprVisitor<'a>>(&self, id: ExprId, visitor: &mut V) -> V::Output {
        match self.get(id) {
            Expr::Literal(value) => visitor.visit_literal(self, value),
            Expr::Grouping(expression) => visitor.visit_grouping(self, *expression),
            Expr::Unary { operator, right } => visitor.visit_unary(self, operator, *right),
            Expr::Binary { left, operator, right } => {
                visitor.visit_binary(self, *left, operator, *right)
            }
            Expr::Ternary { condition, then_branch, else_branch, .. } => {
                visitor.visit_ternary(self, *condition, *then_branch, *else_branch)
            }
        }
    }
}

impl Display for Ast<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", AstPrinter::print(self))
    }
}

/// Traversal hook for passes that walk a tree without matching on `Expr` themselves.
pub trait ExprVisitor<'a> {
    type Output;

    fn visit_literal(&mut self, ast: &Ast<'a>, value: &LiteralValue<'a>) -> Self::Output;

    fn visit_grouping(&mut self, ast: &Ast<'a>, expression: ExprId) -> Self::Output;

    fn visit_unary(&mut self, ast: &Ast<'a>, operator: &Token<'a>, right: ExprId) -> Self::Output;

    fn visit_binary(
        &mut self,
        ast: &Ast<'a>,
        left: ExprId,
        operator: &Token<'a>,
        right: ExprId,
    ) -> Self::Output;

    fn visit_ternary(
        &mut self,
        ast: &Ast<'a>,
        condition: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    ) -> Self::Output;
}
